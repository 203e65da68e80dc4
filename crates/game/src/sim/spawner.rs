use glam::Vec3;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::config::SimConfig;
use super::timer::Timer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpawnKind {
    Enemy,
    Collectible,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnPhase {
    Idle,
    Cooldown(Timer),
}

/// One throttled spawn stream: Idle arms the cooldown, a finished cooldown
/// spawns when under the cap and re-arms. At the cap the phase is frozen.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnChannel {
    cap: usize,
    cooldown_seconds: f64,
    live: usize,
    phase: SpawnPhase,
}

impl SpawnChannel {
    pub fn new(cap: usize, cooldown_seconds: f64) -> Self {
        Self {
            cap,
            cooldown_seconds,
            live: 0,
            phase: SpawnPhase::Idle,
        }
    }

    /// Returns true when a spawn is due this tick.
    pub fn poll(&mut self, now: f64) -> bool {
        if self.live >= self.cap {
            return false;
        }
        match self.phase {
            SpawnPhase::Idle => {
                self.phase = SpawnPhase::Cooldown(Timer::started(now, self.cooldown_seconds));
                false
            }
            SpawnPhase::Cooldown(timer) => timer.is_finished(now),
        }
    }

    pub fn record_spawn(&mut self, now: f64) {
        self.live = self.live.saturating_add(1);
        self.phase = SpawnPhase::Cooldown(Timer::started(now, self.cooldown_seconds));
    }

    pub fn release(&mut self) {
        self.live = self.live.saturating_sub(1);
    }

    pub fn live(&self) -> usize {
        self.live
    }

    #[cfg(test)]
    pub fn phase(&self) -> SpawnPhase {
        self.phase
    }
}

#[derive(Debug)]
pub struct Spawner {
    enemies: SpawnChannel,
    collectibles: SpawnChannel,
    rng: ChaCha8Rng,
    half_extent: f32,
    exclusion_half_size: f32,
}

impl Spawner {
    pub fn new(config: &SimConfig, rng: ChaCha8Rng) -> Self {
        Self {
            enemies: SpawnChannel::new(config.enemy_cap, config.spawn_cooldown_seconds),
            collectibles: SpawnChannel::new(config.collectible_cap, config.spawn_cooldown_seconds),
            rng,
            half_extent: config.world_half_extent,
            exclusion_half_size: config.spawn_exclusion_half_size,
        }
    }

    pub fn channel(&self, kind: SpawnKind) -> &SpawnChannel {
        match kind {
            SpawnKind::Enemy => &self.enemies,
            SpawnKind::Collectible => &self.collectibles,
        }
    }

    fn channel_mut(&mut self, kind: SpawnKind) -> &mut SpawnChannel {
        match kind {
            SpawnKind::Enemy => &mut self.enemies,
            SpawnKind::Collectible => &mut self.collectibles,
        }
    }

    /// Polls one channel and, when a spawn is due, picks a position clear
    /// of the player. The caller inserts the entity and records the spawn.
    pub fn poll(&mut self, kind: SpawnKind, now: f64, player_position: Vec3) -> Option<Vec3> {
        if !self.channel_mut(kind).poll(now) {
            return None;
        }
        Some(sample_spawn_position(
            &mut self.rng,
            self.half_extent,
            self.exclusion_half_size,
            player_position,
        ))
    }

    pub fn record_spawn(&mut self, kind: SpawnKind, now: f64) {
        self.channel_mut(kind).record_spawn(now);
    }

    pub fn release(&mut self, kind: SpawnKind) {
        self.channel_mut(kind).release();
    }

    pub fn live(&self, kind: SpawnKind) -> usize {
        self.channel(kind).live()
    }
}

pub fn in_exclusion_box(candidate: Vec3, player_position: Vec3, half_size: f32) -> bool {
    (candidate.x - player_position.x).abs() < half_size
        && (candidate.y - player_position.y).abs() < half_size
}

/// Rejection-samples `[-half_extent, half_extent]²` until the candidate
/// falls outside the square around the player.
pub fn sample_spawn_position<R: Rng>(
    rng: &mut R,
    half_extent: f32,
    exclusion_half_size: f32,
    player_position: Vec3,
) -> Vec3 {
    loop {
        let candidate = Vec3::new(
            rng.gen_range(-half_extent..=half_extent),
            rng.gen_range(-half_extent..=half_extent),
            0.0,
        );
        if !in_exclusion_box(candidate, player_position, exclusion_half_size) {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn idle_channel_arms_cooldown_before_first_spawn() {
        let mut channel = SpawnChannel::new(5, 5.0);

        assert!(!channel.poll(0.0));
        assert_eq!(channel.phase(), SpawnPhase::Cooldown(Timer::started(0.0, 5.0)));
        assert!(!channel.poll(4.9));
        assert!(channel.poll(5.0));
    }

    #[test]
    fn spawn_rearms_cooldown() {
        let mut channel = SpawnChannel::new(5, 5.0);
        channel.poll(0.0);
        assert!(channel.poll(5.0));

        channel.record_spawn(5.0);

        assert_eq!(channel.live(), 1);
        assert!(!channel.poll(5.0));
        assert!(!channel.poll(9.9));
        assert!(channel.poll(10.0));
    }

    #[test]
    fn channel_at_cap_never_reports_due() {
        let mut channel = SpawnChannel::new(1, 5.0);
        channel.poll(0.0);
        channel.record_spawn(5.0);

        assert!(!channel.poll(100.0));

        channel.release();
        assert!(channel.poll(100.0));
    }

    #[test]
    fn release_never_underflows() {
        let mut channel = SpawnChannel::new(3, 5.0);
        channel.release();
        assert_eq!(channel.live(), 0);
    }

    #[test]
    fn samples_stay_in_bounds_and_outside_player_box() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for player in [Vec3::ZERO, Vec3::new(3.5, -3.5, 0.0), Vec3::new(-1.0, 2.0, 0.0)] {
            for _ in 0..500 {
                let position = sample_spawn_position(&mut rng, 4.0, 1.0, player);
                assert!(position.x.abs() <= 4.0 && position.y.abs() <= 4.0);
                assert!(
                    !in_exclusion_box(position, player, 1.0),
                    "position={position:?} player={player:?}"
                );
            }
        }
    }

    #[test]
    fn exclusion_box_is_axis_aligned_square() {
        let player = Vec3::new(1.0, 1.0, 0.0);
        assert!(in_exclusion_box(Vec3::new(1.9, 0.1, 0.0), player, 1.0));
        assert!(!in_exclusion_box(Vec3::new(2.0, 1.0, 0.0), player, 1.0));
        assert!(!in_exclusion_box(Vec3::new(1.0, -0.5, 0.0), player, 1.0));
    }

    #[test]
    fn spawner_channels_are_independent() {
        let config = SimConfig::default();
        let mut spawner = Spawner::new(&config, ChaCha8Rng::seed_from_u64(1));

        assert_eq!(spawner.poll(SpawnKind::Enemy, 0.0, Vec3::ZERO), None);
        assert_eq!(spawner.poll(SpawnKind::Collectible, 0.0, Vec3::ZERO), None);
        assert!(spawner.poll(SpawnKind::Enemy, 5.0, Vec3::ZERO).is_some());
        spawner.record_spawn(SpawnKind::Enemy, 5.0);

        assert_eq!(spawner.live(SpawnKind::Enemy), 1);
        assert_eq!(spawner.live(SpawnKind::Collectible), 0);
        assert!(spawner.poll(SpawnKind::Collectible, 5.0, Vec3::ZERO).is_some());
    }

    #[test]
    fn same_seed_gives_same_positions() {
        let config = SimConfig::default();
        let mut a = Spawner::new(&config, ChaCha8Rng::seed_from_u64(42));
        let mut b = Spawner::new(&config, ChaCha8Rng::seed_from_u64(42));
        for spawner in [&mut a, &mut b] {
            spawner.poll(SpawnKind::Enemy, 0.0, Vec3::ZERO);
        }

        assert_eq!(
            a.poll(SpawnKind::Enemy, 5.0, Vec3::ZERO),
            b.poll(SpawnKind::Enemy, 5.0, Vec3::ZERO)
        );
    }
}
