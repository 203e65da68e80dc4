use glam::{Mat4, Vec3};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use super::collision::CollisionPass;
use super::config::{SimConfig, TextureRef, TextureSet};
use super::entity::{Entity, EntityId, EntityIdAllocator};
use super::movement::{self, ControlInput};
use super::spawner::{SpawnKind, Spawner};
use super::timer::Timer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerPhase {
    Alive,
    /// Health hit zero; the index-0 explosion is fading.
    Exploding,
    GameOver,
}

/// Player bookkeeping that outlives the index-0 entity being swapped for
/// an explosion. Power-up and explosion are tracked separately.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerStatus {
    pub health: u32,
    pub buff_count: u32,
    pub powered: Timer,
    phase: PlayerPhase,
}

impl PlayerStatus {
    pub fn new(health: u32) -> Self {
        Self {
            health,
            buff_count: 0,
            powered: Timer::default(),
            phase: PlayerPhase::Alive,
        }
    }

    #[cfg(test)]
    pub fn phase(&self) -> PlayerPhase {
        self.phase
    }

    pub fn is_alive(&self) -> bool {
        self.phase == PlayerPhase::Alive
    }

    pub fn is_powered(&self, now: f64) -> bool {
        self.powered.is_running(now)
    }

    pub(crate) fn begin_exploding(&mut self) {
        self.phase = PlayerPhase::Exploding;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEvent {
    HitSound,
    EnemyDestroyed { id: EntityId },
    CollectiblePicked { id: EntityId, buff_count: u32 },
    PoweredUp,
    PowerExpired,
    PlayerDamaged { health: u32 },
    PlayerDestroyed,
    ExplosionCleared { id: EntityId },
    Spawned { id: EntityId, kind: SpawnKind },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    /// Reported on exactly one tick.
    GameOver,
    Halted,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderItem {
    pub model: Mat4,
    pub texture: TextureRef,
}

/// Owns every entity. Index 0 is the player (or its explosion), the last
/// slot is the background, spawns go just before it.
#[derive(Debug)]
pub struct World {
    config: SimConfig,
    textures: TextureSet,
    entities: Vec<Entity>,
    ids: EntityIdAllocator,
    player: PlayerStatus,
    spawner: Spawner,
    sim_time: f64,
    events: Vec<SimEvent>,
}

impl World {
    pub fn new(config: SimConfig, textures: TextureSet, rng: ChaCha8Rng) -> Self {
        let mut ids = EntityIdAllocator::default();
        let entities = vec![
            Entity::player(ids.allocate(), textures.ship),
            Entity::background(ids.allocate(), config.background_scale, textures.background),
        ];
        let player = PlayerStatus::new(config.initial_health);
        let spawner = Spawner::new(&config, rng);
        Self {
            config,
            textures,
            entities,
            ids,
            player,
            spawner,
            sim_time: 0.0,
            events: Vec::new(),
        }
    }

    pub fn tick(&mut self, dt_seconds: f64, input: &ControlInput) -> TickOutcome {
        if self.player.phase == PlayerPhase::GameOver {
            return TickOutcome::Halted;
        }

        if self.player.is_alive() {
            movement::apply_controls(
                &mut self.entities[0].transform,
                input,
                dt_seconds,
                &self.config,
            );
        }
        self.sim_time += dt_seconds;

        if self.evaluate_player() {
            return TickOutcome::GameOver;
        }
        movement::advance(&mut self.entities[0], dt_seconds);
        self.run_spawners();

        CollisionPass {
            now: self.sim_time,
            config: &self.config,
            textures: &self.textures,
            entities: &mut self.entities,
            ids: &mut self.ids,
            player: &mut self.player,
            spawner: &mut self.spawner,
            events: &mut self.events,
        }
        .scan(dt_seconds);

        TickOutcome::Continue
    }

    /// Returns true on the tick the player's explosion finishes.
    fn evaluate_player(&mut self) -> bool {
        let now = self.sim_time;
        match self.player.phase {
            PlayerPhase::Alive => {
                if self.player.powered.is_finished(now) {
                    self.player.powered.clear();
                    self.entities[0].texture = self.textures.ship;
                    self.events.push(SimEvent::PowerExpired);
                }
                false
            }
            PlayerPhase::Exploding => {
                if !self.entities[0].explosion.is_finished(now) {
                    return false;
                }
                self.player.phase = PlayerPhase::GameOver;
                info!(sim_time = now, "player_explosion_finished");
                true
            }
            PlayerPhase::GameOver => false,
        }
    }

    fn run_spawners(&mut self) {
        for kind in [SpawnKind::Enemy, SpawnKind::Collectible] {
            let player_position = self.entities[0].position();
            if let Some(position) = self.spawner.poll(kind, self.sim_time, player_position) {
                self.insert_spawn(kind, position);
            }
        }
    }

    pub(crate) fn insert_spawn(&mut self, kind: SpawnKind, position: Vec3) -> EntityId {
        let id = self.ids.allocate();
        let entity = match kind {
            SpawnKind::Enemy => Entity::enemy(
                id,
                position,
                self.config.patrol_center_offset,
                self.textures.enemy,
            ),
            SpawnKind::Collectible => Entity::collectible(
                id,
                position,
                self.config.collectible_scale,
                self.textures.collectible,
            ),
        };
        let background_index = self.entities.len() - 1;
        self.entities.insert(background_index, entity);
        self.spawner.record_spawn(kind, self.sim_time);
        debug!(
            entity = id.raw(),
            kind = ?kind,
            x = position.x,
            y = position.y,
            live = self.spawner.live(kind),
            "entity_spawned"
        );
        self.events.push(SimEvent::Spawned { id, kind });
        id
    }

    /// Front to back: player first, background last.
    pub fn render_list(&self) -> impl Iterator<Item = RenderItem> + '_ {
        self.entities.iter().map(|entity| RenderItem {
            model: entity.transform.model_matrix(),
            texture: entity.texture,
        })
    }

    pub fn drain_events(&mut self) -> std::vec::Drain<'_, SimEvent> {
        self.events.drain(..)
    }

    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    pub fn player(&self) -> &PlayerStatus {
        &self.player
    }

    pub fn player_health(&self) -> u32 {
        self.player.health
    }

    pub fn buff_count(&self) -> u32 {
        self.player.buff_count
    }

    pub fn enemy_count(&self) -> usize {
        self.spawner.live(SpawnKind::Enemy)
    }

    pub fn collectible_count(&self) -> usize {
        self.spawner.live(SpawnKind::Collectible)
    }

    #[cfg(test)]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }
}
