use super::config::{SimConfig, TextureSet};
use super::entity::{Entity, EntityIdAllocator, KindTag};
use super::movement;
use super::spawner::{SpawnKind, Spawner};
use super::world::{PlayerStatus, SimEvent};

/// Distance band of an enemy relative to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProximityBand {
    Contact,
    Warning,
    Clear,
}

pub fn classify_enemy(distance: f32, config: &SimConfig) -> ProximityBand {
    if distance < config.enemy_contact_radius {
        ProximityBand::Contact
    } else if distance < config.enemy_warning_radius {
        ProximityBand::Warning
    } else {
        ProximityBand::Clear
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScanStep {
    Advance,
    /// The slot was removed; the next entity now sits at the same index.
    Revisit,
}

/// Mutable view of the world for one tick's entity scan.
pub(crate) struct CollisionPass<'a> {
    pub(crate) now: f64,
    pub(crate) config: &'a SimConfig,
    pub(crate) textures: &'a TextureSet,
    pub(crate) entities: &'a mut Vec<Entity>,
    pub(crate) ids: &'a mut EntityIdAllocator,
    pub(crate) player: &'a mut PlayerStatus,
    pub(crate) spawner: &'a mut Spawner,
    pub(crate) events: &'a mut Vec<SimEvent>,
}

impl CollisionPass<'_> {
    /// Moves and resolves every entity between the player (index 0) and the
    /// background (last). Each surviving entity is visited exactly once.
    pub(crate) fn scan(&mut self, dt_seconds: f64) {
        let mut index = 1;
        while index + 1 < self.entities.len() {
            movement::advance(&mut self.entities[index], dt_seconds);
            match self.resolve_slot(index) {
                ScanStep::Advance => index += 1,
                ScanStep::Revisit => {}
            }
        }
    }

    pub(crate) fn resolve_slot(&mut self, index: usize) -> ScanStep {
        let entity = &self.entities[index];
        let tag = entity.tag();
        if tag == KindTag::Misc {
            if entity.explosion.is_finished(self.now) {
                self.clear_explosion(index);
                return ScanStep::Revisit;
            }
            return ScanStep::Advance;
        }
        if !self.player.is_alive() {
            return ScanStep::Advance;
        }

        let distance = entity.position().distance(self.entities[0].position());
        match tag {
            KindTag::Enemy => match classify_enemy(distance, self.config) {
                ProximityBand::Contact => {
                    self.destroy_enemy(index);
                    ScanStep::Advance
                }
                // Near-miss band; no reaction yet.
                ProximityBand::Warning | ProximityBand::Clear => ScanStep::Advance,
            },
            KindTag::Collectible if distance < self.config.collectible_pickup_radius => {
                self.pick_up_collectible(index);
                ScanStep::Revisit
            }
            _ => ScanStep::Advance,
        }
    }

    fn clear_explosion(&mut self, index: usize) {
        let removed = self.entities.remove(index);
        // Explosions stand in for destroyed enemies until they fade.
        self.spawner.release(SpawnKind::Enemy);
        self.events.push(SimEvent::ExplosionCleared { id: removed.id });
    }

    fn destroy_enemy(&mut self, index: usize) {
        let enemy_id = self.entities[index].id;
        let position = self.entities[index].position();
        self.entities[index] = Entity::explosion(
            self.ids.allocate(),
            position,
            self.now,
            self.config.explosion_seconds,
            self.textures.explosion,
        );
        self.events.push(SimEvent::EnemyDestroyed { id: enemy_id });
        self.events.push(SimEvent::HitSound);

        self.player.health = self.player.health.saturating_sub(1);
        self.events.push(SimEvent::PlayerDamaged {
            health: self.player.health,
        });
        if self.player.health == 0 {
            self.destroy_player();
        }
    }

    fn destroy_player(&mut self) {
        let player_position = self.entities[0].position();
        self.entities[0] = Entity::explosion(
            self.ids.allocate(),
            player_position,
            self.now,
            self.config.explosion_seconds,
            self.textures.explosion,
        );
        self.player.begin_exploding();
        self.events.push(SimEvent::PlayerDestroyed);
    }

    fn pick_up_collectible(&mut self, index: usize) {
        let removed = self.entities.remove(index);
        self.spawner.release(SpawnKind::Collectible);
        self.player.buff_count = self.player.buff_count.saturating_add(1);
        self.events.push(SimEvent::CollectiblePicked {
            id: removed.id,
            buff_count: self.player.buff_count,
        });

        if self.player.buff_count >= self.config.buffs_per_power_up {
            self.player.buff_count = 0;
            self.player
                .powered
                .start(self.now, self.config.powered_seconds);
            self.entities[0].texture = self.textures.ship_powered;
            self.events.push(SimEvent::PoweredUp);
        }
    }
}
