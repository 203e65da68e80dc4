use dream_engine::{
    InputAction, InputSnapshot, Scene, SceneCommand, SceneWorld, SoundCue, Sprite, TextureKey,
};
use tracing::{debug, info};

use crate::sim::{ControlInput, RenderItem, SimEvent, TickOutcome, World};

/// Adapts the simulation core to the engine's scene contract.
pub(crate) struct GameplayScene {
    world: World,
    game_over_reported: bool,
}

impl GameplayScene {
    pub(crate) fn new(world: World) -> Self {
        Self {
            world,
            game_over_reported: false,
        }
    }

    fn publish_sprites(&self, scene_world: &mut SceneWorld) {
        scene_world.set_sprites(self.world.render_list().map(sprite_from_render_item));
    }

    fn forward_events(&mut self, scene_world: &mut SceneWorld) {
        for event in self.world.drain_events() {
            match event {
                SimEvent::HitSound => scene_world.push_sound_cue(SoundCue::Hit),
                SimEvent::EnemyDestroyed { id } => {
                    debug!(entity = id.raw(), "enemy_destroyed");
                }
                SimEvent::CollectiblePicked { id, buff_count } => {
                    debug!(entity = id.raw(), buff_count, "collectible_picked");
                }
                SimEvent::PoweredUp => info!("powered_up"),
                SimEvent::PowerExpired => info!("power_expired"),
                SimEvent::PlayerDamaged { health } => info!(health, "player_damaged"),
                SimEvent::PlayerDestroyed => info!("player_destroyed"),
                SimEvent::ExplosionCleared { id } => {
                    debug!(entity = id.raw(), "explosion_cleared");
                }
                SimEvent::Spawned { .. } => {}
            }
        }
    }
}

impl Scene for GameplayScene {
    fn load(&mut self, world: &mut SceneWorld) {
        self.publish_sprites(world);
        info!(
            health = self.world.player_health(),
            sprite_count = world.sprite_count(),
            "gameplay_loaded"
        );
    }

    fn update(
        &mut self,
        fixed_dt_seconds: f64,
        input: &InputSnapshot,
        world: &mut SceneWorld,
    ) -> SceneCommand {
        if input.quit_requested() {
            return SceneCommand::Quit;
        }

        let outcome = self.world.tick(fixed_dt_seconds, &control_input_from(input));
        self.forward_events(world);
        self.publish_sprites(world);

        match outcome {
            TickOutcome::Continue => SceneCommand::None,
            TickOutcome::GameOver | TickOutcome::Halted => {
                if !self.game_over_reported {
                    self.game_over_reported = true;
                    info!(sim_time = self.world.sim_time(), "player_lost");
                }
                SceneCommand::GameOver
            }
        }
    }

    fn unload(&mut self, _world: &mut SceneWorld) {
        info!(
            sim_time = self.world.sim_time(),
            health = self.world.player_health(),
            enemies = self.world.enemy_count(),
            collectibles = self.world.collectible_count(),
            "gameplay_unloaded"
        );
    }

    fn debug_title(&self) -> Option<String> {
        let powered = if self.world.player().is_powered(self.world.sim_time()) {
            " | POWERED"
        } else {
            ""
        };
        Some(format!(
            "A Pirate's Dream | Health {} | Buffs {}{}",
            self.world.player_health(),
            self.world.buff_count(),
            powered
        ))
    }
}

fn control_input_from(input: &InputSnapshot) -> ControlInput {
    ControlInput {
        forward: input.is_down(InputAction::Forward),
        backward: input.is_down(InputAction::Backward),
        strafe_left: input.is_down(InputAction::StrafeLeft),
        strafe_right: input.is_down(InputAction::StrafeRight),
        rotate_left: input.is_down(InputAction::RotateLeft),
        rotate_right: input.is_down(InputAction::RotateRight),
    }
}

fn sprite_from_render_item(item: RenderItem) -> Sprite {
    Sprite {
        model: item.model,
        texture: TextureKey(item.texture.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::sim::{KindTag, SimConfig, SpawnKind, TextureSet};

    const DT: f64 = 1.0 / 64.0;

    fn quiet_scene() -> GameplayScene {
        let config = SimConfig {
            spawn_cooldown_seconds: 1.0e9,
            ..SimConfig::default()
        };
        GameplayScene::new(World::new(
            config,
            TextureSet::default(),
            ChaCha8Rng::seed_from_u64(5),
        ))
    }

    #[test]
    fn load_publishes_player_and_background() {
        let mut scene = quiet_scene();
        let mut world = SceneWorld::default();

        scene.load(&mut world);

        let keys: Vec<_> = world.sprites().iter().map(|sprite| sprite.texture).collect();
        assert_eq!(keys, vec![TextureKey("ship"), TextureKey("background")]);
    }

    #[test]
    fn quit_request_short_circuits_the_tick() {
        let mut scene = quiet_scene();
        let mut world = SceneWorld::default();
        let input = InputSnapshot::empty().with_quit_requested(true);

        assert_eq!(scene.update(DT, &input, &mut world), SceneCommand::Quit);
        assert_eq!(scene.world.sim_time(), 0.0);
    }

    #[test]
    fn held_actions_drive_the_player() {
        let mut scene = quiet_scene();
        let mut world = SceneWorld::default();
        let input = InputSnapshot::empty().with_action_down(InputAction::Forward, true);

        scene.update(0.5, &input, &mut world);

        let player = world.sprites()[0].model.w_axis;
        assert!(player.x.abs() < 1e-5);
        assert!((player.y - 0.5).abs() < 1e-5);
    }

    #[test]
    fn enemy_contact_queues_hit_sound_and_updates_title() {
        let mut scene = quiet_scene();
        let mut world = SceneWorld::default();
        scene
            .world
            .insert_spawn(SpawnKind::Enemy, Vec3::new(0.5, 0.0, 0.0));

        let command = scene.update(DT, &InputSnapshot::empty(), &mut world);

        assert_eq!(command, SceneCommand::None);
        assert_eq!(world.sound_cues(), &[SoundCue::Hit]);
        assert_eq!(world.sprites()[1].texture, TextureKey("explosion"));
        assert_eq!(
            scene.debug_title().as_deref(),
            Some("A Pirate's Dream | Health 2 | Buffs 0")
        );
    }

    #[test]
    fn losing_all_health_ends_in_game_over() {
        let mut scene = quiet_scene();
        let mut world = SceneWorld::default();
        for _ in 0..3 {
            scene
                .world
                .insert_spawn(SpawnKind::Enemy, Vec3::new(0.0, 0.5, 0.0));
            scene.update(DT, &InputSnapshot::empty(), &mut world);
        }
        assert_eq!(scene.world.entities()[0].tag(), KindTag::Misc);

        let mut command = SceneCommand::None;
        for _ in 0..400 {
            command = scene.update(DT, &InputSnapshot::empty(), &mut world);
            if command != SceneCommand::None {
                break;
            }
        }

        assert_eq!(command, SceneCommand::GameOver);
    }

    #[test]
    fn control_mapping_covers_every_movement_action() {
        let input = InputSnapshot::empty()
            .with_action_down(InputAction::Backward, true)
            .with_action_down(InputAction::StrafeLeft, true)
            .with_action_down(InputAction::RotateRight, true);

        let controls = control_input_from(&input);

        assert_eq!(
            controls,
            ControlInput {
                backward: true,
                strafe_left: true,
                rotate_right: true,
                ..ControlInput::default()
            }
        );
    }
}
