use glam::Vec3;

use super::config::SimConfig;
use super::entity::{EnemyMode, Entity, EntityKind, Transform};

const PATROL_STEPS_PER_SECOND: f64 = 30.0;

type MovementPolicy = fn(&mut Entity, f64);

/// Indexed by `KindTag::index`.
const POLICIES: [MovementPolicy; 4] = [base_policy, enemy_policy, base_policy, base_policy];

/// Held movement flags for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlInput {
    pub forward: bool,
    pub backward: bool,
    pub strafe_left: bool,
    pub strafe_right: bool,
    pub rotate_left: bool,
    pub rotate_right: bool,
}

pub fn advance(entity: &mut Entity, dt_seconds: f64) {
    let policy = POLICIES[entity.tag().index()];
    policy(entity, dt_seconds);
}

fn base_policy(entity: &mut Entity, dt_seconds: f64) {
    entity.age += dt_seconds;
}

fn enemy_policy(entity: &mut Entity, dt_seconds: f64) {
    let EntityKind::Enemy(EnemyMode::Patrolling { center }) = entity.kind else {
        return base_policy(entity, dt_seconds);
    };
    let next_step = patrol_step(entity.age + dt_seconds);
    if patrol_step(entity.age) < next_step {
        let target = orbit_point(center, next_step);
        let delta = target - entity.transform.position;
        entity.transform.angle = delta.y.atan2(delta.x);
        entity.transform.position = target;
    }
    base_policy(entity, dt_seconds);
}

/// Number of 30 Hz patrol boundaries crossed after `age` seconds.
pub fn patrol_step(age: f64) -> u64 {
    (age.max(0.0) * PATROL_STEPS_PER_SECOND).floor() as u64
}

/// Point on the unit circle around `center`, one degree per patrol step.
pub fn orbit_point(center: Vec3, step: u64) -> Vec3 {
    let radians = ((step % 360) as f32).to_radians();
    center + Vec3::new(radians.cos(), radians.sin(), 0.0)
}

/// Integrates held controls into the player transform. Bearing and right
/// vectors are taken before this tick's rotation is applied.
pub fn apply_controls(
    transform: &mut Transform,
    input: &ControlInput,
    dt_seconds: f64,
    config: &SimConfig,
) {
    let dt_ms = (dt_seconds * 1000.0) as f32;
    let motion = config.move_speed_per_ms * dt_ms;
    let turn = config.turn_rate_per_ms * dt_ms;
    let bearing = transform.bearing();
    let right = transform.right();

    let mut position = transform.position;
    let mut angle = transform.angle;
    if input.forward {
        position += motion * bearing;
    }
    if input.backward {
        position -= motion * bearing;
    }
    if input.rotate_left {
        angle += turn;
    }
    if input.rotate_right {
        angle -= turn;
    }
    if input.strafe_left {
        position -= motion * right;
    }
    if input.strafe_right {
        position += motion * right;
    }
    transform.position = position;
    transform.angle = angle;
}

#[cfg(test)]
mod tests {
    use std::f32::consts::{FRAC_PI_2, PI};

    use super::*;
    use crate::sim::config::TextureRef;
    use crate::sim::entity::EntityIdAllocator;

    const TEX: TextureRef = TextureRef("enemy");

    fn assert_vec3_near(actual: Vec3, expected: Vec3) {
        assert!(
            actual.abs_diff_eq(expected, 1e-4),
            "actual={actual:?} expected={expected:?}"
        );
    }

    #[test]
    fn orbit_at_step_zero_is_center_plus_x() {
        let center = Vec3::new(1.5, -2.0, 0.0);
        assert_vec3_near(orbit_point(center, 0), center + Vec3::X);
    }

    #[test]
    fn orbit_wraps_every_360_steps() {
        let center = Vec3::new(-1.0, 1.0, 0.0);
        assert_vec3_near(orbit_point(center, 90), center + Vec3::Y);
        assert_vec3_near(orbit_point(center, 450), orbit_point(center, 90));
    }

    #[test]
    fn patrol_steps_count_30hz_boundaries() {
        assert_eq!(patrol_step(0.0), 0);
        assert_eq!(patrol_step(0.03125), 0);
        assert_eq!(patrol_step(0.0625), 1);
        assert_eq!(patrol_step(1.0), 30);
    }

    #[test]
    fn enemy_holds_position_between_boundaries() {
        let mut ids = EntityIdAllocator::default();
        let spawn = Vec3::new(2.0, 2.0, 0.0);
        let mut enemy = Entity::enemy(ids.allocate(), spawn, 0.5, TEX);

        advance(&mut enemy, 1.0 / 32.0);

        assert_eq!(enemy.position(), spawn);
        assert!((enemy.age - 1.0 / 32.0).abs() < 1e-12);
    }

    #[test]
    fn enemy_jumps_to_orbit_when_crossing_a_boundary() {
        let mut ids = EntityIdAllocator::default();
        let spawn = Vec3::new(2.0, 2.0, 0.0);
        let mut enemy = Entity::enemy(ids.allocate(), spawn, 0.5, TEX);
        let center = Vec3::new(1.5, 1.5, 0.0);

        advance(&mut enemy, 1.0 / 32.0);
        advance(&mut enemy, 1.0 / 32.0);

        let expected = orbit_point(center, 1);
        assert_vec3_near(enemy.position(), expected);
        let heading = (expected.y - spawn.y).atan2(expected.x - spawn.x);
        assert!((enemy.transform.angle - heading).abs() < 1e-5);
    }

    #[test]
    fn static_kinds_only_age() {
        let mut ids = EntityIdAllocator::default();
        let position = Vec3::new(1.0, 3.0, 0.0);
        let mut collectible = Entity::collectible(ids.allocate(), position, 0.5, TEX);

        for _ in 0..100 {
            advance(&mut collectible, 0.25);
        }

        assert_eq!(collectible.position(), position);
        assert!((collectible.age - 25.0).abs() < 1e-9);
    }

    #[test]
    fn forward_moves_along_bearing_scaled_by_milliseconds() {
        let config = SimConfig::default();
        let mut transform = Transform {
            angle: FRAC_PI_2,
            ..Transform::at(Vec3::ZERO)
        };
        let input = ControlInput {
            forward: true,
            ..ControlInput::default()
        };

        apply_controls(&mut transform, &input, 0.5, &config);

        assert_vec3_near(transform.position, Vec3::new(0.0, 0.5, 0.0));
    }

    #[test]
    fn opposite_controls_cancel() {
        let config = SimConfig::default();
        let start = Transform::at(Vec3::new(1.0, 1.0, 0.0));
        let mut transform = start;
        let input = ControlInput {
            forward: true,
            backward: true,
            strafe_left: true,
            strafe_right: true,
            rotate_left: true,
            rotate_right: true,
        };

        apply_controls(&mut transform, &input, 0.25, &config);

        assert_vec3_near(transform.position, start.position);
        assert!((transform.angle - start.angle).abs() < 1e-6);
    }

    #[test]
    fn rotation_rate_is_pi_over_1800_per_millisecond() {
        let config = SimConfig::default();
        let mut transform = Transform::at(Vec3::ZERO);
        let input = ControlInput {
            rotate_left: true,
            ..ControlInput::default()
        };

        apply_controls(&mut transform, &input, 1.8, &config);

        assert!((transform.angle - PI).abs() < 1e-4);
    }

    #[test]
    fn strafe_uses_right_vector() {
        let config = SimConfig::default();
        let mut transform = Transform {
            angle: FRAC_PI_2,
            ..Transform::at(Vec3::ZERO)
        };
        let input = ControlInput {
            strafe_right: true,
            ..ControlInput::default()
        };

        apply_controls(&mut transform, &input, 1.0, &config);

        assert_vec3_near(transform.position, Vec3::new(1.0, 0.0, 0.0));
    }
}
