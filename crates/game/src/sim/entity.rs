use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Quat, Vec3};

use super::config::TextureRef;
use super::timer::Timer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(u64);

impl EntityId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Hands out ids that stay unique for the lifetime of a world, so an id
/// seen in an event never names a different entity later.
#[derive(Debug, Default)]
pub struct EntityIdAllocator {
    next: u64,
}

impl EntityIdAllocator {
    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KindTag {
    Player,
    Enemy,
    Collectible,
    Misc,
}

impl KindTag {
    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Player => 0,
            Self::Enemy => 1,
            Self::Collectible => 2,
            Self::Misc => 3,
        }
    }
}

/// Enemies only ever patrol. A pursuit mode would be a new variant here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnemyMode {
    Patrolling { center: Vec3 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntityKind {
    Player,
    Enemy(EnemyMode),
    Collectible,
    /// Background and explosion remnants.
    Misc,
}

impl EntityKind {
    pub fn tag(&self) -> KindTag {
        match self {
            Self::Player => KindTag::Player,
            Self::Enemy(_) => KindTag::Enemy,
            Self::Collectible => KindTag::Collectible,
            Self::Misc => KindTag::Misc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub scale: f32,
    pub angle: f32,
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            scale: 1.0,
            angle: 0.0,
        }
    }

    pub fn bearing(&self) -> Vec3 {
        Vec3::new(self.angle.cos(), self.angle.sin(), 0.0)
    }

    pub fn right(&self) -> Vec3 {
        Vec3::new(self.angle.sin(), -self.angle.cos(), 0.0)
    }

    /// translate · rotate_z · scale
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            Quat::from_rotation_z(self.angle),
            self.position,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub transform: Transform,
    /// Seconds alive; drives the enemy patrol phase.
    pub age: f64,
    pub explosion: Timer,
    pub texture: TextureRef,
}

impl Entity {
    fn new(id: EntityId, kind: EntityKind, transform: Transform, texture: TextureRef) -> Self {
        Self {
            id,
            kind,
            transform,
            age: 0.0,
            explosion: Timer::default(),
            texture,
        }
    }

    pub fn player(id: EntityId, texture: TextureRef) -> Self {
        let transform = Transform {
            angle: FRAC_PI_2,
            ..Transform::at(Vec3::ZERO)
        };
        Self::new(id, EntityKind::Player, transform, texture)
    }

    pub fn background(id: EntityId, scale: f32, texture: TextureRef) -> Self {
        let transform = Transform {
            scale,
            ..Transform::at(Vec3::ZERO)
        };
        Self::new(id, EntityKind::Misc, transform, texture)
    }

    pub fn enemy(id: EntityId, position: Vec3, center_offset: f32, texture: TextureRef) -> Self {
        let mode = EnemyMode::Patrolling {
            center: patrol_center(position, center_offset),
        };
        Self::new(id, EntityKind::Enemy(mode), Transform::at(position), texture)
    }

    pub fn collectible(id: EntityId, position: Vec3, scale: f32, texture: TextureRef) -> Self {
        let transform = Transform {
            scale,
            angle: FRAC_PI_2,
            ..Transform::at(position)
        };
        Self::new(id, EntityKind::Collectible, transform, texture)
    }

    pub fn explosion(
        id: EntityId,
        position: Vec3,
        now: f64,
        duration: f64,
        texture: TextureRef,
    ) -> Self {
        let mut entity = Self::new(id, EntityKind::Misc, Transform::at(position), texture);
        entity.explosion = Timer::started(now, duration);
        entity
    }

    pub fn tag(&self) -> KindTag {
        self.kind.tag()
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }
}

/// Pulls the spawn point `offset` units toward the origin on both axes.
pub fn patrol_center(position: Vec3, offset: f32) -> Vec3 {
    let dx = if position.x > 0.0 { -offset } else { offset };
    let dy = if position.y > 0.0 { -offset } else { offset };
    Vec3::new(position.x + dx, position.y + dy, position.z)
}
