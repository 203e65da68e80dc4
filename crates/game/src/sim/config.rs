use std::f32::consts::PI;

/// Every gameplay tunable, in world units, seconds and milliseconds.
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub world_half_extent: f32,
    pub spawn_exclusion_half_size: f32,
    pub enemy_cap: usize,
    pub collectible_cap: usize,
    pub spawn_cooldown_seconds: f64,
    pub explosion_seconds: f64,
    pub powered_seconds: f64,
    pub buffs_per_power_up: u32,
    pub enemy_contact_radius: f32,
    pub collectible_pickup_radius: f32,
    pub enemy_warning_radius: f32,
    pub initial_health: u32,
    pub move_speed_per_ms: f32,
    pub turn_rate_per_ms: f32,
    pub patrol_center_offset: f32,
    pub background_scale: f32,
    pub collectible_scale: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            world_half_extent: 4.0,
            spawn_exclusion_half_size: 1.0,
            enemy_cap: 5,
            collectible_cap: 3,
            spawn_cooldown_seconds: 5.0,
            explosion_seconds: 5.0,
            powered_seconds: 10.0,
            buffs_per_power_up: 5,
            enemy_contact_radius: 0.8,
            collectible_pickup_radius: 0.6,
            enemy_warning_radius: 1.4,
            initial_health: 3,
            move_speed_per_ms: 0.001,
            turn_rate_per_ms: PI / 1800.0,
            patrol_center_offset: 0.5,
            background_scale: 20.0,
            collectible_scale: 0.5,
        }
    }
}

/// Opaque texture handle handed through to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureRef(pub &'static str);

impl TextureRef {
    pub fn as_str(self) -> &'static str {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureSet {
    pub ship: TextureRef,
    pub ship_powered: TextureRef,
    pub enemy: TextureRef,
    pub collectible: TextureRef,
    pub explosion: TextureRef,
    pub background: TextureRef,
}

impl Default for TextureSet {
    fn default() -> Self {
        Self {
            ship: TextureRef("ship"),
            ship_powered: TextureRef("ship_powered"),
            enemy: TextureRef("enemy"),
            collectible: TextureRef("collectible"),
            explosion: TextureRef("explosion"),
            background: TextureRef("background"),
        }
    }
}
