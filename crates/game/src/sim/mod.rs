//! Arcade simulation core: entities, spawning, collisions and the tick
//! loop. Knows nothing about windows, textures on disk or audio devices.

mod collision;
mod config;
mod entity;
mod movement;
mod spawner;
mod timer;
mod world;

pub use config::{SimConfig, TextureRef, TextureSet};
#[cfg(test)]
pub use entity::KindTag;
pub use movement::ControlInput;
#[cfg(test)]
pub use spawner::SpawnKind;
pub use world::{RenderItem, SimEvent, TickOutcome, World};
