mod audio;
mod input;
mod loop_runner;
mod metrics;
mod rendering;
mod scene;

pub use audio::{AudioConfig, AudioError, AudioManager};
pub use input::InputAction;
pub use loop_runner::{run_app, AppError, ExitReason, LoopConfig, SLOW_FRAME_ENV_VAR};
pub use rendering::{ndc_to_screen, view_matrix, Renderer, Viewport, CAMERA_ZOOM};
pub use scene::{InputSnapshot, Scene, SceneCommand, SceneWorld, SoundCue, Sprite, TextureKey};
