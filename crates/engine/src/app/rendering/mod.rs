mod renderer;
mod transform;

pub use renderer::Renderer;
pub use transform::{ndc_to_screen, view_matrix, Viewport, CAMERA_ZOOM};
