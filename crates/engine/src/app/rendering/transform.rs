use glam::{Mat4, Vec2, Vec3};

pub const CAMERA_ZOOM: f32 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Camera transform shared by every sprite: aspect correction on the
/// longer window axis, then a fixed zoom-out centered on the origin.
pub fn view_matrix(viewport: Viewport) -> Mat4 {
    let width = viewport.width.max(1) as f32;
    let height = viewport.height.max(1) as f32;
    let window_scale = if width > height {
        Mat4::from_scale(Vec3::new(height / width, 1.0, 1.0))
    } else {
        Mat4::from_scale(Vec3::new(1.0, width / height, 1.0))
    };
    window_scale * Mat4::from_scale(Vec3::splat(CAMERA_ZOOM))
}

/// Clip space [-1, 1] to pixel coordinates with y pointing down.
pub fn ndc_to_screen(ndc: Vec2, viewport: Viewport) -> Vec2 {
    Vec2::new(
        (ndc.x + 1.0) * 0.5 * viewport.width as f32,
        (1.0 - ndc.y) * 0.5 * viewport.height as f32,
    )
}

pub(crate) fn screen_to_ndc(screen: Vec2, viewport: Viewport) -> Vec2 {
    let width = viewport.width.max(1) as f32;
    let height = viewport.height.max(1) as f32;
    Vec2::new(screen.x / width * 2.0 - 1.0, 1.0 - screen.y / height * 2.0)
}
