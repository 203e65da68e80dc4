use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use glam::{Mat4, Vec2, Vec3};
use image::ImageReader;
use pixels::{Error, Pixels, SurfaceTexture};
use tracing::warn;
use winit::window::Window;

use crate::app::{SceneWorld, TextureKey};
use crate::texture_keys::validate_texture_key;

use super::transform::screen_to_ndc;
use super::{ndc_to_screen, view_matrix, Viewport};

const CLEAR_COLOR: [u8; 4] = [0, 0, 255, 255];
const PLACEHOLDER_COLOR: [u8; 4] = [220, 220, 240, 255];
const QUAD_CORNERS: [Vec3; 4] = [
    Vec3::new(-0.5, -0.5, 0.0),
    Vec3::new(0.5, -0.5, 0.0),
    Vec3::new(0.5, 0.5, 0.0),
    Vec3::new(-0.5, 0.5, 0.0),
];

struct LoadedTexture {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PixelRect {
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
}

pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    viewport: Viewport,
    textures_dir: PathBuf,
    texture_cache: HashMap<&'static str, Option<LoadedTexture>>,
    warned_texture_keys: HashSet<&'static str>,
}

impl Renderer {
    pub fn new(window: Arc<Window>, textures_dir: PathBuf) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            viewport: Viewport {
                width: size.width,
                height: size.height,
            },
            textures_dir,
            texture_cache: HashMap::new(),
            warned_texture_keys: HashSet::new(),
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height)?;
        self.viewport = Viewport { width, height };
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width, height, window);
        Pixels::new(width, height, surface)
    }

    pub(crate) fn render_world(&mut self, world: &SceneWorld) -> Result<(), Error> {
        let viewport = self.viewport;
        if viewport.width == 0 || viewport.height == 0 {
            return Ok(());
        }

        let textures_dir = self.textures_dir.as_path();
        let texture_cache = &mut self.texture_cache;
        let warned_texture_keys = &mut self.warned_texture_keys;
        let frame = self.pixels.frame_mut();
        for chunk in frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&CLEAR_COLOR);
        }

        let view = view_matrix(viewport);
        // Sprite lists are front to back; paint from the back.
        for sprite in world.sprites().iter().rev() {
            let texture = resolve_cached_texture(
                texture_cache,
                warned_texture_keys,
                textures_dir,
                sprite.texture,
            );
            draw_sprite(frame, viewport, view * sprite.model, texture);
        }

        self.pixels.render()
    }
}

fn draw_sprite(
    frame: &mut [u8],
    viewport: Viewport,
    clip_from_model: Mat4,
    texture: Option<&LoadedTexture>,
) {
    let Some(rect) = projected_bounds(viewport, clip_from_model) else {
        return;
    };
    let model_from_clip = clip_from_model.inverse();
    if !model_from_clip.is_finite() {
        return;
    }

    let frame_width = viewport.width as usize;
    for y in rect.top..rect.bottom {
        for x in rect.left..rect.right {
            let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let ndc = screen_to_ndc(center, viewport);
            let local = model_from_clip.transform_point3(Vec3::new(ndc.x, ndc.y, 0.0));
            let u = local.x + 0.5;
            let v = 0.5 - local.y;
            if !(0.0..1.0).contains(&u) || !(0.0..1.0).contains(&v) {
                continue;
            }
            let color = match texture {
                Some(texture) => match sample_texel(texture, u, v) {
                    Some(texel) => texel,
                    None => continue,
                },
                None => PLACEHOLDER_COLOR,
            };
            write_pixel_rgba(frame, frame_width, x as usize, y as usize, color);
        }
    }
}

fn projected_bounds(viewport: Viewport, clip_from_model: Mat4) -> Option<PixelRect> {
    let mut min = Vec2::splat(f32::INFINITY);
    let mut max = Vec2::splat(f32::NEG_INFINITY);
    for corner in QUAD_CORNERS {
        let clip = clip_from_model.transform_point3(corner);
        let screen = ndc_to_screen(Vec2::new(clip.x, clip.y), viewport);
        min = min.min(screen);
        max = max.max(screen);
    }
    if !min.is_finite() || !max.is_finite() {
        return None;
    }

    let rect = PixelRect {
        left: (min.x.floor() as i32).max(0),
        top: (min.y.floor() as i32).max(0),
        right: (max.x.ceil() as i32).min(viewport.width as i32),
        bottom: (max.y.ceil() as i32).min(viewport.height as i32),
    };
    (rect.left < rect.right && rect.top < rect.bottom).then_some(rect)
}

/// Nearest-neighbour lookup; fully transparent texels yield `None`.
fn sample_texel(texture: &LoadedTexture, u: f32, v: f32) -> Option<[u8; 4]> {
    if texture.width == 0 || texture.height == 0 {
        return None;
    }
    let expected_len = texture.width as usize * texture.height as usize * 4;
    if texture.rgba.len() < expected_len {
        return None;
    }
    let tx = ((u * texture.width as f32) as u32).min(texture.width - 1) as usize;
    let ty = ((v * texture.height as f32) as u32).min(texture.height - 1) as usize;
    let offset = (ty * texture.width as usize + tx) * 4;
    let texel = [
        texture.rgba[offset],
        texture.rgba[offset + 1],
        texture.rgba[offset + 2],
        texture.rgba[offset + 3],
    ];
    (texel[3] != 0).then_some(texel)
}

fn write_pixel_rgba(frame: &mut [u8], width: usize, x: usize, y: usize, color: [u8; 4]) {
    let Some(offset) = y
        .checked_mul(width)
        .and_then(|row| row.checked_add(x))
        .and_then(|pixel| pixel.checked_mul(4))
    else {
        return;
    };
    if let Some(dst) = frame.get_mut(offset..offset + 4) {
        dst.copy_from_slice(&color);
    }
}

fn resolve_cached_texture<'a>(
    cache: &'a mut HashMap<&'static str, Option<LoadedTexture>>,
    warned_texture_keys: &mut HashSet<&'static str>,
    textures_dir: &Path,
    key: TextureKey,
) -> Option<&'a LoadedTexture> {
    let key = key.as_str();
    if !cache.contains_key(key) {
        let loaded = resolve_texture_path(textures_dir, key).and_then(|path| {
            load_texture_rgba(&path).map_err(|reason| (Some(path), reason))
        });
        let texture = match loaded {
            Ok(texture) => Some(texture),
            Err((path, reason)) => {
                warn_texture_load_once(warned_texture_keys, key, path.as_deref(), &reason);
                None
            }
        };
        cache.insert(key, texture);
    }
    cache.get(key).and_then(Option::as_ref)
}

fn resolve_texture_path(
    textures_dir: &Path,
    key: &str,
) -> Result<PathBuf, (Option<PathBuf>, String)> {
    validate_texture_key(key).map_err(|error| (None, format!("invalid_key:{error}")))?;
    Ok(textures_dir.join(format!("{key}.png")))
}

fn load_texture_rgba(path: &Path) -> Result<LoadedTexture, String> {
    let reader = ImageReader::open(path).map_err(|error| format!("file_open_failed:{error}"))?;
    let decoded = reader
        .decode()
        .map_err(|error| format!("decode_failed:{error}"))?;
    let image = decoded.to_rgba8();
    Ok(LoadedTexture {
        width: image.width(),
        height: image.height(),
        rgba: image.into_raw(),
    })
}

fn warn_texture_load_once(
    warned_keys: &mut HashSet<&'static str>,
    key: &'static str,
    resolved_path: Option<&Path>,
    reason: &str,
) {
    if !warned_keys.insert(key) {
        return;
    }
    let path_display = resolved_path
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "<unresolved>".to_string());
    warn!(
        texture_key = key,
        path = %path_display,
        reason,
        "texture_load_failed_using_placeholder"
    );
}
