use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod app;
mod texture_keys;

pub use app::{
    ndc_to_screen, run_app, view_matrix, AppError, AudioConfig, AudioError, AudioManager,
    ExitReason, InputAction, InputSnapshot, LoopConfig, Scene, SceneCommand, SceneWorld,
    SoundCue, Sprite, TextureKey, Viewport, CAMERA_ZOOM, SLOW_FRAME_ENV_VAR,
};
pub use texture_keys::TextureKeyError;

pub const ROOT_ENV_VAR: &str = "PIRATES_ROOT";

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub root: PathBuf,
    pub assets_dir: PathBuf,
}

impl AppPaths {
    pub fn textures_dir(&self) -> PathBuf {
        self.assets_dir.join("textures")
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to resolve current executable path: {0}")]
    CurrentExe(#[source] std::io::Error),
    #[error("current executable path has no parent directory: {0}")]
    ExeHasNoParent(PathBuf),
    #[error(
        "{env_var} is set but does not point to a game root: {path}\n\
A game root contains Cargo.toml and either crates/ or assets/."
    )]
    InvalidEnvRoot {
        path: PathBuf,
        env_var: &'static str,
    },
    #[error(
        "no game root found above the executable directory {start_dir}\n\
Expected a directory with Cargo.toml and either crates/ or assets/.\n\
Point {env_var} at the checkout, e.g. `export {env_var}=/path/to/pirates-dream`"
    )]
    RootNotFound {
        start_dir: PathBuf,
        env_var: &'static str,
    },
}

pub fn resolve_app_paths() -> Result<AppPaths, StartupError> {
    let root = resolve_root()?;
    let assets_dir = root.join("assets");
    Ok(AppPaths { root, assets_dir })
}

fn resolve_root() -> Result<PathBuf, StartupError> {
    match env::var(ROOT_ENV_VAR) {
        Ok(value) => {
            let candidate = normalize_path(Path::new(&value));
            if is_game_root(&candidate) {
                Ok(candidate)
            } else {
                Err(StartupError::InvalidEnvRoot {
                    path: candidate,
                    env_var: ROOT_ENV_VAR,
                })
            }
        }
        Err(env::VarError::NotPresent) => {
            let exe = env::current_exe().map_err(StartupError::CurrentExe)?;
            let exe_dir = exe
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| StartupError::ExeHasNoParent(exe.clone()))?;

            exe_dir
                .ancestors()
                .find(|candidate| is_game_root(candidate))
                .map(normalize_path)
                .ok_or_else(|| StartupError::RootNotFound {
                    start_dir: normalize_path(&exe_dir),
                    env_var: ROOT_ENV_VAR,
                })
        }
        Err(source) => Err(StartupError::EnvVar {
            var: ROOT_ENV_VAR,
            source,
        }),
    }
}

fn is_game_root(path: &Path) -> bool {
    path.join("Cargo.toml").is_file()
        && (path.join("crates").is_dir() || path.join("assets").is_dir())
}

fn normalize_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_root_requires_cargo_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir(dir.path().join("assets")).expect("assets dir");
        assert!(!is_game_root(dir.path()));

        fs::write(dir.path().join("Cargo.toml"), "[workspace]\n").expect("manifest");
        assert!(is_game_root(dir.path()));
    }

    #[test]
    fn game_root_requires_crates_or_assets() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("Cargo.toml"), "[workspace]\n").expect("manifest");
        assert!(!is_game_root(dir.path()));

        fs::create_dir(dir.path().join("crates")).expect("crates dir");
        assert!(is_game_root(dir.path()));
    }

    #[test]
    fn textures_live_under_assets() {
        let paths = AppPaths {
            root: PathBuf::from("/game"),
            assets_dir: PathBuf::from("/game/assets"),
        };
        assert_eq!(paths.textures_dir(), PathBuf::from("/game/assets/textures"));
    }
}
