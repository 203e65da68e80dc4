use std::env;
use std::time::{SystemTime, UNIX_EPOCH};

use dream_engine::{LoopConfig, Scene};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use super::gameplay::GameplayScene;
use crate::sim::{SimConfig, TextureSet, World};

const SEED_ENV_VAR: &str = "PIRATES_SEED";

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) scene: Box<dyn Scene>,
}

pub(crate) fn build_app() -> AppWiring {
    init_tracing();
    info!("=== A Pirate's Dream Startup ===");

    let seed = resolve_seed();
    info!(seed, "rng_seeded");

    let world = World::new(
        SimConfig::default(),
        TextureSet::default(),
        ChaCha8Rng::seed_from_u64(seed),
    );

    AppWiring {
        config: LoopConfig::default(),
        scene: Box::new(GameplayScene::new(world)),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn resolve_seed() -> u64 {
    match env::var(SEED_ENV_VAR) {
        Ok(raw) => parse_seed(&raw).unwrap_or_else(|| {
            warn!(
                env_var = SEED_ENV_VAR,
                value = raw.as_str(),
                "invalid seed env var value; falling back to clock"
            );
            clock_seed()
        }),
        Err(env::VarError::NotPresent) => clock_seed(),
        Err(err) => {
            warn!(
                env_var = SEED_ENV_VAR,
                error = %err,
                "unable to read seed env var; falling back to clock"
            );
            clock_seed()
        }
    }
}

fn parse_seed(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok()
}

fn clock_seed() -> u64 {
    let since_epoch = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    since_epoch.as_nanos() as u64
}
