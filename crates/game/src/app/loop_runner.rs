use std::process::ExitCode;

use dream_engine::{run_app, ExitReason};
use tracing::{error, info};

use super::bootstrap::AppWiring;

pub(crate) fn run(app: AppWiring) -> ExitCode {
    match run_app(app.config, app.scene) {
        Ok(reason) => {
            if reason == ExitReason::GameOver {
                info!(banner = "Game Over!", "game_over");
            } else {
                info!(reason = ?reason, "exited");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "startup_failed");
            ExitCode::FAILURE
        }
    }
}
