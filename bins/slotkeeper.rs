use std::process::ExitCode;

use configs::AppConfig;
use dotenvy::dotenv;
use service::Registry;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Config drives the log format, so it is read before logging exists and any load error
/// is handed back to be logged afterwards.
fn load_config() -> (AppConfig, Option<anyhow::Error>) {
    match AppConfig::load_and_validate() {
        Ok(cfg) => (cfg, None),
        Err(e) => {
            let mut cfg = AppConfig::default();
            if let Err(default_err) = cfg.normalize_and_validate() {
                return (cfg, Some(e.context(default_err.to_string())));
            }
            (cfg, Some(e))
        }
    }
}

async fn run(command: &str, cfg: &AppConfig) -> anyhow::Result<bool> {
    service::runtime::ensure_env(&configs::config_path(), &cfg.storage.data_dir).await?;
    let registry = Registry::open(&cfg.storage).await?;

    match command {
        "summary" => {
            let s = registry.summary().await;
            info!(
                service = "slotkeeper",
                event = "summary",
                users = s.users,
                items = s.items,
                slots = s.slots,
                total = s.total(),
                "record counts"
            );
            Ok(true)
        }
        "audit" => {
            let report = registry.audit().await;
            let json = serde_json::to_string(&report)?;
            info!(
                service = "slotkeeper",
                event = "audit",
                clean = report.is_clean(),
                report = %json,
                "integrity audit finished"
            );
            Ok(report.is_clean())
        }
        other => Err(anyhow::anyhow!("unknown command {other:?}; expected summary or audit")),
    }
}

fn main() -> ExitCode {
    dotenv().ok();
    let (cfg, cfg_error) = load_config();
    common::utils::logging::init_logging(&cfg.logging.format);

    let run_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");
    info!(service = "slotkeeper", event = "logger_init", %run_id, pid, version, "tracing subscriber initialized");
    if let Some(e) = cfg_error {
        warn!(service = "slotkeeper", event = "config_fallback", error = %e, "config not loaded; using defaults");
    }

    std::panic::set_hook(Box::new(move |info| {
        error!(service = "slotkeeper", event = "panic", %run_id, pid, message = %info, "unhandled panic occurred");
    }));

    let command = std::env::args().nth(1).unwrap_or_else(|| "summary".to_string());

    let rt = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "slotkeeper", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run(&command, &cfg)) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            warn!(service = "slotkeeper", event = "stop", %command, "finished with dangling references");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!(service = "slotkeeper", event = "run_failed", %command, error = %e, "command failed");
            ExitCode::FAILURE
        }
    }
}
