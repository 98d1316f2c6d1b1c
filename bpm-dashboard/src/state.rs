use crate::config::{Config, DEFAULT_FAILING_RATIO};
use crate::pipeline_health::{HealthProbe, RandomHealthProbe};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const DATA_ALL_FILE: &str = "data-all.json";
pub const DATA_USERS_FILE: &str = "data-users.json";

pub struct AppState {
    pub data_dir: PathBuf,
    pub health: Arc<dyn HealthProbe>,
}

impl AppState {
    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        let data_dir = cfg.data_dir();
        // Relative paths are kept as-is so they follow the working directory
        if !data_dir.is_dir() {
            warn!(
                "Data directory '{}' does not exist yet; data endpoints will return 404",
                data_dir.display()
            );
        }
        info!("Serving data files from '{}'", data_dir.display());

        let failing_ratio = cfg.failing_ratio.unwrap_or(DEFAULT_FAILING_RATIO);
        let probe = RandomHealthProbe::new(failing_ratio, cfg.health_seed)?;
        debug!(
            "Pipeline health mock: failing_ratio={} seeded={}",
            probe.failing_ratio(),
            cfg.health_seed.is_some()
        );

        Ok(AppState {
            data_dir,
            health: Arc::new(probe),
        })
    }

    pub fn with_probe(data_dir: impl Into<PathBuf>, health: Arc<dyn HealthProbe>) -> Self {
        AppState {
            data_dir: data_dir.into(),
            health,
        }
    }

    pub fn data_file(&self, name: &str) -> PathBuf {
        self.data_dir.join(name)
    }
}
