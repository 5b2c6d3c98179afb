use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use osce_core::models::session::Station;
use osce_practice::session::SessionTiming;

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 1;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "default_stations")]
    pub stations: Vec<Station>,
    #[serde(default)]
    pub timing: TimingConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            bind_addr: default_bind_addr(),
            stations: default_stations(),
            timing: TimingConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn station(&self, id: &str) -> Option<&Station> {
        self.stations.iter().find(|s| s.id == id)
    }
}

/// Session timer settings. Added in v1; v0 files only carried a flat
/// `deterioration_seconds`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub deterioration_after_secs: u64,
    pub reply_delay_ms: u64,
    pub countdown_secs: u32,
    pub driver_tick_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            deterioration_after_secs: 60,
            reply_delay_ms: 500,
            countdown_secs: 10,
            driver_tick_ms: 100,
        }
    }
}

impl TimingConfig {
    pub fn driver_tick(&self) -> Duration {
        Duration::from_millis(self.driver_tick_ms.max(1))
    }

    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.reply_delay_ms)
    }
}

impl From<&TimingConfig> for SessionTiming {
    fn from(t: &TimingConfig) -> Self {
        SessionTiming {
            deterioration_after: Duration::from_secs(t.deterioration_after_secs),
            reply_delay: t.reply_delay(),
            countdown_secs: t.countdown_secs,
        }
    }
}

fn default_bind_addr() -> String {
    DEFAULT_BIND_ADDR.to_string()
}

fn default_stations() -> Vec<Station> {
    [
        ("station-1", "Station 1", "Room A"),
        ("station-2", "Station 2", "Room B"),
        ("station-3", "Station 3", "Room C"),
    ]
    .into_iter()
    .map(|(id, title, room)| Station {
        id: id.to_string(),
        title: title.to_string(),
        room: room.to_string(),
    })
    .collect()
}

fn config_dir() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("osce-practice"))
}

/// `$OSCE_CONFIG` if set, otherwise `<config_dir>/osce-practice/config.json`.
pub fn config_path() -> eyre::Result<PathBuf> {
    match std::env::var_os("OSCE_CONFIG") {
        Some(p) => Ok(PathBuf::from(p)),
        None => Ok(config_dir()?.join("config.json")),
    }
}

/// Load the config from the default location, applying the `OSCE_BIND`
/// override. A missing file yields defaults.
pub fn load_config() -> eyre::Result<ServerConfig> {
    let path = config_path()?;
    let mut config = if path.exists() {
        load_config_from(&path)?
    } else {
        tracing::info!(path = %path.display(), "no config file, using defaults");
        ServerConfig::default()
    };

    if let Ok(bind) = std::env::var("OSCE_BIND") {
        config.bind_addr = bind;
    }
    Ok(config)
}

pub fn load_config_from(path: &Path) -> eyre::Result<ServerConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    let config: ServerConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
/// Each migration is a pure transform on the raw JSON value.
fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION})"
        ));
    }

    // v0 → v1: fold flat deterioration_seconds into the timing block
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        let legacy = obj.remove("deterioration_seconds");
        let timing = obj
            .entry("timing")
            .or_insert_with(|| serde_json::Value::Object(serde_json::Map::new()));
        if let (Some(secs), Some(timing)) = (legacy, timing.as_object_mut()) {
            timing.entry("deterioration_after_secs").or_insert(secs);
        }
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1 (added timing)");
    }

    Ok(json)
}

pub fn save_config(path: &Path, config: &ServerConfig) -> eyre::Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| eyre::eyre!("config path has no parent: {}", path.display()))?;
    std::fs::create_dir_all(dir)?;

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;
    let json = serde_json::to_string_pretty(&stamped)?;

    // Write to a temp file then rename for atomicity
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;
    std::fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}
