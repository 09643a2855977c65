use crate::errors::{AppError, AppResult};
use crate::models::scanner::ScannerKind;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,

    /// Seconds during which a repeated scan of the same event is suppressed.
    #[serde(default = "default_cooldown")]
    pub cooldown_seconds: u64,

    /// Station name used by one-shot `scan` invocations.
    #[serde(default = "default_station")]
    pub station: String,

    #[serde(default = "default_bus_location")]
    pub bus_location: String,
    #[serde(default = "default_bus_recorder")]
    pub bus_recorder: String,

    #[serde(default = "default_school_location")]
    pub school_location: String,
    #[serde(default = "default_school_recorder")]
    pub school_recorder: String,
}

fn default_cooldown() -> u64 {
    10
}
fn default_station() -> String {
    "main".to_string()
}
fn default_bus_location() -> String {
    "School Bus".to_string()
}
fn default_bus_recorder() -> String {
    "Bus Driver".to_string()
}
fn default_school_location() -> String {
    "School Main Gate".to_string()
}
fn default_school_recorder() -> String {
    "School Authority".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self::with_database(Self::database_file().to_string_lossy().to_string())
    }
}

impl Config {
    fn with_database(database: String) -> Self {
        Self {
            database,
            cooldown_seconds: default_cooldown(),
            station: default_station(),
            bus_location: default_bus_location(),
            bus_recorder: default_bus_recorder(),
            school_location: default_school_location(),
            school_recorder: default_school_recorder(),
        }
    }

    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("rpickup")
        } else {
            let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
            home.join(".rpickup")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rpickup.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rpickup.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Location tag and recorder identity for a scanner kind.
    pub fn scanner_context(&self, scanner: ScannerKind) -> (&str, &str) {
        match scanner {
            ScannerKind::Bus => (&self.bus_location, &self.bus_recorder),
            ScannerKind::School => (&self.school_location, &self.school_recorder),
        }
    }

    /// Initialize configuration and database files.
    ///
    /// With `is_test` the configuration file is left untouched.
    pub fn init_all(&self, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();
        let db_path = PathBuf::from(&self.database);

        if !is_test {
            fs::create_dir_all(&dir)?;
            let yaml =
                serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
        }

        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        Ok(db_path)
    }
}
