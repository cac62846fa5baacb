use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::TimezoneTable;
use crate::errors::{ArchiveError, ArchiveResult};
use crate::sources::rss::DEFAULT_TIMEOUT;

const DATA_DIR: &str = "data";
const CHANNELS_DIR: &str = "channels";
const ITEMS_DIR: &str = "items";

#[derive(Debug, Clone)]
pub struct Config {
    pub base_dir: PathBuf,
    pub channels_dir: PathBuf,
    pub items_dir: PathBuf,
    pub fetch_timeout: Duration,
    pub timezones: TimezoneTable,
}

impl Config {
    /// Get the directory where the executable is located
    fn exe_dir() -> Option<PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let data_dir = base_dir.join(DATA_DIR);

        Self {
            channels_dir: data_dir.join(CHANNELS_DIR),
            items_dir: data_dir.join(ITEMS_DIR),
            base_dir,
            fetch_timeout: DEFAULT_TIMEOUT,
            timezones: TimezoneTable::default(),
        }
    }

    pub fn from_env<P: AsRef<Path>>(base_dir: P) -> ArchiveResult<Self> {
        // Try to load .env from executable's directory first
        if let Some(dir) = Self::exe_dir() {
            let env_path = dir.join(".env");
            if env_path.exists() {
                dotenvy::from_path(&env_path).ok();
            }
        }
        // Fall back to current directory
        dotenvy::dotenv().ok();

        let mut config = Self::new(base_dir);

        if let Ok(value) = std::env::var("DAYBOOK_FETCH_TIMEOUT_SECS") {
            let secs: u64 = value.trim().parse().map_err(|_| {
                ArchiveError::Config(format!("DAYBOOK_FETCH_TIMEOUT_SECS is not a number: {}", value))
            })?;
            config.fetch_timeout = Duration::from_secs(secs);
        }

        if let Ok(value) = std::env::var("DAYBOOK_TIMEZONES") {
            config.timezones = parse_timezones(&value, config.timezones)?;
        }

        Ok(config)
    }

    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join(DATA_DIR)
    }

    /// Check the input directories and create the output directory if needed
    pub fn prepare_layout(&self) -> ArchiveResult<()> {
        require_dir(&self.base_dir, "Base dir")?;
        require_dir(&self.data_dir(), "Data dir")?;
        require_dir(&self.channels_dir, "Input dir")?;

        if !self.items_dir.exists() {
            fs::create_dir(&self.items_dir).map_err(|e| {
                ArchiveError::Layout(format!(
                    "Unable to create dir '{}': {}",
                    self.items_dir.display(),
                    e
                ))
            })?;
        }
        require_dir(&self.items_dir, "Output dir")
    }
}

fn require_dir(path: &Path, label: &str) -> ArchiveResult<()> {
    let metadata = fs::metadata(path).map_err(|e| {
        ArchiveError::Layout(format!("{} '{}' does not exist: {}", label, path.display(), e))
    })?;
    if !metadata.is_dir() {
        return Err(ArchiveError::Layout(format!(
            "{} '{}' is not a directory",
            label,
            path.display()
        )));
    }
    Ok(())
}

/// Parse `ABBR=Area/City` pairs separated by `,` or `;` on top of `table`
pub fn parse_timezones(value: &str, mut table: TimezoneTable) -> ArchiveResult<TimezoneTable> {
    for pair in value.split([',', ';']).map(str::trim).filter(|p| !p.is_empty()) {
        let (abbreviation, zone) = pair.split_once('=').ok_or_else(|| {
            ArchiveError::Config(format!("Expected ABBR=Area/City, got '{}'", pair))
        })?;
        let abbreviation = abbreviation.trim();
        if abbreviation.is_empty() || !abbreviation.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ArchiveError::Config(format!(
                "Time zone abbreviation must be uppercase letters: '{}'",
                abbreviation
            )));
        }
        table.insert(abbreviation, zone.trim())?;
    }
    Ok(table)
}
