use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::domain::Day;
use crate::errors::{ArchiveError, ArchiveResult};
use crate::storage::traits::DayRepository;

/// One JSON file per day, named after the date (`2016-4-19`)
#[derive(Debug, Clone)]
pub struct JsonDayRepository {
    dir: PathBuf,
}

impl JsonDayRepository {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, date: &str) -> PathBuf {
        self.dir.join(date)
    }

    fn temp_path_for(&self, date: &str) -> PathBuf {
        self.dir.join(format!(".{}.tmp", date))
    }
}

impl DayRepository for JsonDayRepository {
    fn load(&self, date: &str) -> ArchiveResult<Option<Day>> {
        let path = self.path_for(date);

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ArchiveError::RecordRead {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })
            }
        };

        let day = serde_json::from_slice(&bytes).map_err(|e| ArchiveError::RecordDecode {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        Ok(Some(day))
    }

    fn store(&self, day: &Day) -> ArchiveResult<()> {
        let path = self.path_for(&day.date);
        let temp_path = self.temp_path_for(&day.date);
        let write_error = |e: std::io::Error| ArchiveError::RecordWrite {
            path: path.display().to_string(),
            message: e.to_string(),
        };

        let bytes = serde_json::to_vec_pretty(day)?;

        // Write beside the target, then rename over it
        fs::write(&temp_path, &bytes).map_err(write_error)?;
        if let Err(e) = fs::rename(&temp_path, &path) {
            let _ = fs::remove_file(&temp_path);
            return Err(write_error(e));
        }

        Ok(())
    }

    fn dates(&self) -> ArchiveResult<Vec<String>> {
        let mut dates = Vec::new();

        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            // Temp files and anything else that is not a date
            match calendar_key(&name) {
                Some(key) => dates.push((key, name)),
                None => tracing::debug!(file = %name, "Ignoring non-record file"),
            }
        }

        dates.sort();
        Ok(dates.into_iter().map(|(_, name)| name).collect())
    }
}

/// `(year, month, day)` for names like `2016-4-9`, so it sorts before `2016-10-1`
fn calendar_key(name: &str) -> Option<(u32, u32, u32)> {
    let mut parts = name.split('-').map(|p| p.parse::<u32>().ok());
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(Some(y)), Some(Some(m)), Some(Some(d)), None) => Some((y, m, d)),
        _ => None,
    }
}
