use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{ChannelGroup, ChannelGroups};
use crate::errors::{ArchiveError, ArchiveResult};

/// Reads owner/channel fragments from a file or a directory of `.json` files
pub struct ConfigLoader {
    path: PathBuf,
}

impl ConfigLoader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Load every fragment and merge them into canonical groups
    pub fn load(&self) -> ArchiveResult<ChannelGroups> {
        let mut fragments = Vec::new();

        for path in self.fragment_paths()? {
            let text = fs::read_to_string(&path).map_err(|e| ArchiveError::ConfigParse {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            fragments.push(decode_fragment(&path.display().to_string(), &text)?);
        }

        ChannelGroups::merge(fragments)
    }

    /// Fragment files in lexical name order. Subdirectories are not walked.
    pub fn fragment_paths(&self) -> ArchiveResult<Vec<PathBuf>> {
        if self.path.is_file() {
            return Ok(vec![self.path.clone()]);
        }

        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.path)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }

        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(paths)
    }
}

fn decode_fragment(name: &str, text: &str) -> ArchiveResult<Vec<ChannelGroup>> {
    serde_json::from_str(text).map_err(|e| ArchiveError::ConfigParse {
        path: name.to_string(),
        message: e.to_string(),
    })
}
