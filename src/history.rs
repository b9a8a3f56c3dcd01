//! Recent-search persistence: one JSON array of city names on disk

use std::fs;
use std::path::{Path, PathBuf};

use crate::state::RecentSearches;

pub const HISTORY_FILE_NAME: &str = "recent_searches.json";
pub const LOG_FILE_NAME: &str = "weather-dashboard.log";

#[derive(thiserror::Error, Debug)]
pub enum HistoryError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("recent searches file corrupted: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Per-user data directory for the dashboard's files
pub fn data_dir() -> PathBuf {
    dirs_next::data_local_dir()
        .map(|dir| dir.join("weather-dashboard"))
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn default_history_path() -> PathBuf {
    data_dir().join(HISTORY_FILE_NAME)
}

pub fn default_log_path() -> PathBuf {
    data_dir().join(LOG_FILE_NAME)
}

/// Read the stored list. A missing file or a `null` document is an empty list.
pub fn load(path: &Path) -> Result<RecentSearches, HistoryError> {
    if !path.exists() {
        return Ok(RecentSearches::default());
    }
    let json = fs::read_to_string(path).map_err(|source| HistoryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let cities: Option<Vec<String>> = serde_json::from_str(&json)?;
    Ok(RecentSearches::from_cities(cities.unwrap_or_default()))
}

/// Like [`load`], falling back to an empty list when the file is unreadable.
pub fn load_or_default(path: &Path) -> RecentSearches {
    match load(path) {
        Ok(recent) => recent,
        Err(error) => {
            tracing::warn!(%error, path = %path.display(), "ignoring unreadable recent searches");
            RecentSearches::default()
        }
    }
}

pub fn save(path: &Path, cities: &[String]) -> Result<(), HistoryError> {
    let io_error = |source| HistoryError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    let json = serde_json::to_string(cities)?;
    fs::write(path, json).map_err(io_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let recent = load(&dir.path().join(HISTORY_FILE_NAME)).unwrap();
        assert!(recent.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(HISTORY_FILE_NAME);
        let cities = vec!["Tokyo".to_string(), "Paris".to_string()];

        save(&path, &cities).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), r#"["Tokyo","Paris"]"#);
        assert_eq!(load(&path).unwrap().as_slice(), ["Tokyo", "Paris"]);
    }

    #[test]
    fn test_null_document_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(HISTORY_FILE_NAME);
        fs::write(&path, "null").unwrap();
        assert!(load(&path).unwrap().is_empty());
    }

    #[test]
    fn test_stored_list_is_normalized() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(HISTORY_FILE_NAME);
        fs::write(&path, r#"["A","B","A","C","D","E","F"]"#).unwrap();
        assert_eq!(load(&path).unwrap().as_slice(), ["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn test_corrupt_file_falls_back_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(HISTORY_FILE_NAME);
        fs::write(&path, "{not json").unwrap();

        assert!(matches!(load(&path), Err(HistoryError::Parse(_))));
        assert!(load_or_default(&path).is_empty());
    }
}
