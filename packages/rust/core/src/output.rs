//! Dataset file layout and atomic JSON writes.
//!
//! Raw collection output lands under `data/raw/`, enriched output under
//! `data/processed/`, both with dated filenames. Files are written to a
//! sibling temp path and renamed into place so a crashed run never leaves a
//! half-written dataset behind.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;

use threadpull_shared::{CollectionResult, Result, ThreadpullError};

/// Path of the raw identifier dataset for a given run date.
pub fn raw_output_path(root: &Path, date: NaiveDate) -> PathBuf {
    root.join("data")
        .join("raw")
        .join(format!("tweets_and_replies_{}.json", date.format("%Y-%m-%d")))
}

/// Path of the enriched dataset for a given run date.
pub fn processed_output_path(root: &Path, date: NaiveDate) -> PathBuf {
    root.join("data")
        .join("processed")
        .join(format!("enriched_tweets_{}.json", date.format("%Y-%m-%d")))
}

/// Serialize `value` as pretty JSON and write it atomically to `path`,
/// creating parent directories as needed.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ThreadpullError::io(parent, e))?;
    }

    let content = serde_json::to_vec_pretty(value)
        .map_err(|e| ThreadpullError::validation(format!("serialize {}: {e}", path.display())))?;

    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, content).map_err(|e| ThreadpullError::io(&tmp, e))?;
    std::fs::rename(&tmp, path).map_err(|e| ThreadpullError::io(path, e))?;

    Ok(())
}

/// Load a previously written raw dataset.
pub fn load_result(path: &Path) -> Result<CollectionResult> {
    let content = std::fs::read_to_string(path).map_err(|e| ThreadpullError::io(path, e))?;
    serde_json::from_str(&content)
        .map_err(|e| ThreadpullError::validation(format!("parse {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use threadpull_shared::Post;

    fn tmp_root(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("tp-output-test-{tag}-{}", std::process::id()))
    }

    fn sample() -> CollectionResult {
        CollectionResult {
            posts: vec![Post {
                id: "42".into(),
                replies: vec!["43".into(), "44".into()],
                collected_on: NaiveDate::from_ymd_opt(2024, 11, 5).unwrap(),
            }],
        }
    }

    #[test]
    fn dated_paths() {
        let date = NaiveDate::from_ymd_opt(2024, 11, 5).unwrap();
        let raw = raw_output_path(Path::new("/var/tp"), date);
        assert_eq!(
            raw,
            Path::new("/var/tp/data/raw/tweets_and_replies_2024-11-05.json")
        );

        let processed = processed_output_path(Path::new("/var/tp"), date);
        assert_eq!(
            processed,
            Path::new("/var/tp/data/processed/enriched_tweets_2024-11-05.json")
        );
    }

    #[test]
    fn write_then_load_roundtrip() {
        let root = tmp_root("roundtrip");
        let date = NaiveDate::from_ymd_opt(2024, 11, 5).unwrap();
        let path = raw_output_path(&root, date);

        let original = sample();
        write_json(&path, &original).expect("write");

        let loaded = load_result(&path).expect("load");
        assert_eq!(loaded, original);

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn write_leaves_no_temp_file() {
        let root = tmp_root("atomic");
        let date = NaiveDate::from_ymd_opt(2024, 11, 5).unwrap();
        let path = raw_output_path(&root, date);

        write_json(&path, &sample()).expect("write");

        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = load_result(Path::new("/nonexistent/tp/file.json")).unwrap_err();
        assert!(matches!(err, ThreadpullError::Io { .. }));
    }
}
