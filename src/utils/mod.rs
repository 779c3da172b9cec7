//! Utility functions shared by the collectors
//!
//! JSON snapshot writing and the filename conventions for output files.

use anyhow::Context;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Serialize `value` as pretty JSON (4-space indent) into `dir/file_name`.
///
/// The directory is created when absent. Non-ASCII text is written as-is.
///
/// # Examples
/// ```
/// use tidings::utils::write_json_file;
///
/// let dir = tempfile::tempdir().unwrap();
/// let path = write_json_file(&dir.path().join("out"), "x.json", &vec!["ünïcode"]).unwrap();
/// let raw = std::fs::read_to_string(path).unwrap();
/// assert_eq!(raw, "[\n    \"ünïcode\"\n]");
/// ```
pub fn write_json_file<T: Serialize + ?Sized>(
    dir: &Path,
    file_name: &str,
    value: &T,
) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    let path = dir.join(file_name);

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut ser)
        .context("Failed to serialize results")?;

    fs::write(&path, &buf).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

/// File name for a news snapshot: spaces become `+`, matching the search query form.
///
/// # Examples
/// ```
/// use tidings::utils::news_file_name;
///
/// assert_eq!(news_file_name("Tata Motors"), "Tata+Motors.json");
/// ```
pub fn news_file_name(company: &str) -> String {
    format!("{}.json", query_form(company))
}

/// File name for a financial snapshot.
///
/// # Examples
/// ```
/// use tidings::utils::financial_file_name;
///
/// assert_eq!(financial_file_name("Apple"), "Apple_data.json");
/// ```
pub fn financial_file_name(company: &str) -> String {
    format!("{}_data.json", company)
}

/// Company name as it appears in search query strings
pub fn query_form(company: &str) -> String {
    company.replace(' ', "+")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_json_file_creates_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("data");
        assert!(!dir.exists());

        let path = write_json_file(&dir, "acme.json", &serde_json::json!([{"a": 1}])).unwrap();

        assert!(dir.exists());
        let parsed: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed[0]["a"], 1);
    }

    #[test]
    fn test_write_json_file_uses_four_space_indent() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_json_file(tmp.path(), "x.json", &serde_json::json!({"k": "v"})).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "{\n    \"k\": \"v\"\n}");
    }

    #[test]
    fn test_write_json_file_fails_when_dir_is_a_file() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, "x").unwrap();
        let err = write_json_file(&blocker, "x.json", &Vec::<u8>::new()).unwrap_err();
        assert!(err.to_string().contains("Failed to create output directory"));
    }

    #[test]
    fn test_file_names() {
        assert_eq!(news_file_name("Infosys"), "Infosys.json");
        assert_eq!(news_file_name("Tata Consultancy Services"), "Tata+Consultancy+Services.json");
        assert_eq!(financial_file_name("Tata Motors"), "Tata Motors_data.json");
    }
}
