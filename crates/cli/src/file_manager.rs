//! File system operations for lab output

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Create directory if it doesn't exist
pub fn ensure_dir_exists(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| Error::FileWrite {
        path: dir.display().to_string(),
        source: e,
    })
}

/// Turn a chart name into a file name: spaces and hyphens become `_`,
/// everything else that is not alphanumeric is dropped, and the result is
/// lowercased with `extension` appended
pub fn sanitize_file_name(name: &str, extension: &str) -> String {
    let stem: String = name
        .trim()
        .chars()
        .filter_map(|c| match c {
            ' ' | '-' | '_' => Some('_'),
            c if c.is_alphanumeric() => Some(c.to_ascii_lowercase()),
            _ => None,
        })
        .collect();
    format!("{}.{}", stem, extension)
}

/// Write `content` to `dir/file_name`, replacing any previous file
pub fn write_file(dir: &Path, file_name: &str, content: &str) -> Result<PathBuf> {
    ensure_dir_exists(dir)?;
    let path = dir.join(file_name);
    std::fs::write(&path, content).map_err(|e| Error::FileWrite {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("Quick Sort", "svg"), "quick_sort.svg");
        assert_eq!(sanitize_file_name("Floyd-Warshall", "svg"), "floyd_warshall.svg");
        assert_eq!(
            sanitize_file_name("Elements Very Close in Value Floats", "svg"),
            "elements_very_close_in_value_floats.svg"
        );
        assert_eq!(sanitize_file_name("low: Binet (fixed)", "svg"), "low_binet_fixed.svg");
    }

    #[test]
    fn test_write_file_creates_and_overwrites() {
        let root = TempDir::new().unwrap();
        let dir = root.path().join("sorting");

        let path = write_file(&dir, "chart.svg", "first").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "first");

        write_file(&dir, "chart.svg", "second").unwrap();
        assert_eq!(fs::read_to_string(dir.join("chart.svg")).unwrap(), "second");
    }
}
