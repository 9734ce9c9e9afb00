//! Job files: saved defaults for the `vlookup`, `insert` and `update`
//! subcommands. Command-line flags override whatever the file sets.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use sheetql_core::{InsertConfig, UpdateConfig, VlookupJob};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JobFile {
    /// Sheet used by `insert` and `update` when `--sheet` is not given.
    pub sheet: Option<String>,
    pub insert: Option<InsertConfig>,
    pub update: Option<UpdateConfig>,
    pub vlookup: Option<VlookupJob>,
}

impl JobFile {
    /// Read a job file, choosing YAML or JSON by extension.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read job file: {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        let job = match ext.as_str() {
            "yaml" | "yml" => serde_yaml::from_str(&text)
                .with_context(|| format!("Invalid YAML job file: {}", path.display()))?,
            "json" => serde_json::from_str(&text)
                .with_context(|| format!("Invalid JSON job file: {}", path.display()))?,
            _ => bail!(
                "Unsupported job file '{}': expected .yaml, .yml or .json",
                path.display()
            ),
        };
        tracing::debug!(path = %path.display(), "loaded job file");
        Ok(job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetql_core::IdMode;
    use tempfile::tempdir;

    #[test]
    fn test_load_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("job.yaml");
        std::fs::write(
            &path,
            "sheet: Customers\ninsert:\n  tableName: customers\n  idMode: generate\n",
        )
        .unwrap();

        let job = JobFile::load(&path).unwrap();
        assert_eq!(job.sheet.as_deref(), Some("Customers"));
        let insert = job.insert.unwrap();
        assert_eq!(insert.table_name, "customers");
        assert_eq!(insert.id_mode, IdMode::Generate);
        assert!(job.update.is_none());
    }

    #[test]
    fn test_load_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("job.json");
        std::fs::write(
            &path,
            r#"{"vlookup":{"lookupSheet":"A","referenceSheet":"B","matchColumn":2}}"#,
        )
        .unwrap();

        let job = JobFile::load(&path).unwrap();
        let vlookup = job.vlookup.unwrap();
        assert_eq!(vlookup.lookup_sheet, "A");
        assert_eq!(vlookup.match_column, Some(2));
        assert_eq!(vlookup.lookup_column, None);
        assert!(vlookup.return_mappings.is_empty());
    }

    #[test]
    fn test_rejects_unknown_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("job.toml");
        std::fs::write(&path, "").unwrap();
        assert!(JobFile::load(&path).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = JobFile::load(Path::new("/nonexistent/job.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read job file"));
    }
}
