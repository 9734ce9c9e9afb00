//! Statement generation settings.
//!
//! Both configs deserialize from camelCase YAML/JSON; missing keys take the
//! defaults below.

use serde::{Deserialize, Serialize};

/// Where INSERT primary keys come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdMode {
    /// Use the values already in the PK column.
    #[default]
    Existing,
    /// Replace the PK column with generated sequential IDs.
    Generate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InsertConfig {
    pub table_name: String,
    pub pk_column: usize,
    pub id_mode: IdMode,
    pub id_prefix: String,
    pub id_total_length: usize,
    pub id_start_number: i64,
    pub include_column_names: bool,
    pub treat_empty_as_null: bool,
}

impl Default for InsertConfig {
    fn default() -> Self {
        Self {
            table_name: "my_table".to_string(),
            pk_column: 0,
            id_mode: IdMode::Existing,
            id_prefix: "ID-".to_string(),
            id_total_length: 10,
            id_start_number: 1,
            include_column_names: false,
            treat_empty_as_null: false,
        }
    }
}

impl InsertConfig {
    /// Whether the PK column is replaced by generated IDs.
    #[must_use]
    pub fn generates_ids(&self) -> bool {
        self.id_mode == IdMode::Generate
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateConfig {
    pub table_name: String,
    pub pk_column: usize,
    /// Columns written in the SET clause, in this order.
    pub set_columns: Vec<usize>,
    pub treat_empty_as_null: bool,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            table_name: "my_table".to_string(),
            pk_column: 0,
            set_columns: Vec::new(),
            treat_empty_as_null: false,
        }
    }
}

impl UpdateConfig {
    /// Set columns with the PK column removed.
    #[must_use]
    pub fn effective_set_columns(&self) -> Vec<usize> {
        self.set_columns
            .iter()
            .copied()
            .filter(|&c| c != self.pk_column)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_defaults() {
        let config = InsertConfig::default();
        assert_eq!(config.table_name, "my_table");
        assert_eq!(config.id_prefix, "ID-");
        assert_eq!(config.id_total_length, 10);
        assert_eq!(config.id_start_number, 1);
        assert!(!config.generates_ids());
    }

    #[test]
    fn test_insert_from_partial_yaml() {
        let yaml = "tableName: customers\nidMode: generate\nidPrefix: C\n";
        let config: InsertConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.table_name, "customers");
        assert!(config.generates_ids());
        assert_eq!(config.id_prefix, "C");
        assert_eq!(config.id_total_length, 10);
    }

    #[test]
    fn test_update_from_json() {
        let json = r#"{"tableName":"t","pkColumn":1,"setColumns":[0,1,2],"treatEmptyAsNull":true}"#;
        let config: UpdateConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.set_columns, vec![0, 1, 2]);
        assert_eq!(config.effective_set_columns(), vec![0, 2]);
        assert!(config.treat_empty_as_null);
    }
}
