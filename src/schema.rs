//! Transform options, column mapping, and the statistics reported back to callers.
//!
//! Options arrive either as a JSON payload (the `config` form field of the
//! preview/transform call sites) or as a YAML/JSON file passed to the CLI.
//! Every field is optional; anything absent falls back to the defaults below.

use std::{fs, path::Path};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_FINANCE_SENT_ITEM_LABEL: &str = "ส่งไฟแนนซ์";
pub const DEFAULT_FINANCE_BROKER_ITEM_LABEL: &str = "นายหน้าไฟแนนซ์";

#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("Invalid config payload: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("Reading options file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Parsing options file {path}: {source}")]
    File {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Semantic roles mapped to the actual column names of an input sheet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ColumnMapping {
    pub tank_no: String,
    pub item: String,
    pub sale_price: String,
    pub total_value: String,
    pub product_value: String,
    pub tax: String,
    pub com_fn: String,
    pub com: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            tank_no: "เลขถัง".to_string(),
            item: "รายการ".to_string(),
            sale_price: "ราคาขายเดิม".to_string(),
            total_value: "มูลค่ารวม".to_string(),
            product_value: "มูลค่าสินค้า".to_string(),
            tax: "ภาษี".to_string(),
            com_fn: "COM F/N".to_string(),
            com: "COM".to_string(),
        }
    }
}

impl ColumnMapping {
    /// Mapped column names in role order.
    pub fn required_columns(&self) -> [&str; 8] {
        [
            self.tank_no.as_str(),
            self.item.as_str(),
            self.sale_price.as_str(),
            self.total_value.as_str(),
            self.product_value.as_str(),
            self.tax.as_str(),
            self.com_fn.as_str(),
            self.com.as_str(),
        ]
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lowercase")]
pub enum DuplicateMode {
    /// Keep every row and flag duplicates
    #[default]
    Keep,
    /// Merge rows sharing a tank number into one row
    Group,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TransformOptions {
    pub mapping: ColumnMapping,
    pub duplicate_mode: DuplicateMode,
    pub finance_sent_item_label: String,
    pub finance_broker_item_label: String,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            mapping: ColumnMapping::default(),
            duplicate_mode: DuplicateMode::default(),
            finance_sent_item_label: DEFAULT_FINANCE_SENT_ITEM_LABEL.to_string(),
            finance_broker_item_label: DEFAULT_FINANCE_BROKER_ITEM_LABEL.to_string(),
        }
    }
}

impl TransformOptions {
    /// Loads options from a YAML or JSON file.
    pub fn load(path: &Path) -> Result<Self, OptionsError> {
        let raw = fs::read_to_string(path).map_err(|source| OptionsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&raw).map_err(|source| OptionsError::File {
            path: path.display().to_string(),
            source,
        })
    }
}

/// Parses the serialized options payload; absent or blank payloads yield defaults.
pub fn parse_options(payload: Option<&str>) -> Result<TransformOptions, OptionsError> {
    match payload.map(str::trim) {
        None | Some("") => Ok(TransformOptions::default()),
        Some(raw) => Ok(serde_json::from_str(raw)?),
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TransformStats {
    pub rows_in: usize,
    pub rows_out: usize,
    pub finance_sent_count: usize,
    pub finance_broker_count: usize,
    pub duplicate_tank_groups: usize,
    pub duplicate_rows: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_options_defaults_when_payload_missing_or_blank() {
        assert_eq!(parse_options(None).unwrap(), TransformOptions::default());
        assert_eq!(parse_options(Some("  ")).unwrap(), TransformOptions::default());
    }

    #[test]
    fn parse_options_fills_missing_fields_with_defaults() {
        let options =
            parse_options(Some(r#"{"duplicate_mode":"group","mapping":{"tax":"VAT"}}"#)).unwrap();
        assert_eq!(options.duplicate_mode, DuplicateMode::Group);
        assert_eq!(options.mapping.tax, "VAT");
        assert_eq!(options.mapping.tank_no, "เลขถัง");
        assert_eq!(
            options.finance_sent_item_label,
            DEFAULT_FINANCE_SENT_ITEM_LABEL
        );
    }

    #[test]
    fn parse_options_rejects_malformed_payloads() {
        let err = parse_options(Some("{not json")).unwrap_err();
        assert!(err.to_string().starts_with("Invalid config payload:"));

        let err = parse_options(Some(r#"{"duplicate_mode":"merge"}"#)).unwrap_err();
        assert!(matches!(err, OptionsError::Payload(_)));
    }

    #[test]
    fn required_columns_follow_role_order() {
        let mapping = ColumnMapping::default();
        assert_eq!(
            mapping.required_columns(),
            [
                "เลขถัง",
                "รายการ",
                "ราคาขายเดิม",
                "มูลค่ารวม",
                "มูลค่าสินค้า",
                "ภาษี",
                "COM F/N",
                "COM"
            ]
        );
    }
}
