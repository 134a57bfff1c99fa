use crate::catalog::Catalog;
use crate::models::{ChecklistItem, ItemStatus, LoadWarning, OverlayRecord};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

pub fn reconcile(catalog: &Catalog, overlay: Option<&[OverlayRecord]>) -> Vec<ChecklistItem> {
    // Repeated ids: the first record wins.
    let mut by_id: HashMap<&str, &OverlayRecord> = HashMap::new();
    for record in overlay.unwrap_or_default() {
        by_id.entry(record.id.as_str()).or_insert(record);
    }

    catalog
        .entries()
        .iter()
        .map(|entry| {
            let mut item = ChecklistItem::from_entry(entry);
            if let Some(record) = by_id.get(entry.id.as_str()) {
                item.status = record.status;
                item.notes = record.notes.clone();
            }
            item
        })
        .collect()
}

pub fn to_overlay(items: &[ChecklistItem]) -> Vec<OverlayRecord> {
    items.iter().map(OverlayRecord::from).collect()
}

/// Older saves stored whole items, sometimes with a null or missing notes
/// field. Only the user-owned fields are read back.
#[derive(Debug, Deserialize)]
struct StoredRecord {
    id: String,
    #[serde(default)]
    status: Option<ItemStatus>,
    #[serde(default)]
    notes: Option<String>,
}

#[derive(Debug, Default)]
pub struct DecodedOverlay {
    pub records: Option<Vec<OverlayRecord>>,
    pub warnings: Vec<LoadWarning>,
}

/// Parses a stored overlay blob. A blob that is not a JSON array is treated
/// as absent; individual malformed records are skipped.
pub fn decode_overlay(raw: Option<&str>) -> DecodedOverlay {
    let Some(raw) = raw else {
        return DecodedOverlay::default();
    };

    let values = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(values)) => values,
        Ok(other) => {
            return corrupt(format!("expected array, found {}", json_kind(&other)));
        }
        Err(error) => return corrupt(error.to_string()),
    };

    let mut decoded = DecodedOverlay {
        records: Some(Vec::with_capacity(values.len())),
        warnings: Vec::new(),
    };
    for (index, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<StoredRecord>(value) {
            Ok(stored) => {
                if let Some(records) = decoded.records.as_mut() {
                    records.push(OverlayRecord {
                        id: stored.id,
                        status: stored.status.unwrap_or_default(),
                        notes: stored.notes.unwrap_or_default(),
                    });
                }
            }
            Err(error) => {
                tracing::warn!(index, error = %error, "skipping malformed overlay record");
                decoded.warnings.push(LoadWarning::SkippedOverlayRecord {
                    index,
                    reason: error.to_string(),
                });
            }
        }
    }
    decoded
}

fn corrupt(reason: String) -> DecodedOverlay {
    tracing::warn!(reason = %reason, "stored overlay is unreadable; using catalog defaults");
    DecodedOverlay {
        records: None,
        warnings: vec![LoadWarning::CorruptOverlay { reason }],
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
