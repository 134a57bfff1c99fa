use crate::board::{decode_layout, sync};
use crate::catalog::Catalog;
use crate::errors::{AppError, AppResult};
use crate::models::{Board, ChecklistItem, LoadWarning};
use crate::reconcile::{decode_overlay, reconcile, to_overlay};
use crate::store::{OverlayStore, LAYOUT_KEY, OVERLAY_KEY};

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub items: Vec<ChecklistItem>,
    pub board: Board,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    pub overlay_json: String,
    pub layout_json: String,
}

impl StateSnapshot {
    pub fn write_to(&self, store: &dyn OverlayStore) -> AppResult<()> {
        store.write_blob(OVERLAY_KEY, &self.overlay_json)?;
        store.write_blob(LAYOUT_KEY, &self.layout_json)
    }
}

impl AppState {
    /// Restores state from the store. Unreadable blobs never fail the load:
    /// they fall back to defaults and are reported as warnings. A store that
    /// cannot be read at all is treated the same way.
    pub fn load(
        store: &dyn OverlayStore,
        catalog: &Catalog,
        default_column: &str,
    ) -> (AppState, Vec<LoadWarning>) {
        let mut warnings = Vec::new();

        let overlay_raw = read_or_warn(store, OVERLAY_KEY, &mut warnings, |reason| {
            LoadWarning::CorruptOverlay { reason }
        });
        let overlay = decode_overlay(overlay_raw.as_deref());
        warnings.extend(overlay.warnings);
        let items = reconcile(catalog, overlay.records.as_deref());

        let layout_raw = read_or_warn(store, LAYOUT_KEY, &mut warnings, |reason| {
            LoadWarning::CorruptLayout { reason }
        });
        let layout = decode_layout(layout_raw.as_deref(), catalog);
        warnings.extend(layout.warnings);

        let board = match sync(&items, &layout.board, default_column) {
            Ok(board) => board,
            Err(error) => {
                tracing::warn!(column_id = %default_column, error = %error, "default column missing; new items stay off the board");
                warnings.push(LoadWarning::UnknownDefaultColumn {
                    column_id: default_column.to_string(),
                });
                layout.board
            }
        };

        tracing::info!(
            items = items.len(),
            placed = board.total_items(),
            warnings = warnings.len(),
            "loaded audit state"
        );
        (AppState { items, board }, warnings)
    }

    pub fn snapshot(&self) -> AppResult<StateSnapshot> {
        Ok(StateSnapshot {
            overlay_json: serde_json::to_string(&to_overlay(&self.items))?,
            layout_json: serde_json::to_string(&self.board)?,
        })
    }

    pub fn save(&self, store: &dyn OverlayStore) -> AppResult<()> {
        self.snapshot()?.write_to(store)
    }

    pub fn item(&self, item_id: &str) -> Option<&ChecklistItem> {
        self.items.iter().find(|item| item.id == item_id)
    }

    pub(crate) fn item_mut(&mut self, item_id: &str) -> AppResult<&mut ChecklistItem> {
        self.items
            .iter_mut()
            .find(|item| item.id == item_id)
            .ok_or_else(|| AppError::NotFound(format!("checklist item {}", item_id)))
    }
}

fn read_or_warn(
    store: &dyn OverlayStore,
    key: &str,
    warnings: &mut Vec<LoadWarning>,
    to_warning: impl FnOnce(String) -> LoadWarning,
) -> Option<String> {
    match store.read_blob(key) {
        Ok(raw) => raw,
        Err(error) => {
            tracing::warn!(key, error = %error, "reading stored state failed; using defaults");
            warnings.push(to_warning(error.to_string()));
            None
        }
    }
}
