use crate::catalog::Catalog;
use crate::errors::{AppError, AppResult};
use crate::models::{
    Board, BoardCard, BoardColumn, BoardColumnView, ChecklistItem, LoadWarning, Move,
};
use crate::reconcile::json_kind;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

const PHASES: [(&str, &str, &str, &str); 3] = [
    ("phase1", "Phase 1: Immediate", "border-red-500", "bg-red-50"),
    ("phase2", "Phase 2: Short-term", "border-orange-500", "bg-orange-50"),
    ("phase3", "Phase 3: Long-term", "border-blue-500", "bg-blue-50"),
];

pub fn initial_board() -> Board {
    let columns = PHASES
        .iter()
        .map(|(id, title, color, bg)| {
            (
                id.to_string(),
                Arc::new(BoardColumn {
                    id: id.to_string(),
                    title: title.to_string(),
                    item_ids: Vec::new(),
                    color: color.to_string(),
                    bg: bg.to_string(),
                }),
            )
        })
        .collect();
    Board { columns }
}

impl Board {
    pub fn column(&self, column_id: &str) -> Option<&Arc<BoardColumn>> {
        self.columns.get(column_id)
    }

    pub fn total_items(&self) -> usize {
        self.columns.values().map(|column| column.item_ids.len()).sum()
    }

    pub fn placed_ids(&self) -> HashSet<&str> {
        self.columns
            .values()
            .flat_map(|column| column.item_ids.iter().map(String::as_str))
            .collect()
    }

    pub fn column_of(&self, item_id: &str) -> Option<&str> {
        self.columns
            .values()
            .find(|column| column.item_ids.iter().any(|id| id == item_id))
            .map(|column| column.id.as_str())
    }
}

#[derive(Debug, Default)]
pub struct DecodedLayout {
    pub board: Board,
    pub warnings: Vec<LoadWarning>,
}

/// Parses a stored layout blob and repairs it against the catalog. The fixed
/// phases are always present afterwards, ids appear in at most one column,
/// and ids the catalog does not know are dropped.
pub fn decode_layout(raw: Option<&str>, catalog: &Catalog) -> DecodedLayout {
    let Some(raw) = raw else {
        return DecodedLayout {
            board: initial_board(),
            warnings: Vec::new(),
        };
    };

    let parsed = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => serde_json::from_value::<Board>(Value::Object(map))
            .map_err(|error| error.to_string()),
        Ok(other) => Err(format!("expected object, found {}", json_kind(&other))),
        Err(error) => Err(error.to_string()),
    };

    match parsed {
        Ok(board) => sanitize(board, catalog),
        Err(reason) => {
            tracing::warn!(reason = %reason, "stored roadmap layout is unreadable; starting from empty phases");
            DecodedLayout {
                board: initial_board(),
                warnings: vec![LoadWarning::CorruptLayout { reason }],
            }
        }
    }
}

fn sanitize(board: Board, catalog: &Catalog) -> DecodedLayout {
    let mut warnings = Vec::new();
    let mut seen = HashSet::new();
    let mut columns = BTreeMap::new();

    for (key, column) in board.columns {
        let mut column = Arc::unwrap_or_clone(column);
        // The map key is authoritative for where moves address the column.
        column.id = key.clone();
        column.item_ids.retain(|item_id| {
            if !catalog.contains(item_id) {
                tracing::warn!(item_id = %item_id, column_id = %key, "dropping unknown item from roadmap layout");
                warnings.push(LoadWarning::UnknownBoardEntry {
                    item_id: item_id.clone(),
                    column_id: key.clone(),
                });
                return false;
            }
            if !seen.insert(item_id.clone()) {
                tracing::warn!(item_id = %item_id, column_id = %key, "dropping duplicate roadmap entry");
                warnings.push(LoadWarning::DuplicateBoardEntry {
                    item_id: item_id.clone(),
                    column_id: key.clone(),
                });
                return false;
            }
            true
        });
        columns.insert(key, Arc::new(column));
    }

    for (id, column) in initial_board().columns {
        if !columns.contains_key(&id) {
            tracing::warn!(column_id = %id, "restoring missing roadmap column");
            warnings.push(LoadWarning::MissingColumn {
                column_id: id.clone(),
            });
            columns.insert(id, column);
        }
    }

    DecodedLayout {
        board: Board { columns },
        warnings,
    }
}

/// Appends every actionable item that is not yet on the board to the default
/// column, in item order. Items already placed stay where they are, even if
/// they are no longer actionable. When nothing is missing the board is
/// returned as-is.
pub fn sync(items: &[ChecklistItem], board: &Board, default_column: &str) -> AppResult<Board> {
    let placed = board.placed_ids();
    let to_insert = items
        .iter()
        .filter(|item| item.status.is_actionable() && !placed.contains(item.id.as_str()))
        .map(|item| item.id.clone())
        .collect::<Vec<_>>();

    if to_insert.is_empty() {
        return Ok(board.clone());
    }

    let Some(target) = board.column(default_column) else {
        return Err(AppError::NotFound(format!(
            "default column {} is not on the board",
            default_column
        )));
    };

    tracing::debug!(column_id = %default_column, count = to_insert.len(), "adding actionable items to roadmap");
    let mut column = BoardColumn::clone(target);
    column.item_ids.extend(to_insert);

    let mut next = board.clone();
    next.columns.insert(default_column.to_string(), Arc::new(column));
    Ok(next)
}

/// Applies one move. The board is never modified in place: on success the
/// returned board shares every column the move did not touch.
pub fn apply_move(board: &Board, mv: &Move) -> AppResult<Board> {
    let Some(source) = board.column(&mv.source_column) else {
        return Err(AppError::StaleMove(format!(
            "unknown source column {}",
            mv.source_column
        )));
    };
    let Some(dest) = board.column(&mv.dest_column) else {
        return Err(AppError::StaleMove(format!(
            "unknown destination column {}",
            mv.dest_column
        )));
    };
    match source.item_ids.get(mv.source_index) {
        Some(found) if *found == mv.item_id => {}
        Some(found) => {
            return Err(AppError::StaleMove(format!(
                "{}[{}] holds {}, not {}",
                mv.source_column, mv.source_index, found, mv.item_id
            )));
        }
        None => {
            return Err(AppError::StaleMove(format!(
                "{}[{}] is out of range",
                mv.source_column, mv.source_index
            )));
        }
    }

    if mv.source_column == mv.dest_column && mv.source_index == mv.dest_index {
        return Ok(board.clone());
    }

    let mut next = board.clone();
    if mv.source_column == mv.dest_column {
        let mut column = BoardColumn::clone(source);
        let id = column.item_ids.remove(mv.source_index);
        let at = mv.dest_index.min(column.item_ids.len());
        column.item_ids.insert(at, id);
        next.columns.insert(column.id.clone(), Arc::new(column));
        return Ok(next);
    }

    let mut from = BoardColumn::clone(source);
    let id = from.item_ids.remove(mv.source_index);
    let mut to = BoardColumn::clone(dest);
    let at = mv.dest_index.min(to.item_ids.len());
    to.item_ids.insert(at, id);

    next.columns.insert(mv.source_column.clone(), Arc::new(from));
    next.columns.insert(mv.dest_column.clone(), Arc::new(to));
    Ok(next)
}

pub fn column_views(board: &Board, items: &[ChecklistItem]) -> Vec<BoardColumnView> {
    let by_id: HashMap<&str, &ChecklistItem> =
        items.iter().map(|item| (item.id.as_str(), item)).collect();

    board
        .columns
        .values()
        .map(|column| {
            let cards = column
                .item_ids
                .iter()
                .filter_map(|id| by_id.get(id.as_str()))
                .map(|item| BoardCard {
                    id: item.id.clone(),
                    text: item.text.clone(),
                    category: item.category.clone(),
                    impact: item.impact,
                    status: item.status,
                })
                .collect::<Vec<_>>();
            BoardColumnView {
                id: column.id.clone(),
                title: column.title.clone(),
                color: column.color.clone(),
                bg: column.bg.clone(),
                count: cards.len(),
                cards,
            }
        })
        .collect()
}
