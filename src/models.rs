use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ItemStatus {
    #[default]
    #[serde(rename = "Not Implemented", alias = "NotImplemented")]
    NotImplemented,
    #[serde(rename = "Planned")]
    Planned,
    #[serde(rename = "Implemented")]
    Implemented,
    #[serde(rename = "N/A", alias = "NotApplicable")]
    NotApplicable,
}

impl ItemStatus {
    pub const ALL: [ItemStatus; 4] = [
        Self::Implemented,
        Self::Planned,
        Self::NotImplemented,
        Self::NotApplicable,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotImplemented => "Not Implemented",
            Self::Planned => "Planned",
            Self::Implemented => "Implemented",
            Self::NotApplicable => "N/A",
        }
    }

    pub fn is_actionable(self) -> bool {
        match self {
            Self::NotImplemented | Self::Planned => true,
            Self::Implemented | Self::NotApplicable => false,
        }
    }

    pub fn is_applicable(self) -> bool {
        match self {
            Self::NotApplicable => false,
            Self::NotImplemented | Self::Planned | Self::Implemented => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Impact {
    Critical,
    High,
    Medium,
    Low,
}

impl Impact {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    pub fn is_severe(self) -> bool {
        match self {
            Self::Critical | Self::High => true,
            Self::Medium | Self::Low => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub id: String,
    pub category: String,
    #[serde(alias = "item")]
    pub text: String,
    pub impact: Impact,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub id: String,
    pub category: String,
    pub text: String,
    pub impact: Impact,
    pub link: String,
    pub status: ItemStatus,
    pub notes: String,
}

impl ChecklistItem {
    pub fn from_entry(entry: &CatalogEntry) -> Self {
        Self {
            id: entry.id.clone(),
            category: entry.category.clone(),
            text: entry.text.clone(),
            impact: entry.impact,
            link: entry.link.clone(),
            status: ItemStatus::default(),
            notes: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayRecord {
    pub id: String,
    pub status: ItemStatus,
    pub notes: String,
}

impl From<&ChecklistItem> for OverlayRecord {
    fn from(item: &ChecklistItem) -> Self {
        Self {
            id: item.id.clone(),
            status: item.status,
            notes: item.notes.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardColumn {
    pub id: String,
    pub title: String,
    pub item_ids: Vec<String>,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub bg: String,
}

/// Planning board keyed by column id. Columns are shared so that a move
/// only allocates the columns it touches.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    pub columns: BTreeMap<String, Arc<BoardColumn>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Move {
    pub source_column: String,
    pub source_index: usize,
    pub dest_column: String,
    pub dest_index: usize,
    pub item_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScore {
    pub category: String,
    pub score: u8,
    pub implemented: usize,
    pub applicable: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    pub per_category: Vec<CategoryScore>,
    pub overall: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriticalGap {
    pub id: String,
    pub category: String,
    pub text: String,
    pub impact: Impact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MaturityBand {
    Strong,
    Developing,
    Weak,
}

impl MaturityBand {
    pub fn for_score(score: u8) -> Self {
        if score >= 70 {
            Self::Strong
        } else if score >= 40 {
            Self::Developing
        } else {
            Self::Weak
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentReport {
    pub generated_at: DateTime<Utc>,
    pub catalog_version: String,
    pub overall_score: u8,
    pub maturity: MaturityBand,
    pub categories: Vec<CategoryScore>,
    pub critical_gaps: Vec<CriticalGap>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SaveIndicator {
    Saving,
    Saved,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySection {
    pub category: String,
    pub items: Vec<ChecklistItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardCard {
    pub id: String,
    pub text: String,
    pub category: String,
    pub impact: Impact,
    pub status: ItemStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardColumnView {
    pub id: String,
    pub title: String,
    pub color: String,
    pub bg: String,
    pub count: usize,
    pub cards: Vec<BoardCard>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum LoadWarning {
    CorruptOverlay { reason: String },
    SkippedOverlayRecord { index: usize, reason: String },
    CorruptLayout { reason: String },
    MissingColumn { column_id: String },
    DuplicateBoardEntry { item_id: String, column_id: String },
    UnknownBoardEntry { item_id: String, column_id: String },
    UnknownDefaultColumn { column_id: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub persist_debounce_ms: u64,
    pub default_column: String,
    pub autoflush_interval_ms: u64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            persist_debounce_ms: 1000,
            default_column: "phase1".to_string(),
            autoflush_interval_ms: 250,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchitectureScenario {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchSummary {
    pub report: AssessmentReport,
    pub checklist: Vec<CategorySection>,
    pub board: Vec<BoardColumnView>,
    pub warnings: Vec<LoadWarning>,
    pub last_saved_at: Option<DateTime<Utc>>,
}
