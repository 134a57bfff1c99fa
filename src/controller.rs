use crate::board::{self, column_views};
use crate::catalog::Catalog;
use crate::errors::AppResult;
use crate::models::{
    AppSettings, AssessmentReport, Board, BoardColumnView, CategorySection, ChecklistItem,
    CriticalGap, ItemStatus, LoadWarning, Move, SaveIndicator, StatsReport,
};
use crate::report::{assessment_report, items_by_category};
use crate::scheduler::{Clock, FlushOutcome, PersistenceScheduler};
use crate::state::AppState;
use crate::stats::{aggregate, critical_gaps};
use crate::store::{OverlayStore, LAYOUT_KEY, OVERLAY_KEY};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Duration;

/// Single owner of the live audit state. Every mutation runs to completion
/// synchronously; only the write back to the store is deferred.
pub struct AuditController {
    catalog: Arc<Catalog>,
    store: Arc<dyn OverlayStore>,
    settings: AppSettings,
    state: AppState,
    scheduler: PersistenceScheduler,
    warnings: Vec<LoadWarning>,
}

impl AuditController {
    pub fn load(
        store: Arc<dyn OverlayStore>,
        catalog: Arc<Catalog>,
        settings: AppSettings,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (state, warnings) = AppState::load(store.as_ref(), &catalog, &settings.default_column);
        let scheduler =
            PersistenceScheduler::new(clock, Duration::from_millis(settings.persist_debounce_ms));
        let mut controller = Self {
            catalog,
            store,
            settings,
            state,
            scheduler,
            warnings,
        };
        // Newly placed items and repaired blobs are written back like any
        // other change.
        if !controller.matches_store() {
            controller.schedule_write();
        }
        controller
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn items(&self) -> &[ChecklistItem] {
        &self.state.items
    }

    pub fn board(&self) -> &Board {
        &self.state.board
    }

    pub fn warnings(&self) -> &[LoadWarning] {
        &self.warnings
    }

    pub fn set_status(&mut self, item_id: &str, status: ItemStatus) -> AppResult<()> {
        let item = self.state.item_mut(item_id)?;
        if item.status == status {
            return Ok(());
        }
        tracing::info!(item_id = %item_id, from = item.status.as_str(), to = status.as_str(), "status changed");
        item.status = status;

        if status.is_actionable() {
            match board::sync(&self.state.items, &self.state.board, &self.settings.default_column) {
                Ok(next) => self.state.board = next,
                Err(error) => {
                    tracing::warn!(item_id = %item_id, error = %error, "could not place item on roadmap");
                }
            }
        }
        self.schedule_write();
        Ok(())
    }

    pub fn set_notes(&mut self, item_id: &str, notes: impl Into<String>) -> AppResult<()> {
        let notes = notes.into();
        let item = self.state.item_mut(item_id)?;
        if item.notes == notes {
            return Ok(());
        }
        item.notes = notes;
        tracing::debug!(item_id = %item_id, "notes changed");
        self.schedule_write();
        Ok(())
    }

    pub fn apply_move(&mut self, mv: &Move) -> AppResult<()> {
        let next = match board::apply_move(&self.state.board, mv) {
            Ok(next) => next,
            Err(error) => {
                tracing::debug!(item_id = %mv.item_id, error = %error, "rejected roadmap move");
                return Err(error);
            }
        };
        if next == self.state.board {
            return Ok(());
        }
        tracing::info!(
            item_id = %mv.item_id,
            from = %mv.source_column,
            to = %mv.dest_column,
            index = mv.dest_index,
            "moved roadmap item"
        );
        self.state.board = next;
        self.schedule_write();
        Ok(())
    }

    pub fn stats(&self) -> StatsReport {
        aggregate(&self.state.items)
    }

    pub fn critical_gaps(&self) -> Vec<CriticalGap> {
        critical_gaps(&self.state.items)
    }

    pub fn sections(&self) -> Vec<CategorySection> {
        items_by_category(&self.state.items)
    }

    pub fn board_view(&self) -> Vec<BoardColumnView> {
        column_views(&self.state.board, &self.state.items)
    }

    pub fn report(&self, generated_at: DateTime<Utc>) -> AssessmentReport {
        assessment_report(&self.state.items, self.catalog.version(), generated_at)
    }

    pub fn is_dirty(&self) -> bool {
        self.scheduler.is_dirty()
    }

    pub fn save_indicator(&self) -> SaveIndicator {
        if self.is_dirty() {
            SaveIndicator::Saving
        } else {
            SaveIndicator::Saved
        }
    }

    pub fn tick(&mut self) -> FlushOutcome {
        self.scheduler.poll()
    }

    pub fn flush_now(&mut self) -> FlushOutcome {
        if self.scheduler.is_dirty() && !self.scheduler.has_pending() {
            self.schedule_write();
        }
        self.scheduler.flush_now()
    }

    fn matches_store(&self) -> bool {
        let Ok(snapshot) = self.state.snapshot() else {
            return false;
        };
        let stored = |key: &str| self.store.read_blob(key).ok().flatten();
        stored(OVERLAY_KEY).as_deref() == Some(snapshot.overlay_json.as_str())
            && stored(LAYOUT_KEY).as_deref() == Some(snapshot.layout_json.as_str())
    }

    fn schedule_write(&mut self) {
        match self.state.snapshot() {
            Ok(snapshot) => {
                let store = self.store.clone();
                self.scheduler
                    .schedule(Box::new(move || snapshot.write_to(store.as_ref())));
            }
            Err(error) => {
                tracing::error!(error = %error, "could not serialize audit state");
            }
        }
    }
}

pub fn start_autoflush(controller: Arc<Mutex<AuditController>>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let mut controller = controller.lock().await;
            if let FlushOutcome::Failed(error) = controller.tick() {
                tracing::warn!(error = %error, "autoflush write failed");
            }
        }
    })
}
