use crate::errors::{AppError, AppResult};
use std::collections::HashMap;
use std::sync::Mutex;

pub const OVERLAY_KEY: &str = "checklist-overlay";
pub const LAYOUT_KEY: &str = "roadmap-layout";

pub trait OverlayStore: Send + Sync {
    fn read_blob(&self, key: &str) -> AppResult<Option<String>>;
    fn write_blob(&self, key: &str, value: &str) -> AppResult<()>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OverlayStore for MemoryStore {
    fn read_blob(&self, key: &str) -> AppResult<Option<String>> {
        let blobs = self
            .blobs
            .lock()
            .map_err(|_| AppError::Internal("memory store mutex poisoned".to_string()))?;
        Ok(blobs.get(key).cloned())
    }

    fn write_blob(&self, key: &str, value: &str) -> AppResult<()> {
        let mut blobs = self
            .blobs
            .lock()
            .map_err(|_| AppError::Internal("memory store mutex poisoned".to_string()))?;
        blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
