//! Shared state for the API layer.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDateTime;
use rusqlite::Connection;

use crate::api::error::ApiError;
use crate::db::open_database;
use crate::reference::ReferenceData;

/// Source of "now" for projection windows.
pub type Clock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

// ═══════════════════════════════════════════════════════════
// API context: shared state for the router
// ═══════════════════════════════════════════════════════════

/// Shared context for all API routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    db_path: Arc<PathBuf>,
    pub reference: Arc<ReferenceData>,
    clock: Clock,
}

impl ApiContext {
    /// Context reading the system clock in UTC.
    pub fn new(db_path: impl Into<PathBuf>, reference: ReferenceData) -> Self {
        Self {
            db_path: Arc::new(db_path.into()),
            reference: Arc::new(reference),
            clock: Arc::new(|| chrono::Utc::now().naive_utc()),
        }
    }

    /// Replace the clock, e.g. with a fixed instant in tests.
    pub fn with_clock(mut self, clock: impl Fn() -> NaiveDateTime + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Fresh connection for one request.
    pub fn open_db(&self) -> Result<Connection, ApiError> {
        open_database(&self.db_path).map_err(ApiError::from)
    }

    pub fn now(&self) -> NaiveDateTime {
        (self.clock)()
    }
}

impl std::fmt::Debug for ApiContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiContext")
            .field("db_path", &self.db_path)
            .field("reference", &self.reference)
            .finish_non_exhaustive()
    }
}
