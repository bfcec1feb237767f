//! Panel store module - persistence backend for uploaded panels

mod supabase;

pub use self::supabase::SupabaseStore;

use std::collections::HashSet;

use async_trait::async_trait;

/// Panel persistence backend
#[async_trait]
pub trait PanelStore: Send + Sync {
    /// Serials already present in the store. Implementations degrade to an
    /// empty set on read failure so the run can still proceed; the store's
    /// own uniqueness handling is the backstop in that case.
    async fn existing_serials(&self) -> HashSet<String>;

    /// Insert a single panel row. Returns false on failure; callers do not
    /// retry.
    async fn insert_panel(&self, serial: &str, created_at: &str) -> bool;
}
