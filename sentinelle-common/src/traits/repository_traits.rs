use async_trait::async_trait;

use crate::error::Error;
use crate::models::report::WasteReport;
use crate::models::user::UserProfile;

/// User-scoped durable persistence, possibly remote and always best-effort:
/// every method may fail and callers must treat failure as recoverable.
///
/// Deletion is intentionally absent: the store behaves as an append/upsert
/// log and never removes an entry.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Upsert the profile snapshot for a user. Last write wins.
    async fn put_profile(&self, user_id: &str, profile: &UserProfile) -> Result<(), Error>;

    /// Upsert a report, keyed by `report.id`.
    async fn put_report(&self, user_id: &str, report: &WasteReport) -> Result<(), Error>;

    /// All reports persisted for a user, newest-first by creation time.
    async fn get_reports(&self, user_id: &str) -> Result<Vec<WasteReport>, Error>;

    /// The latest few reports across all users (community feed).
    async fn recent_reports(&self, limit: usize) -> Result<Vec<WasteReport>, Error>;
}

/// A flat string-blob cache with fixed keys, shaped like the browser
/// storage it stands in for. Absence is "empty", never an error; reads
/// that fail normalize to `None`.
pub trait BlobCache: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn put(&self, key: &str, value: &str) -> Result<(), Error>;
    fn remove(&self, key: &str) -> Result<(), Error>;
}
