// File: src/cache/local_store.rs

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::warn;

use sentinelle_common::models::report::WasteReport;
use sentinelle_common::models::user::{SessionUser, UserProfile};
use sentinelle_common::traits::BlobCache;
use sentinelle_common::Error;

/// Fixed key for the locally cached report collection.
pub const REPORTS_KEY: &str = "sentinelle_verte_reports";
/// Fixed key for the uid → profile snapshot map.
pub const PROFILES_KEY: &str = "sv_profiles";
/// Fixed key for the active-session marker.
pub const SESSION_KEY: &str = "sv_local_session";

/// One file per key under a data directory, shaped like browser key-value
/// storage so a web build can swap in a platform store. Reads that fail
/// for any reason are "absent", never errors.
pub struct FileBlobCache {
    root: PathBuf,
}

impl FileBlobCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Cache rooted in the platform data directory.
    pub fn default_location() -> Self {
        let base = dirs::data_dir().unwrap_or_else(std::env::temp_dir);
        Self::new(base.join("sentinelle"))
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }
}

impl BlobCache for FileBlobCache {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn put(&self, key: &str, value: &str) -> Result<(), Error> {
        fs::create_dir_all(&self.root)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Typed accessors over the three fixed local keys. A missing or
/// unparseable blob always normalizes to "empty"; only writes can fail.
#[derive(Clone)]
pub struct LocalCache {
    blobs: Arc<dyn BlobCache>,
}

impl LocalCache {
    pub fn new(blobs: Arc<dyn BlobCache>) -> Self {
        Self { blobs }
    }

    fn read_json<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.blobs.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("discarding unreadable cache blob '{}': {:?}", key, e);
                None
            }
        }
    }

    fn write_json<T: serde::Serialize>(&self, key: &str, value: &T) -> Result<(), Error> {
        let raw = serde_json::to_string(value)?;
        self.blobs.put(key, &raw)
    }

    pub fn load_reports(&self) -> Vec<WasteReport> {
        self.read_json(REPORTS_KEY).unwrap_or_default()
    }

    pub fn save_reports(&self, reports: &[WasteReport]) -> Result<(), Error> {
        self.write_json(REPORTS_KEY, &reports)
    }

    pub fn load_profile(&self, uid: &str) -> Option<UserProfile> {
        let map: HashMap<String, UserProfile> = self.read_json(PROFILES_KEY)?;
        map.get(uid).cloned()
    }

    pub fn save_profile(&self, uid: &str, profile: &UserProfile) -> Result<(), Error> {
        let mut map: HashMap<String, UserProfile> =
            self.read_json(PROFILES_KEY).unwrap_or_default();
        map.insert(uid.to_string(), profile.clone());
        self.write_json(PROFILES_KEY, &map)
    }

    pub fn load_session(&self) -> Option<SessionUser> {
        self.read_json(SESSION_KEY)
    }

    pub fn save_session(&self, user: &SessionUser) -> Result<(), Error> {
        self.write_json(SESSION_KEY, user)
    }

    pub fn clear_session(&self) -> Result<(), Error> {
        self.blobs.remove(SESSION_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::sample_report;
    use sentinelle_common::models::report::WasteStatus;

    fn file_cache() -> (tempfile::TempDir, LocalCache) {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalCache::new(Arc::new(FileBlobCache::new(dir.path())));
        (dir, cache)
    }

    #[test]
    fn absent_blobs_are_empty() {
        let (_dir, cache) = file_cache();
        assert!(cache.load_reports().is_empty());
        assert!(cache.load_session().is_none());
        assert!(cache.load_profile("u1").is_none());
    }

    #[test]
    fn reports_round_trip() {
        let (_dir, cache) = file_cache();
        let reports = vec![
            sample_report("CI-000001", WasteStatus::InitialDeposit),
            sample_report("CI-000002", WasteStatus::Cleaned),
        ];
        cache.save_reports(&reports).unwrap();

        let loaded = cache.load_reports();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].id, "CI-000001");
        assert_eq!(loaded[1].current_status(), WasteStatus::Cleaned);
    }

    #[test]
    fn corrupt_blob_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let blobs = Arc::new(FileBlobCache::new(dir.path()));
        blobs.put(REPORTS_KEY, "{not json at all").unwrap();

        let cache = LocalCache::new(blobs);
        assert!(cache.load_reports().is_empty());
    }

    #[test]
    fn session_marker_lifecycle() {
        let (_dir, cache) = file_cache();
        let user = SessionUser::local_mock();
        cache.save_session(&user).unwrap();
        assert_eq!(cache.load_session().unwrap(), user);

        cache.clear_session().unwrap();
        assert!(cache.load_session().is_none());
        // Clearing twice is harmless.
        cache.clear_session().unwrap();
    }

    #[test]
    fn profile_map_keeps_one_snapshot_per_user() {
        let (_dir, cache) = file_cache();
        let mut profile = UserProfile::anonymous();
        cache.save_profile("u1", &profile).unwrap();

        profile.username = "Awa".to_string();
        cache.save_profile("u1", &profile).unwrap();
        cache.save_profile("u2", &UserProfile::anonymous()).unwrap();

        assert_eq!(cache.load_profile("u1").unwrap().username, "Awa");
        assert!(cache.load_profile("u2").is_some());
    }
}
