// File: src/sync/simulated_remote.rs

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use sentinelle_common::models::report::WasteReport;
use sentinelle_common::models::user::UserProfile;
use sentinelle_common::traits::{BlobCache, RemoteStore};
use sentinelle_common::Error;

const CLOUD_REPORTS_KEY: &str = "sv_cloud_reports_mock";
const CLOUD_PROFILES_KEY: &str = "sv_cloud_profile_mock";

/// One persisted report row, tagged with the owning user and sync time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CloudRecord {
    record_id: Uuid,
    user_id: String,
    synced_at: DateTime<Utc>,
    report: WasteReport,
}

/// One persisted profile snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CloudProfile {
    last_sync: DateTime<Utc>,
    profile: UserProfile,
}

/// Artificial per-call latencies imitating a network round trip.
#[derive(Debug, Clone)]
pub struct RemoteLatency {
    pub put_profile: Duration,
    pub put_report: Duration,
    pub get_reports: Duration,
}

impl Default for RemoteLatency {
    fn default() -> Self {
        Self {
            put_profile: Duration::from_millis(500),
            put_report: Duration::from_millis(800),
            get_reports: Duration::from_millis(600),
        }
    }
}

impl RemoteLatency {
    /// No artificial delay; used by tests.
    pub fn none() -> Self {
        Self {
            put_profile: Duration::ZERO,
            put_report: Duration::ZERO,
            get_reports: Duration::ZERO,
        }
    }
}

/// Simulates a user-scoped durable backend on top of a blob cache, so the
/// application can be developed offline. Upserts only: nothing is ever
/// removed, the store doubles as an immutable audit log.
pub struct SimulatedRemote {
    blobs: Arc<dyn BlobCache>,
    latency: RemoteLatency,
}

impl SimulatedRemote {
    pub fn new(blobs: Arc<dyn BlobCache>) -> Self {
        Self {
            blobs,
            latency: RemoteLatency::default(),
        }
    }

    pub fn with_latency(blobs: Arc<dyn BlobCache>, latency: RemoteLatency) -> Self {
        Self { blobs, latency }
    }

    fn read_records(&self) -> Vec<CloudRecord> {
        self.blobs
            .get(CLOUD_REPORTS_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    fn write_records(&self, records: &[CloudRecord]) -> Result<(), Error> {
        let raw = serde_json::to_string(records)?;
        self.blobs.put(CLOUD_REPORTS_KEY, &raw)
    }

    fn read_profiles(&self) -> HashMap<String, CloudProfile> {
        self.blobs
            .get(CLOUD_PROFILES_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }
}

#[async_trait]
impl RemoteStore for SimulatedRemote {
    async fn put_profile(&self, user_id: &str, profile: &UserProfile) -> Result<(), Error> {
        tokio::time::sleep(self.latency.put_profile).await;

        let mut profiles = self.read_profiles();
        profiles.insert(
            user_id.to_string(),
            CloudProfile {
                last_sync: Utc::now(),
                profile: profile.clone(),
            },
        );
        let raw = serde_json::to_string(&profiles)?;
        self.blobs.put(CLOUD_PROFILES_KEY, &raw)
    }

    async fn put_report(&self, user_id: &str, report: &WasteReport) -> Result<(), Error> {
        tokio::time::sleep(self.latency.put_report).await;

        let mut records = self.read_records();
        match records.iter_mut().find(|r| r.report.id == report.id) {
            Some(existing) => {
                existing.user_id = user_id.to_string();
                existing.synced_at = Utc::now();
                existing.report = report.clone();
            }
            None => {
                records.push(CloudRecord {
                    record_id: Uuid::new_v4(),
                    user_id: user_id.to_string(),
                    synced_at: Utc::now(),
                    report: report.clone(),
                });
            }
        }

        debug!(report_id = %report.id, "mirrored report to simulated cloud");
        self.write_records(&records)
    }

    async fn get_reports(&self, user_id: &str) -> Result<Vec<WasteReport>, Error> {
        tokio::time::sleep(self.latency.get_reports).await;

        let mut reports: Vec<WasteReport> = self
            .read_records()
            .into_iter()
            .filter(|r| r.user_id == user_id)
            .map(|r| r.report)
            .collect();
        reports.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(reports)
    }

    async fn recent_reports(&self, limit: usize) -> Result<Vec<WasteReport>, Error> {
        Ok(self
            .read_records()
            .into_iter()
            .take(limit)
            .map(|r| r.report)
            .collect())
    }
}
