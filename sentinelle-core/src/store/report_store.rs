// File: src/store/report_store.rs

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use sentinelle_ai::models::CaptureAnalysis;
use sentinelle_common::models::badge::ImpactStats;
use sentinelle_common::models::report::{
    Classification, EvolutionEntry, ReportLocation, WasteReport,
};
use sentinelle_common::models::user::{SessionUser, UserProfile};
use sentinelle_common::traits::RemoteStore;
use sentinelle_common::Error;

use crate::cache::LocalCache;
use crate::eventbus::{AppEvent, EventBus};

/// Address marker used when a capture is accepted without a street-level
/// geocode.
const VALIDATED_ADDRESS: &str = "Validé";

#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Prefix of allocated report ids.
    pub report_id_prefix: String,
    /// Hard bound on the remote fetch during a session load; past it the
    /// collection degrades to the local cache.
    pub remote_load_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            report_id_prefix: "CI-".to_string(),
            remote_load_timeout: Duration::from_secs(10),
        }
    }
}

/// Merge a remote collection with the local cache into one de-duplicated
/// collection, keyed by report id.
///
/// Pure and idempotent: remote entries win on collision and keep their
/// ordering; local-only entries follow in their original relative order.
pub fn merge_reports(remote: Vec<WasteReport>, local: Vec<WasteReport>) -> Vec<WasteReport> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut merged = Vec::with_capacity(remote.len() + local.len());

    for report in remote.into_iter().chain(local) {
        if seen.insert(report.id.clone()) {
            merged.push(report);
        }
    }
    merged
}

/// Derive the gamification numbers from a collection. Pure; recomputed from
/// scratch on every change so the numbers can never drift.
pub fn compute_stats(reports: &[WasteReport]) -> ImpactStats {
    let reports_count = reports.len() as u64;
    let solutions_count = reports.iter().filter(|r| r.has_resolution()).count() as u64;
    ImpactStats {
        points: reports_count * 15 + solutions_count * 100,
        solutions_count,
        reports_count,
    }
}

/// Owns the session state: the active user, their profile, and the
/// authoritative in-memory report collection (most-recent-first).
///
/// Every mutation persists the full collection to the local cache before
/// the remote mirror is even dispatched, so a reload immediately after a
/// mutation can always recover from local state. The mirror itself is
/// fire-and-forget. There is no concurrent writer: all mutations arrive
/// from sequential user-triggered events.
pub struct ReportStore {
    cache: LocalCache,
    remote: Arc<dyn RemoteStore>,
    events: EventBus,
    config: StoreConfig,
    session: Option<SessionUser>,
    profile: UserProfile,
    reports: Vec<WasteReport>,
}

impl ReportStore {
    pub fn new(
        cache: LocalCache,
        remote: Arc<dyn RemoteStore>,
        events: EventBus,
        config: StoreConfig,
    ) -> Self {
        Self {
            cache,
            remote,
            events,
            config,
            session: None,
            profile: UserProfile::anonymous(),
            reports: Vec::new(),
        }
    }

    pub fn reports(&self) -> &[WasteReport] {
        &self.reports
    }

    pub fn get_report(&self, report_id: &str) -> Option<&WasteReport> {
        self.reports.iter().find(|r| r.id == report_id)
    }

    pub fn session(&self) -> Option<&SessionUser> {
        self.session.as_ref()
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn stats(&self) -> ImpactStats {
        compute_stats(&self.reports)
    }

    /// Restore state at startup: resume the persisted session if one is
    /// marked, otherwise populate from the local cache alone.
    pub async fn resume(&mut self) {
        match self.cache.load_session() {
            Some(user) => {
                self.start_session(user).await;
            }
            None => {
                self.reports = self.cache.load_reports();
            }
        }
    }

    /// Activate a session: persist the marker, restore the profile
    /// snapshot, and reconcile local and remote collections.
    pub async fn start_session(&mut self, user: SessionUser) {
        if let Err(e) = self.cache.save_session(&user) {
            warn!("could not persist session marker: {:?}", e);
        }
        if let Some(profile) = self.cache.load_profile(&user.uid) {
            self.profile = profile;
        }
        let uid = user.uid.clone();
        self.session = Some(user);
        self.load_for_user(&uid).await;
        self.events
            .publish(AppEvent::SessionStarted { uid })
            .await;
    }

    /// Tear the session down to empty defaults. The local cache keeps its
    /// blobs; only the marker is cleared.
    pub async fn end_session(&mut self) {
        if let Err(e) = self.cache.clear_session() {
            warn!("could not clear session marker: {:?}", e);
        }
        self.session = None;
        self.reports = Vec::new();
        self.profile = UserProfile::anonymous();
        self.events.publish(AppEvent::SessionEnded).await;
    }

    /// Reconcile the remote collection for `uid` with the local cache.
    ///
    /// The remote fetch is bounded; on failure or timeout the collection
    /// degrades to local-only and the degradation is published, never
    /// raised.
    pub async fn load_for_user(&mut self, uid: &str) -> &[WasteReport] {
        let local = self.cache.load_reports();

        let fetched = tokio::time::timeout(
            self.config.remote_load_timeout,
            self.remote.get_reports(uid),
        )
        .await;

        match fetched {
            Ok(Ok(remote)) => {
                self.reports = merge_reports(remote, local);
            }
            Ok(Err(e)) => {
                warn!("remote load failed, using local cache only: {:?}", e);
                self.events
                    .publish(AppEvent::SyncDegraded {
                        reason: e.to_string(),
                    })
                    .await;
                self.reports = local;
            }
            Err(_) => {
                warn!(
                    "remote load timed out after {:?}, using local cache only",
                    self.config.remote_load_timeout
                );
                self.events
                    .publish(AppEvent::SyncDegraded {
                        reason: "remote load timed out".to_string(),
                    })
                    .await;
                self.reports = local;
            }
        }

        &self.reports
    }

    /// Build a report from a finished capture analysis. Allocates the id
    /// and leaves the history empty.
    ///
    /// Deliberately touches no store state: an analysis the user abandons
    /// never pollutes the collection. The caller inserts the report with
    /// [`confirm_report`](Self::confirm_report).
    pub fn create_report(&self, analysis: CaptureAnalysis) -> WasteReport {
        let now = Utc::now();
        let id = format!(
            "{}{:06}",
            self.config.report_id_prefix,
            now.timestamp_millis().rem_euclid(1_000_000)
        );

        let CaptureAnalysis {
            image,
            result,
            clean_vision,
            nearest_center,
            position,
        } = analysis;

        WasteReport {
            id,
            timestamp: now,
            image: image.to_data_url(),
            clean_vision_image: clean_vision.map(|img| img.to_data_url()),
            action_plan: Some(result.action_plan),
            history: Vec::new(),
            location: ReportLocation {
                lat: position.0,
                lng: position.1,
                address: VALIDATED_ADDRESS.to_string(),
                city: result.city,
                sector: result.sector,
            },
            classification: Classification {
                nature: result.nature,
                status: result.status,
                confidence: result.confidence,
                description: result.description,
                items: result.classification,
            },
            severity: result.severity,
            insight: result.insight,
            nearest_center,
        }
    }

    /// Insert a freshly created report at the head of the collection,
    /// persist locally, then mirror best-effort.
    pub async fn confirm_report(&mut self, report: WasteReport) -> Result<(), Error> {
        if self.reports.iter().any(|r| r.id == report.id) {
            warn!("refusing duplicate report id {}", report.id);
            return Err(Error::Cache(format!(
                "report {} already in collection",
                report.id
            )));
        }

        self.reports.insert(0, report.clone());
        self.persist_local()?;
        self.mirror_report(report.clone());

        info!(report_id = %report.id, "report confirmed");
        self.events
            .publish(AppEvent::ReportCreated {
                commune: report.location.city.clone(),
                nature: report.classification.nature,
            })
            .await;
        Ok(())
    }

    /// Append a follow-up observation to an existing report. The report's
    /// top-level status mirrors the entry; history is append-only.
    ///
    /// An unknown id leaves the collection untouched and reports the
    /// not-found condition; callers surface it, they do not crash.
    pub async fn append_evolution(
        &mut self,
        report_id: &str,
        entry: EvolutionEntry,
    ) -> Result<(), Error> {
        let status = entry.status;
        let snapshot = match self.reports.iter_mut().find(|r| r.id == report_id) {
            Some(report) => {
                report.record_evolution(entry);
                report.clone()
            }
            None => {
                warn!("evolution for unknown report {}", report_id);
                return Err(Error::NotFound(format!("report {}", report_id)));
            }
        };

        self.persist_local()?;
        self.mirror_report(snapshot);

        self.events
            .publish(AppEvent::EvolutionRecorded {
                report_id: report_id.to_string(),
                status,
            })
            .await;
        Ok(())
    }

    /// Remove a report locally. Removing an id that is not present is a
    /// no-op. The simulated cloud never deletes: its copy remains as an
    /// audit trace.
    pub fn delete_report(&mut self, report_id: &str) -> Result<(), Error> {
        let before = self.reports.len();
        self.reports.retain(|r| r.id != report_id);
        if self.reports.len() == before {
            return Ok(());
        }
        info!(report_id, "report deleted locally");
        self.persist_local()
    }

    /// Replace the profile (last write wins) and mirror it when a session
    /// is active.
    pub fn update_profile(&mut self, profile: UserProfile) -> Result<(), Error> {
        self.profile = profile.clone();

        let Some(user) = &self.session else {
            return Ok(());
        };
        self.cache.save_profile(&user.uid, &profile)?;

        let remote = Arc::clone(&self.remote);
        let uid = user.uid.clone();
        tokio::spawn(async move {
            if let Err(e) = remote.put_profile(&uid, &profile).await {
                warn!("profile mirror failed: {:?}", e);
            }
        });
        Ok(())
    }

    /// Latest reports across all citizens, best-effort: failure degrades
    /// to an empty feed.
    pub async fn community_reports(&self, limit: usize) -> Vec<WasteReport> {
        match self.remote.recent_reports(limit).await {
            Ok(reports) => reports,
            Err(e) => {
                warn!("community feed unavailable: {:?}", e);
                Vec::new()
            }
        }
    }

    fn persist_local(&self) -> Result<(), Error> {
        self.cache.save_reports(&self.reports)
    }

    /// Fire-and-forget mirror of one report to the remote store. Completion
    /// is not awaited; failure is published, never raised.
    fn mirror_report(&self, report: WasteReport) {
        let Some(user) = &self.session else {
            return;
        };
        let remote = Arc::clone(&self.remote);
        let events = self.events.clone();
        let uid = user.uid.clone();

        tokio::spawn(async move {
            if let Err(e) = remote.put_report(&uid, &report).await {
                warn!("remote mirror failed for {}: {:?}", report.id, e);
                events
                    .publish(AppEvent::RemoteMirrorFailed {
                        report_id: report.id.clone(),
                    })
                    .await;
            }
        });
    }
}
