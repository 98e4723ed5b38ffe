// File: src/test_utils/helpers.rs

use chrono::Utc;
use dashmap::DashMap;

use sentinelle_common::models::report::{
    Classification, ClassificationItem, EvolutionEntry, ReportLocation, Severity, WasteNature,
    WasteReport, WasteStatus,
};
use sentinelle_common::traits::BlobCache;
use sentinelle_common::Error;

/// In-memory blob cache for tests; behaves like the file cache without
/// touching disk.
#[derive(Default)]
pub struct MemoryBlobCache {
    blobs: DashMap<String, String>,
}

impl MemoryBlobCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobCache for MemoryBlobCache {
    fn get(&self, key: &str) -> Option<String> {
        self.blobs.get(key).map(|v| v.value().clone())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), Error> {
        self.blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        self.blobs.remove(key);
        Ok(())
    }
}

/// A plausible report with the given id and current status.
pub fn sample_report(id: &str, status: WasteStatus) -> WasteReport {
    WasteReport {
        id: id.to_string(),
        timestamp: Utc::now(),
        image: "data:image/jpeg;base64,QkVGT1JF".to_string(),
        clean_vision_image: None,
        action_plan: Some(vec![
            "Signaler à la mairie".to_string(),
            "Sécuriser la zone".to_string(),
            "Planifier l'enlèvement".to_string(),
        ]),
        history: Vec::new(),
        location: ReportLocation {
            lat: 5.3096,
            lng: -4.0127,
            address: "Validé".to_string(),
            city: "Abidjan".to_string(),
            sector: "Cocody".to_string(),
        },
        classification: Classification {
            nature: WasteNature::Household,
            status,
            confidence: 0.9,
            description: "Dépôt de sacs ménagers".to_string(),
            items: vec![ClassificationItem {
                label: "Plastiques".to_string(),
                percentage: 60.0,
            }],
        },
        severity: Severity::Medium,
        insight: "Dépôt récent, enlèvement rapide conseillé".to_string(),
        nearest_center: None,
    }
}

/// A follow-up observation carrying the given re-assessed status.
pub fn evolution_entry(status: WasteStatus) -> EvolutionEntry {
    EvolutionEntry {
        timestamp: Utc::now(),
        image: "data:image/jpeg;base64,QUZURVI=".to_string(),
        status,
        insight: "Nouvelle observation du site".to_string(),
    }
}
