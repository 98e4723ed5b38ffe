use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Nature of an observed waste deposit. Wire strings are the localized
/// labels the mobile client and the cloud mock already store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WasteNature {
    #[serde(rename = "Déchets Ménagers Ordinaires")]
    Household,
    #[serde(rename = "Volumineux / Encombrants")]
    Bulky,
    #[serde(rename = "Construction et Gravats")]
    Construction,
    #[serde(rename = "Déchets Verts")]
    Green,
    #[serde(rename = "Déchets Spéciaux / Dangereux")]
    Hazardous,
}

impl WasteNature {
    pub fn label(&self) -> &'static str {
        match self {
            WasteNature::Household => "Déchets Ménagers Ordinaires",
            WasteNature::Bulky => "Volumineux / Encombrants",
            WasteNature::Construction => "Construction et Gravats",
            WasteNature::Green => "Déchets Verts",
            WasteNature::Hazardous => "Déchets Spéciaux / Dangereux",
        }
    }
}

impl std::fmt::Display for WasteNature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Status of a deposit as assessed on a given observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WasteStatus {
    #[serde(rename = "Dépôt Initial / Nouveau")]
    InitialDeposit,
    #[serde(rename = "Dépôt Critique / Volumineux")]
    CriticalDeposit,
    #[serde(rename = "Zone de Nettoyage en Cours")]
    CleanupUnderway,
    #[serde(rename = "Zone Nettoyée / Résolue")]
    Cleaned,
    #[serde(rename = "Réapparition / Récidive")]
    Recurrence,
}

impl WasteStatus {
    pub fn label(&self) -> &'static str {
        match self {
            WasteStatus::InitialDeposit => "Dépôt Initial / Nouveau",
            WasteStatus::CriticalDeposit => "Dépôt Critique / Volumineux",
            WasteStatus::CleanupUnderway => "Zone de Nettoyage en Cours",
            WasteStatus::Cleaned => "Zone Nettoyée / Résolue",
            WasteStatus::Recurrence => "Réapparition / Récidive",
        }
    }

    /// Collapses the localized statuses onto the resolution lifecycle.
    /// All "is it solved" decisions go through this, never through the
    /// display strings.
    pub fn phase(&self) -> ResolutionPhase {
        match self {
            WasteStatus::InitialDeposit | WasteStatus::CriticalDeposit => ResolutionPhase::New,
            WasteStatus::CleanupUnderway => ResolutionPhase::InProgress,
            WasteStatus::Cleaned => ResolutionPhase::Resolved,
            WasteStatus::Recurrence => ResolutionPhase::Recurred,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.phase() == ResolutionPhase::Resolved
    }
}

impl std::fmt::Display for WasteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Resolution lifecycle of a report. `Recurred` is only reachable after a
/// site has been resolved once; there is no terminal phase, a site can
/// re-open for as long as follow-ups keep arriving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResolutionPhase {
    New,
    InProgress,
    Resolved,
    Recurred,
}

impl ResolutionPhase {
    /// Legal phase transitions. Staying in the same phase is always
    /// allowed (two observations can assess the site identically).
    pub fn can_transition_to(&self, next: ResolutionPhase) -> bool {
        use ResolutionPhase::*;
        if *self == next {
            return true;
        }
        matches!(
            (self, next),
            (New, InProgress) | (New, Resolved) | (InProgress, Resolved) | (Resolved, Recurred)
                | (Recurred, InProgress) | (Recurred, Resolved)
        )
    }
}

/// Severity tier. Ordinal: Low < Medium < High.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Severity {
    #[serde(rename = "Faible")]
    Low,
    #[serde(rename = "Moyenne")]
    Medium,
    #[serde(rename = "Élevée")]
    High,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "Faible",
            Severity::Medium => "Moyenne",
            Severity::High => "Élevée",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One contributing material category. Percentages are descriptive; the
/// breakdown is not required to sum to 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationItem {
    pub label: String,
    pub percentage: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    pub nature: WasteNature,
    pub status: WasteStatus,
    /// Confidence score in [0, 1].
    pub confidence: f32,
    pub description: String,
    pub items: Vec<ClassificationItem>,
}

/// Best-effort location: either a device fix or the stub coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportLocation {
    pub lat: f64,
    pub lng: f64,
    pub address: String,
    pub city: String,
    pub sector: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisposalCenter {
    pub name: String,
    pub url: String,
}

/// One follow-up observation. Immutable once appended to a report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvolutionEntry {
    pub timestamp: DateTime<Utc>,
    pub image: String,
    pub status: WasteStatus,
    pub insight: String,
}

/// The central record: a waste deposit and its resolution history.
///
/// Created once, then only ever appended-to (`record_evolution`) or deleted
/// whole. `history` is append-only and its insertion order is chronological
/// order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WasteReport {
    /// Opaque id, unique within a user's collection, never reused.
    pub id: String,
    /// Logical creation time, immutable after creation.
    pub timestamp: DateTime<Utc>,
    /// Primary "before" image reference.
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clean_vision_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_plan: Option<Vec<String>>,
    #[serde(default)]
    pub history: Vec<EvolutionEntry>,
    pub location: ReportLocation,
    pub classification: Classification,
    pub severity: Severity,
    pub insight: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nearest_center: Option<DisposalCenter>,
}

impl WasteReport {
    /// Status of the most recent observation: the original classification
    /// until a follow-up arrives, then always the latest history entry.
    pub fn current_status(&self) -> WasteStatus {
        self.classification.status
    }

    /// The one sanctioned mutation besides whole-report deletion: append a
    /// follow-up and mirror its status at the top level. Existing entries
    /// are never reordered or removed.
    pub fn record_evolution(&mut self, entry: EvolutionEntry) {
        self.classification.status = entry.status;
        self.history.push(entry);
    }

    pub fn is_resolved(&self) -> bool {
        self.current_status().is_resolved()
    }

    /// Whether this report counts as a solved site: some follow-up reached
    /// the resolved phase, or the current status already is resolved.
    pub fn has_resolution(&self) -> bool {
        self.is_resolved() || self.history.iter().any(|e| e.status.is_resolved())
    }

    /// Plain-text official rendering used for sharing and the downloadable
    /// attestation. Human-facing; nothing parses it back.
    pub fn official_text(&self) -> String {
        let mut out = String::new();
        out.push_str("RAPPORT OFFICIEL - SENTINELLE VERTE CI\n");
        out.push_str(&format!("ID: {}\n", self.id));
        out.push_str(&format!("Date: {}\n", self.timestamp.format("%d/%m/%Y")));
        out.push_str(&format!(
            "Lieu: {}, {}\n",
            self.location.city, self.location.sector
        ));
        out.push_str(&format!("Nature: {}\n", self.classification.nature));
        out.push_str(&format!("Statut: {}\n", self.current_status()));
        out.push_str(&format!("Gravité: {}\n", self.severity));
        out.push_str(&format!("\nExpertise IA: {}\n", self.insight));
        if let Some(plan) = &self.action_plan {
            out.push_str("\nPlan d'action:\n");
            for (i, step) in plan.iter().enumerate() {
                out.push_str(&format!("{}. {}\n", i + 1, step));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_labels_round_trip() {
        let json = serde_json::to_string(&WasteNature::Household).unwrap();
        assert_eq!(json, "\"Déchets Ménagers Ordinaires\"");
        let back: WasteNature = serde_json::from_str(&json).unwrap();
        assert_eq!(back, WasteNature::Household);

        let json = serde_json::to_string(&WasteStatus::Cleaned).unwrap();
        assert_eq!(json, "\"Zone Nettoyée / Résolue\"");
        let back: WasteStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, WasteStatus::Cleaned);
    }

    #[test]
    fn phase_mapping_is_structured() {
        assert_eq!(WasteStatus::InitialDeposit.phase(), ResolutionPhase::New);
        assert_eq!(WasteStatus::CriticalDeposit.phase(), ResolutionPhase::New);
        assert_eq!(
            WasteStatus::CleanupUnderway.phase(),
            ResolutionPhase::InProgress
        );
        assert_eq!(WasteStatus::Cleaned.phase(), ResolutionPhase::Resolved);
        assert_eq!(WasteStatus::Recurrence.phase(), ResolutionPhase::Recurred);
        assert!(WasteStatus::Cleaned.is_resolved());
        assert!(!WasteStatus::CleanupUnderway.is_resolved());
    }

    #[test]
    fn phase_transitions() {
        use ResolutionPhase::*;
        assert!(New.can_transition_to(InProgress));
        assert!(New.can_transition_to(Resolved));
        assert!(InProgress.can_transition_to(Resolved));
        assert!(Resolved.can_transition_to(Recurred));
        assert!(Recurred.can_transition_to(InProgress));
        // Recurred only follows Resolved.
        assert!(!New.can_transition_to(Recurred));
        assert!(!InProgress.can_transition_to(Recurred));
        // Same-phase reassessment is always legal.
        assert!(InProgress.can_transition_to(InProgress));
    }

    #[test]
    fn official_text_carries_the_attestation_fields() {
        let mut report = WasteReport {
            id: "CI-000123".to_string(),
            timestamp: chrono::Utc::now(),
            image: String::new(),
            clean_vision_image: None,
            action_plan: Some(vec!["Première étape".to_string(), "Seconde étape".to_string()]),
            history: Vec::new(),
            location: ReportLocation {
                lat: 5.3,
                lng: -4.0,
                address: "Validé".to_string(),
                city: "Abidjan".to_string(),
                sector: "Treichville".to_string(),
            },
            classification: Classification {
                nature: WasteNature::Construction,
                status: WasteStatus::InitialDeposit,
                confidence: 0.8,
                description: String::new(),
                items: vec![],
            },
            severity: Severity::High,
            insight: "Gravats en bord de lagune".to_string(),
            nearest_center: None,
        };
        report.record_evolution(EvolutionEntry {
            timestamp: chrono::Utc::now(),
            image: String::new(),
            status: WasteStatus::CleanupUnderway,
            insight: String::new(),
        });

        let text = report.official_text();
        assert!(text.contains("ID: CI-000123"));
        assert!(text.contains("Lieu: Abidjan, Treichville"));
        assert!(text.contains("Nature: Construction et Gravats"));
        // The rendering reflects the current status, not the original one.
        assert!(text.contains("Statut: Zone de Nettoyage en Cours"));
        assert!(text.contains("Gravité: Élevée"));
        assert!(text.contains("1. Première étape"));
        assert!(text.contains("2. Seconde étape"));
    }

    #[test]
    fn severity_is_ordinal() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
    }
}
