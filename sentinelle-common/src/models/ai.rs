// File: sentinelle-common/src/models/ai.rs

use serde::{Deserialize, Serialize};

use crate::models::report::{ClassificationItem, Severity, WasteNature, WasteStatus};

/// Structured result of a first-capture analysis, exactly as the provider
/// returns it. Field names match the provider's JSON response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub nature: WasteNature,
    pub status: WasteStatus,
    /// Confidence in [0, 1].
    pub confidence: f32,
    pub description: String,
    pub severity: Severity,
    pub insight: String,
    pub action_plan: Vec<String>,
    pub classification: Vec<ClassificationItem>,
    pub city: String,
    pub sector: String,
}

/// Comparative judgment over a before/after image pair for a follow-up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionAssessment {
    pub status: WasteStatus,
    pub insight: String,
}
