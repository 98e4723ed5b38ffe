use async_trait::async_trait;

use sentinelle_common::models::ai::{AnalysisResult, EvolutionAssessment};
use sentinelle_common::models::report::{DisposalCenter, WasteNature};

use crate::models::ImagePayload;

/// A single message in an assistant conversation.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    /// "user" or "model".
    pub role: String,
    pub content: String,
}

/// The generative boundary the rest of the application talks to. Every
/// method may fail; callers treat failure as recoverable. Operations whose
/// product is optional (clean vision, speech, disposal center) report
/// absence as `Ok(None)`, not as an error.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Classify a waste image and produce the full structured result.
    async fn analyze_image(&self, image: &ImagePayload) -> anyhow::Result<AnalysisResult>;

    /// Compare two observations of the same site and re-assess its status.
    async fn analyze_evolution(
        &self,
        before: &ImagePayload,
        after: &ImagePayload,
    ) -> anyhow::Result<EvolutionAssessment>;

    /// Render an idealized "after cleanup" view of the site.
    async fn generate_clean_vision(
        &self,
        image: &ImagePayload,
    ) -> anyhow::Result<Option<ImagePayload>>;

    /// Spoken rendering of a narrative. Returns raw audio bytes.
    async fn synthesize_speech(&self, text: &str) -> anyhow::Result<Option<Vec<u8>>>;

    /// Look up an official collection point for this kind of waste.
    async fn find_disposal_center(
        &self,
        nature: WasteNature,
        city: &str,
    ) -> anyhow::Result<Option<DisposalCenter>>;

    /// Free-form assistant conversation.
    async fn chat(&self, messages: Vec<ChatMessage>) -> anyhow::Result<String>;
}

/// Source of a device position fix. The pipeline bounds every call to this
/// trait with a fixed timeout and falls back to stub coordinates.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Current (lat, lng). May be slow or denied.
    async fn current_position(&self) -> anyhow::Result<(f64, f64)>;
}
