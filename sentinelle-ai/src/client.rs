use std::sync::Arc;

use tracing::{info, warn};

use sentinelle_common::models::ai::EvolutionAssessment;

use crate::models::{CaptureAnalysis, ImagePayload, PipelineConfig};
use crate::traits::{ChatMessage, LocationProvider, VisionProvider};

const ASSISTANT_SYSTEM_PROMPT: &str = "Tu es l'Assistant Officiel Sentinelle Verte. Ton rôle \
est d'aider les citoyens ivoiriens à gérer leurs déchets et à trouver les centres de \
recyclage ou les lois environnementales en vigueur en Côte d'Ivoire.";

/// Sequences the multi-step analysis of a capture: classification, the
/// optional enrichments, and a bounded position fix. Owns no report state;
/// its output feeds the report store's two-phase create/confirm.
pub struct AnalysisPipeline {
    provider: Arc<dyn VisionProvider>,
    location: Option<Arc<dyn LocationProvider>>,
    config: PipelineConfig,
}

impl AnalysisPipeline {
    pub fn new(provider: Arc<dyn VisionProvider>, config: PipelineConfig) -> Self {
        Self {
            provider,
            location: None,
            config,
        }
    }

    /// Attach a device position source. Without one, every capture gets the
    /// stub coordinates.
    pub fn with_location(mut self, location: Arc<dyn LocationProvider>) -> Self {
        self.location = Some(location);
        self
    }

    /// Full analysis of a new capture.
    ///
    /// The classification call is load-bearing and its failure propagates
    /// (the caller owns the retry affordance). Clean vision and the
    /// disposal-center lookup are enrichments: their failures degrade to
    /// absent values.
    pub async fn analyze_capture(&self, image: ImagePayload) -> anyhow::Result<CaptureAnalysis> {
        info!(provider = self.provider.name(), "starting capture analysis");

        let mut result = self.provider.analyze_image(&image).await?;
        if result.city.is_empty() {
            result.city = self.config.default_city.clone();
        }
        if result.sector.is_empty() {
            result.sector = self.config.default_sector.clone();
        }

        let clean_vision = match self.provider.generate_clean_vision(&image).await {
            Ok(vision) => vision,
            Err(e) => {
                warn!("clean vision generation failed: {:?}", e);
                None
            }
        };

        let nearest_center = match self
            .provider
            .find_disposal_center(result.nature, &result.city)
            .await
        {
            Ok(center) => center,
            Err(e) => {
                warn!("disposal center lookup failed: {:?}", e);
                None
            }
        };

        let position = self.resolve_position().await;

        Ok(CaptureAnalysis {
            image,
            result,
            clean_vision,
            nearest_center,
            position,
        })
    }

    /// Comparative follow-up assessment over the original and new images.
    pub async fn assess_evolution(
        &self,
        before: &ImagePayload,
        after: &ImagePayload,
    ) -> anyhow::Result<EvolutionAssessment> {
        self.provider.analyze_evolution(before, after).await
    }

    /// One assistant turn: the conversation so far plus the new message.
    pub async fn assistant_reply(
        &self,
        mut history: Vec<ChatMessage>,
        message: &str,
    ) -> anyhow::Result<String> {
        // The system role travels as the first message; providers that take
        // a dedicated system slot hoist it themselves.
        if !history.iter().any(|m| m.role == "system") {
            history.insert(
                0,
                ChatMessage {
                    role: "system".to_string(),
                    content: ASSISTANT_SYSTEM_PROMPT.to_string(),
                },
            );
        }
        history.push(ChatMessage {
            role: "user".to_string(),
            content: message.to_string(),
        });
        self.provider.chat(history).await
    }

    /// Spoken rendering of a narrative. Absence (provider failure included)
    /// is `None`; playback and teardown belong to the embedder.
    pub async fn narrate(&self, text: &str) -> Option<Vec<u8>> {
        match self.provider.synthesize_speech(text).await {
            Ok(audio) => audio,
            Err(e) => {
                warn!("speech synthesis failed: {:?}", e);
                None
            }
        }
    }

    /// Device fix bounded by the configured timeout; stub coordinates on
    /// timeout, denial, or absence of a provider.
    async fn resolve_position(&self) -> (f64, f64) {
        let Some(location) = &self.location else {
            return self.config.fallback_position;
        };

        match tokio::time::timeout(self.config.geo_timeout, location.current_position()).await {
            Ok(Ok(fix)) => fix,
            Ok(Err(e)) => {
                warn!("geolocation unavailable: {:?}", e);
                self.config.fallback_position
            }
            Err(_) => {
                warn!(
                    "geolocation fix timed out after {:?}",
                    self.config.geo_timeout
                );
                self.config.fallback_position
            }
        }
    }
}
