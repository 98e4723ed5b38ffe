// File: sentinelle-ai/tests/pipeline_tests.rs

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use sentinelle_ai::models::{ImagePayload, PipelineConfig};
use sentinelle_ai::traits::{ChatMessage, LocationProvider, VisionProvider};
use sentinelle_ai::AnalysisPipeline;
use sentinelle_common::models::ai::{AnalysisResult, EvolutionAssessment};
use sentinelle_common::models::report::{
    DisposalCenter, Severity, WasteNature, WasteStatus,
};

/// Opt-in log output for debugging a failing test run.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Provider stub with switchable enrichment failures.
struct StubProvider {
    fail_clean_vision: bool,
    fail_center: bool,
}

impl StubProvider {
    fn happy() -> Self {
        Self {
            fail_clean_vision: false,
            fail_center: false,
        }
    }
}

#[async_trait]
impl VisionProvider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    async fn analyze_image(&self, _image: &ImagePayload) -> anyhow::Result<AnalysisResult> {
        Ok(AnalysisResult {
            nature: WasteNature::Household,
            status: WasteStatus::InitialDeposit,
            confidence: 0.92,
            description: "Sacs ménagers entassés".to_string(),
            severity: Severity::Medium,
            insight: "Dépôt récent, enlèvement rapide conseillé".to_string(),
            action_plan: vec![
                "Signaler à la mairie".to_string(),
                "Sécuriser la zone".to_string(),
                "Planifier l'enlèvement".to_string(),
            ],
            classification: vec![],
            // Left empty on purpose: the pipeline must fill the defaults.
            city: String::new(),
            sector: String::new(),
        })
    }

    async fn analyze_evolution(
        &self,
        _before: &ImagePayload,
        _after: &ImagePayload,
    ) -> anyhow::Result<EvolutionAssessment> {
        Ok(EvolutionAssessment {
            status: WasteStatus::Cleaned,
            insight: "Le site a été entièrement nettoyé".to_string(),
        })
    }

    async fn generate_clean_vision(
        &self,
        _image: &ImagePayload,
    ) -> anyhow::Result<Option<ImagePayload>> {
        if self.fail_clean_vision {
            return Err(anyhow::anyhow!("image model unavailable"));
        }
        Ok(Some(ImagePayload::jpeg("Q0xFQU4=")))
    }

    async fn synthesize_speech(&self, _text: &str) -> anyhow::Result<Option<Vec<u8>>> {
        Ok(None)
    }

    async fn find_disposal_center(
        &self,
        _nature: WasteNature,
        city: &str,
    ) -> anyhow::Result<Option<DisposalCenter>> {
        if self.fail_center {
            return Err(anyhow::anyhow!("lookup unavailable"));
        }
        Ok(Some(DisposalCenter {
            name: format!("Centre de collecte {}", city),
            url: "https://example.invalid/centre".to_string(),
        }))
    }

    async fn chat(&self, _messages: Vec<ChatMessage>) -> anyhow::Result<String> {
        Ok("Bonjour".to_string())
    }
}

struct FixedLocation(f64, f64);

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn current_position(&self) -> anyhow::Result<(f64, f64)> {
        Ok((self.0, self.1))
    }
}

struct SlowLocation;

#[async_trait]
impl LocationProvider for SlowLocation {
    async fn current_position(&self) -> anyhow::Result<(f64, f64)> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok((1.0, 1.0))
    }
}

struct DeniedLocation;

#[async_trait]
impl LocationProvider for DeniedLocation {
    async fn current_position(&self) -> anyhow::Result<(f64, f64)> {
        Err(anyhow::anyhow!("permission denied"))
    }
}

fn capture() -> ImagePayload {
    ImagePayload::jpeg("QkVGT1JF")
}

#[tokio::test]
async fn capture_analysis_fills_locality_defaults() {
    init_tracing();
    let pipeline = AnalysisPipeline::new(Arc::new(StubProvider::happy()), PipelineConfig::default())
        .with_location(Arc::new(FixedLocation(5.36, -4.01)));

    let analysis = pipeline.analyze_capture(capture()).await.unwrap();

    assert_eq!(analysis.result.city, "Abidjan");
    assert_eq!(analysis.result.sector, "Secteur Inconnu");
    assert_eq!(analysis.position, (5.36, -4.01));
    assert!(analysis.clean_vision.is_some());
    let center = analysis.nearest_center.unwrap();
    assert_eq!(center.name, "Centre de collecte Abidjan");
}

#[tokio::test]
async fn enrichment_failures_degrade_to_absent_values() {
    let provider = StubProvider {
        fail_clean_vision: true,
        fail_center: true,
    };
    let pipeline = AnalysisPipeline::new(Arc::new(provider), PipelineConfig::default());

    let analysis = pipeline.analyze_capture(capture()).await.unwrap();

    assert!(analysis.clean_vision.is_none());
    assert!(analysis.nearest_center.is_none());
}

#[tokio::test]
async fn slow_geolocation_falls_back_to_stub_fix() {
    let config = PipelineConfig {
        geo_timeout: Duration::from_millis(50),
        ..PipelineConfig::default()
    };
    let fallback = config.fallback_position;
    let pipeline = AnalysisPipeline::new(Arc::new(StubProvider::happy()), config)
        .with_location(Arc::new(SlowLocation));

    let analysis = pipeline.analyze_capture(capture()).await.unwrap();
    assert_eq!(analysis.position, fallback);
}

#[tokio::test]
async fn denied_geolocation_falls_back_to_stub_fix() {
    let config = PipelineConfig::default();
    let fallback = config.fallback_position;
    let pipeline = AnalysisPipeline::new(Arc::new(StubProvider::happy()), config)
        .with_location(Arc::new(DeniedLocation));

    let analysis = pipeline.analyze_capture(capture()).await.unwrap();
    assert_eq!(analysis.position, fallback);
}

#[tokio::test]
async fn missing_location_provider_uses_stub_fix() {
    let config = PipelineConfig::default();
    let fallback = config.fallback_position;
    let pipeline = AnalysisPipeline::new(Arc::new(StubProvider::happy()), config);

    let analysis = pipeline.analyze_capture(capture()).await.unwrap();
    assert_eq!(analysis.position, fallback);
}

#[tokio::test]
async fn assistant_reply_round_trips_through_the_provider() {
    let pipeline =
        AnalysisPipeline::new(Arc::new(StubProvider::happy()), PipelineConfig::default());

    let history = vec![ChatMessage {
        role: "model".to_string(),
        content: "Comment puis-je aider ?".to_string(),
    }];
    let reply = pipeline
        .assistant_reply(history, "Où déposer mes gravats ?")
        .await
        .unwrap();
    assert_eq!(reply, "Bonjour");
}

#[tokio::test]
async fn evolution_assessment_passes_through() {
    let pipeline =
        AnalysisPipeline::new(Arc::new(StubProvider::happy()), PipelineConfig::default());

    let before = capture();
    let after = ImagePayload::jpeg("QUZURVI=");
    let assessment = pipeline.assess_evolution(&before, &after).await.unwrap();

    assert_eq!(assessment.status, WasteStatus::Cleaned);
    assert!(!assessment.insight.is_empty());
}
