pub mod client;
pub mod models;
pub mod provider;
pub mod schema;
pub mod traits;

// Re-export public APIs
pub use client::AnalysisPipeline;
pub use models::{CaptureAnalysis, ImagePayload, PipelineConfig, ProviderConfig};
pub use provider::GeminiProvider;
pub use traits::{ChatMessage, LocationProvider, VisionProvider};
