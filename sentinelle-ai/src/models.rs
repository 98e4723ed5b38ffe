use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use sentinelle_common::models::ai::AnalysisResult;
use sentinelle_common::models::report::DisposalCenter;

/// Configuration for a generative provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL for API requests
    pub api_base: Option<String>,

    /// API key for authentication
    pub api_key: String,

    /// Model used for the heavy classification/reasoning call
    pub analysis_model: String,

    /// Image-generation model for the clean-vision rendering
    pub vision_model: String,

    /// Lightweight model for evolution comparison, center lookup and chat
    pub chat_model: String,

    /// Text-to-speech model for spoken narratives
    pub tts_model: String,

    /// Additional provider-specific configuration options
    pub options: HashMap<String, String>,
}

impl ProviderConfig {
    /// Config with the default model assignment for each task.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_base: None,
            api_key: api_key.into(),
            analysis_model: "gemini-3-pro-preview".to_string(),
            vision_model: "gemini-2.5-flash-image".to_string(),
            chat_model: "gemini-3-flash-preview".to_string(),
            tts_model: "gemini-2.5-flash-preview-tts".to_string(),
            options: HashMap::new(),
        }
    }
}

/// An image travelling to or from the provider as base64.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePayload {
    pub mime_type: String,
    /// Base64 body, possibly still carrying a `data:` URL prefix.
    pub data: String,
}

impl ImagePayload {
    pub fn jpeg(data: impl Into<String>) -> Self {
        Self {
            mime_type: "image/jpeg".to_string(),
            data: data.into(),
        }
    }

    /// Parse a `data:<mime>;base64,<body>` URL; anything else is treated
    /// as a bare JPEG body.
    pub fn from_data_url(url: &str) -> Self {
        if let Some(rest) = url.strip_prefix("data:") {
            if let Some((header, body)) = rest.split_once(',') {
                let mime = header.trim_end_matches(";base64");
                return Self {
                    mime_type: if mime.is_empty() {
                        "image/jpeg".to_string()
                    } else {
                        mime.to_string()
                    },
                    data: body.to_string(),
                };
            }
        }
        Self::jpeg(url)
    }

    /// The bare base64 body, with any `data:` URL prefix stripped.
    pub fn base64_body(&self) -> &str {
        match self.data.split_once(',') {
            Some((_, body)) => body,
            None => &self.data,
        }
    }

    /// Re-encode as a `data:` URL for display layers.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64_body())
    }
}

/// Everything the analysis pipeline produced for one new capture. Feeds
/// report creation; holds no store state of its own.
#[derive(Debug, Clone)]
pub struct CaptureAnalysis {
    pub image: ImagePayload,
    pub result: AnalysisResult,
    pub clean_vision: Option<ImagePayload>,
    pub nearest_center: Option<DisposalCenter>,
    /// Resolved (lat, lng): a device fix, or the stub pair.
    pub position: (f64, f64),
}

/// Tunables for the capture pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Hard bound on the device position fix.
    pub geo_timeout: Duration,
    /// Stub coordinates used on timeout or denial.
    pub fallback_position: (f64, f64),
    /// City assumed when the analysis cannot identify one.
    pub default_city: String,
    /// Sub-locality assumed when the analysis cannot identify one.
    pub default_sector: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            geo_timeout: Duration::from_secs(5),
            fallback_position: (5.3096, -4.0127),
            default_city: "Abidjan".to_string(),
            default_sector: "Secteur Inconnu".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_round_trip() {
        let img = ImagePayload::from_data_url("data:image/png;base64,AAAA");
        assert_eq!(img.mime_type, "image/png");
        assert_eq!(img.base64_body(), "AAAA");
        assert_eq!(img.to_data_url(), "data:image/png;base64,AAAA");
    }

    #[test]
    fn bare_body_is_accepted() {
        let img = ImagePayload::jpeg("QUJD");
        assert_eq!(img.base64_body(), "QUJD");

        // A data-url body stored verbatim still strips down to the payload.
        let img = ImagePayload::jpeg("data:image/jpeg;base64,QUJD");
        assert_eq!(img.base64_body(), "QUJD");
    }
}
