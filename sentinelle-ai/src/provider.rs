use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use sentinelle_common::models::ai::{AnalysisResult, EvolutionAssessment};
use sentinelle_common::models::report::{DisposalCenter, WasteNature};

use crate::models::{ImagePayload, ProviderConfig};
use crate::schema::{analysis_schema, center_schema, evolution_schema};
use crate::traits::{ChatMessage, VisionProvider};

const ANALYSIS_PROMPT: &str = "Tu es un expert environnemental chevronné en Côte d'Ivoire. \
Analyse cette image de pollution et fournis la classification complète : nature, statut, \
confiance, description, gravité, conseil expert, ville et commune supposées, un plan \
d'action en 3 étapes et la répartition des matériaux. Réponds EXCLUSIVEMENT en JSON.";

const CLEAN_VISION_PROMPT: &str = "Transforme ce site pollué en Côte d'Ivoire en un espace \
urbain idéal, propre, avec de la verdure et sans aucun déchet. Garde la structure des \
bâtiments.";

const EVOLUTION_PROMPT: &str = "Compare ces deux photos d'un site en Côte d'Ivoire. L'état \
s'est-il amélioré ? Donne le nouveau statut et une analyse courte en JSON.";

/// Gemini provider implementation
pub struct GeminiProvider {
    config: ProviderConfig,
    client: Client,
}

impl GeminiProvider {
    /// Create a new Gemini provider with the given configuration
    pub fn new(config: ProviderConfig) -> Self {
        let client = Client::new();
        Self { config, client }
    }

    fn endpoint(&self, model: &str) -> String {
        let api_base = self.config.api_base.clone().unwrap_or_else(|| {
            "https://generativelanguage.googleapis.com/v1beta".to_string()
        });
        format!("{}/models/{}:generateContent", api_base, model)
    }

    fn image_part(image: &ImagePayload) -> serde_json::Value {
        json!({
            "inlineData": {
                "mimeType": image.mime_type,
                "data": image.base64_body(),
            }
        })
    }

    /// Send one generateContent request and return the parsed body.
    async fn generate(
        &self,
        model: &str,
        payload: serde_json::Value,
    ) -> anyhow::Result<serde_json::Value> {
        tracing::info!("Making API call to {}", self.endpoint(model));

        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.config.api_key)
            .json(&payload)
            .send()
            .await?;

        // Get the raw response text first for better error handling
        let response_text = response.text().await?;
        tracing::debug!("Raw API response: {}", response_text);

        // Try to parse as JSON
        let data = match serde_json::from_str::<serde_json::Value>(&response_text) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to parse API response as JSON: {:?}", e);
                tracing::error!("Response text: {}", response_text);
                return Err(anyhow::anyhow!("API returned non-JSON response: {}", e));
            }
        };

        // Check for API errors
        if let Some(error) = data.get("error") {
            tracing::error!("API returned error: {:?}", error);
            let error_message = error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("Unknown error");
            return Err(anyhow::anyhow!("API error: {}", error_message));
        }

        Ok(data)
    }

    /// Extract the first text part of the first candidate.
    fn first_text(data: &serde_json::Value) -> anyhow::Result<String> {
        let parts = data["candidates"][0]["content"]["parts"]
            .as_array()
            .ok_or_else(|| anyhow::anyhow!("Response missing candidate parts"))?;

        let text = parts
            .iter()
            .find_map(|p| p.get("text").and_then(|t| t.as_str()))
            .ok_or_else(|| anyhow::anyhow!("Response candidate has no text part"))?;

        Ok(text.to_string())
    }

    /// Extract the first inline-data part of the first candidate, if any.
    fn first_inline_data(data: &serde_json::Value) -> Option<ImagePayload> {
        let parts = data["candidates"][0]["content"]["parts"].as_array()?;
        parts.iter().find_map(|p| {
            let inline = p.get("inlineData")?;
            Some(ImagePayload {
                mime_type: inline
                    .get("mimeType")
                    .and_then(|m| m.as_str())
                    .unwrap_or("image/png")
                    .to_string(),
                data: inline.get("data")?.as_str()?.to_string(),
            })
        })
    }
}

#[async_trait]
impl VisionProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn analyze_image(&self, image: &ImagePayload) -> anyhow::Result<AnalysisResult> {
        let payload = json!({
            "contents": [{
                "parts": [
                    Self::image_part(image),
                    { "text": ANALYSIS_PROMPT },
                ]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": analysis_schema(),
                "thinkingConfig": { "thinkingBudget": 0 },
            },
        });

        let data = self.generate(&self.config.analysis_model, payload).await?;
        let content = Self::first_text(&data)?;

        let result = match serde_json::from_str::<AnalysisResult>(&content) {
            Ok(result) => result,
            Err(e) => {
                tracing::error!("Failed to parse analysis payload: {:?}", e);
                tracing::error!("Payload text: {}", content);
                return Err(anyhow::anyhow!("Invalid analysis payload: {}", e));
            }
        };

        Ok(result)
    }

    async fn analyze_evolution(
        &self,
        before: &ImagePayload,
        after: &ImagePayload,
    ) -> anyhow::Result<EvolutionAssessment> {
        let payload = json!({
            "contents": [{
                "parts": [
                    Self::image_part(before),
                    Self::image_part(after),
                    { "text": EVOLUTION_PROMPT },
                ]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": evolution_schema(),
            },
        });

        let data = self.generate(&self.config.chat_model, payload).await?;
        let content = Self::first_text(&data)?;

        let assessment = match serde_json::from_str::<EvolutionAssessment>(&content) {
            Ok(assessment) => assessment,
            Err(e) => {
                tracing::error!("Failed to parse evolution payload: {:?}", e);
                tracing::error!("Payload text: {}", content);
                return Err(anyhow::anyhow!("Invalid evolution payload: {}", e));
            }
        };

        Ok(assessment)
    }

    async fn generate_clean_vision(
        &self,
        image: &ImagePayload,
    ) -> anyhow::Result<Option<ImagePayload>> {
        let payload = json!({
            "contents": [{
                "parts": [
                    Self::image_part(image),
                    { "text": CLEAN_VISION_PROMPT },
                ]
            }],
        });

        // The rendering is decorative; a failed generation degrades to None
        // rather than failing the capture.
        let data = match self.generate(&self.config.vision_model, payload).await {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("Clean vision generation failed: {:?}", e);
                return Ok(None);
            }
        };

        Ok(Self::first_inline_data(&data))
    }

    async fn synthesize_speech(&self, text: &str) -> anyhow::Result<Option<Vec<u8>>> {
        let payload = json!({
            "contents": [{ "parts": [{ "text": text }] }],
            "generationConfig": {
                "responseModalities": ["AUDIO"],
                "speechConfig": {
                    "voiceConfig": {
                        "prebuiltVoiceConfig": { "voiceName": "Kore" },
                    },
                },
            },
        });

        let data = match self.generate(&self.config.tts_model, payload).await {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("Speech synthesis failed: {:?}", e);
                return Ok(None);
            }
        };

        let Some(inline) = Self::first_inline_data(&data) else {
            return Ok(None);
        };

        match BASE64.decode(inline.base64_body()) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) => {
                tracing::warn!("Audio payload was not valid base64: {:?}", e);
                Ok(None)
            }
        }
    }

    async fn find_disposal_center(
        &self,
        nature: WasteNature,
        city: &str,
    ) -> anyhow::Result<Option<DisposalCenter>> {
        let prompt = format!(
            "Identifie un point de collecte officiel ou un centre de recyclage pour des \
             déchets de type \"{}\" à \"{}\", Côte d'Ivoire. Réponds en JSON.",
            nature, city
        );

        let payload = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": center_schema(),
            },
        });

        let data = self.generate(&self.config.chat_model, payload).await?;
        let content = Self::first_text(&data)?;

        // A center is optional data: an unusable payload is absence, not an
        // error.
        match serde_json::from_str::<DisposalCenter>(&content) {
            Ok(center) if !center.name.is_empty() => Ok(Some(center)),
            Ok(_) => Ok(None),
            Err(e) => {
                tracing::warn!("Disposal center payload unusable: {:?}", e);
                Ok(None)
            }
        }
    }

    async fn chat(&self, messages: Vec<ChatMessage>) -> anyhow::Result<String> {
        // System messages go into the dedicated instruction slot, not the
        // turn list.
        let system_message = messages
            .iter()
            .find(|msg| msg.role == "system")
            .map(|msg| msg.content.clone());

        let formatted_messages: Vec<serde_json::Value> = messages
            .iter()
            .filter(|msg| msg.role != "system")
            .map(|msg| {
                let role = match msg.role.as_str() {
                    "model" | "assistant" => "model",
                    _ => "user",
                };
                json!({
                    "role": role,
                    "parts": [{ "text": msg.content }],
                })
            })
            .collect();

        let mut payload = json!({ "contents": formatted_messages });

        // An explicit system message wins over the configured one.
        let system_prompt = system_message
            .or_else(|| self.config.options.get("system_prompt").cloned());
        if let Some(system_prompt) = system_prompt {
            payload["systemInstruction"] = json!({
                "parts": [{ "text": system_prompt }],
            });
        }

        let data = self.generate(&self.config.chat_model, payload).await?;
        Self::first_text(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_data_extraction() {
        let data = json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "ignored" },
                        { "inlineData": { "mimeType": "image/png", "data": "QUJD" } },
                    ]
                }
            }]
        });
        let img = GeminiProvider::first_inline_data(&data).unwrap();
        assert_eq!(img.mime_type, "image/png");
        assert_eq!(img.data, "QUJD");
    }

    #[test]
    fn first_text_requires_a_text_part() {
        let data = json!({
            "candidates": [{ "content": { "parts": [{ "inlineData": {} }] } }]
        });
        assert!(GeminiProvider::first_text(&data).is_err());

        let data = json!({
            "candidates": [{ "content": { "parts": [{ "text": "{\"ok\":true}" }] } }]
        });
        assert_eq!(GeminiProvider::first_text(&data).unwrap(), "{\"ok\":true}");
    }
}
