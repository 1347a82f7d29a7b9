//! Gemini client for embeddings and multimodal answer generation
//!
//! Talks to the public Generative Language API with an API key, the same
//! endpoints and models the system was designed around (gemini-2.5-flash for
//! generation, gemini-embedding-001 for embeddings).

use async_trait::async_trait;
use base64::Engine as _;
use reqwest::Client;
use std::time::Duration;

use crate::config::{EmbeddingConfig, LlmConfig};
use crate::error::{Error, Result};
use crate::generation::GenerationRequest;

use super::embedding::EmbeddingProvider;
use super::llm::GenerativeProvider;

/// Gemini API client
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    embed_model: String,
    dimensions: usize,
    temperature: f32,
    max_output_tokens: u32,
}

impl GeminiClient {
    /// Create a new Gemini client
    ///
    /// The API key comes from config or the `GEMINI_API_KEY` environment
    /// variable. The configured timeout bounds every call; a timed-out call
    /// fails and is not retried here.
    pub fn new(llm: &LlmConfig, embeddings: &EmbeddingConfig) -> Result<Self> {
        let api_key = llm
            .resolve_api_key()
            .ok_or_else(|| Error::config("Gemini API key not set (config or GEMINI_API_KEY)"))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(llm.timeout_secs))
            .build()
            .map_err(|e| Error::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: llm.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: llm.model.clone(),
            embed_model: embeddings.model.clone(),
            dimensions: embeddings.dimensions,
            temperature: llm.temperature,
            max_output_tokens: llm.max_output_tokens,
        })
    }

    fn generate_endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }

    fn embed_endpoint(&self) -> String {
        format!(
            "{}/models/{}:embedContent?key={}",
            self.base_url, self.embed_model, self.api_key
        )
    }
}

#[derive(serde::Serialize)]
struct GenerateBody {
    #[serde(rename = "systemInstruction")]
    system_instruction: Content,
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(serde::Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(serde::Serialize)]
enum Part {
    #[serde(rename = "text")]
    Text(String),
    #[serde(rename = "inline_data")]
    InlineData { mime_type: String, data: String },
}

#[derive(serde::Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(serde::Deserialize)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(serde::Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(serde::Deserialize)]
struct ResponseContent {
    parts: Vec<ResponsePart>,
}

#[derive(serde::Deserialize)]
struct ResponsePart {
    text: String,
}

#[derive(serde::Serialize)]
struct EmbedBody {
    content: EmbedContent,
}

#[derive(serde::Serialize)]
struct EmbedContent {
    parts: Vec<EmbedPart>,
}

#[derive(serde::Serialize)]
struct EmbedPart {
    text: String,
}

#[derive(serde::Deserialize)]
struct EmbedResponse {
    embedding: EmbedValues,
}

#[derive(serde::Deserialize)]
struct EmbedValues {
    values: Vec<f32>,
}

#[async_trait]
impl GenerativeProvider for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let mut parts = vec![Part::Text(request.user_text())];
        for attachment in &request.attachments {
            parts.push(Part::InlineData {
                mime_type: attachment.mime.clone(),
                data: base64::engine::general_purpose::STANDARD.encode(&attachment.bytes),
            });
        }

        let body = GenerateBody {
            system_instruction: Content {
                role: None,
                parts: vec![Part::Text(request.system.clone())],
            },
            contents: vec![Content {
                role: Some("user".to_string()),
                parts,
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_output_tokens,
            },
        };

        let response = self
            .client
            .post(self.generate_endpoint())
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::generation(format!("Gemini request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::generation(format!(
                "Gemini generation failed ({status}): {body}"
            )));
        }

        let gen_response: GenerateResponse = response
            .json()
            .await
            .map_err(|e| Error::generation(format!("Failed to parse Gemini response: {e}")))?;

        gen_response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| Error::generation("No text in Gemini response"))
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/models?key={}", self.base_url, self.api_key);
        match self.client.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let body = EmbedBody {
            content: EmbedContent {
                parts: vec![EmbedPart {
                    text: text.to_string(),
                }],
            },
        };

        let response = self
            .client
            .post(self.embed_endpoint())
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::embedding(format!("Gemini embedding request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::embedding(format!(
                "Gemini embedding failed ({status}): {body}"
            )));
        }

        let embed_response: EmbedResponse = response
            .json()
            .await
            .map_err(|e| Error::embedding(format!("Failed to parse embedding response: {e}")))?;

        Ok(embed_response.embedding.values)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn health_check(&self) -> Result<bool> {
        GenerativeProvider::health_check(self).await
    }

    fn name(&self) -> &str {
        "gemini"
    }
}
