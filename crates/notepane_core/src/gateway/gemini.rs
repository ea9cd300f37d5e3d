//! Gemini `generateContent` client.
//!
//! # Responsibility
//! - Send one prompt to the Gemini REST API and return the answer text.
//! - Turn API error envelopes into readable `GatewayError`s.
//!
//! # Invariants
//! - The key travels in the `x-goog-api-key` header, never in the URL.
//! - The blocking client is created and dropped outside async contexts.

use super::{GatewayError, QueryGateway};
use crate::config::GatewayConfig;
use crate::logging::sanitize_message;
use log::{info, warn};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Instant;

const API_KEY_HEADER: &str = "x-goog-api-key";
const MAX_ERROR_BODY_CHARS: usize = 300;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default, rename = "promptFeedback")]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PromptFeedback {
    #[serde(default, rename = "blockReason")]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// `QueryGateway` backed by the Gemini REST API.
pub struct GeminiGateway {
    client: Client,
    url: String,
    api_key: String,
}

impl GeminiGateway {
    /// Builds a client for `config.model` authenticated with `api_key`.
    pub fn new(config: &GatewayConfig, api_key: impl Into<String>) -> Result<Self, GatewayError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(GatewayError::CredentialMissing);
        }
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| GatewayError::Transport(err.to_string()))?;
        Ok(Self {
            client,
            url: generate_url(&config.endpoint, &config.model),
            api_key,
        })
    }
}

impl QueryGateway for GeminiGateway {
    fn query(&self, prompt: &str) -> Result<String, GatewayError> {
        let started_at = Instant::now();
        let body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&self.url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .map_err(|err| {
                warn!(
                    "event=gateway_query module=gateway status=error duration_ms={} error_code=transport",
                    started_at.elapsed().as_millis()
                );
                GatewayError::Transport(err.to_string())
            })?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|err| GatewayError::Transport(err.to_string()))?;

        if !status.is_success() {
            warn!(
                "event=gateway_query module=gateway status=error duration_ms={} http_status={}",
                started_at.elapsed().as_millis(),
                status.as_u16()
            );
            return Err(GatewayError::Http {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        let answer = parse_answer(&text)?;
        info!(
            "event=gateway_query module=gateway status=ok duration_ms={} prompt_chars={} answer_chars={}",
            started_at.elapsed().as_millis(),
            prompt.chars().count(),
            answer.chars().count()
        );
        Ok(answer)
    }
}

fn generate_url(endpoint: &str, model: &str) -> String {
    let model = model.trim().trim_start_matches("models/");
    format!(
        "{}/models/{}:generateContent",
        endpoint.trim_end_matches('/'),
        model
    )
}

/// Concatenates the text parts of the first candidate.
fn parse_answer(body: &str) -> Result<String, GatewayError> {
    let parsed: GenerateResponse = serde_json::from_str(body)
        .map_err(|err| GatewayError::InvalidResponse(err.to_string()))?;

    let answer = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .unwrap_or_default();

    if !answer.trim().is_empty() {
        return Ok(answer);
    }
    match parsed.prompt_feedback.and_then(|feedback| feedback.block_reason) {
        Some(reason) => Err(GatewayError::InvalidResponse(format!(
            "prompt blocked ({reason})"
        ))),
        None => Err(GatewayError::EmptyResponse),
    }
}

/// Prefers the `error.message` of an API envelope over the raw body.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) if body.trim().is_empty() => "empty error body".to_string(),
        Err(_) => sanitize_message(body.trim(), MAX_ERROR_BODY_CHARS),
    }
}
