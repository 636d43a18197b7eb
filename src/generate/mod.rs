//! Client for the Gemini `generateContent` API, with a capped
//! exponential-backoff retry around the call.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::{Result, WeeklogError};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const MAX_ATTEMPTS: u32 = 2;
const BASE_DELAY_MS: u64 = 1000;

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

impl GenerateRequest {
    fn new(prompt: &str) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: prompt.to_string(),
                }],
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Upstream reply relayed verbatim by the `/generate` proxy.
#[derive(Debug)]
pub struct UpstreamReply {
    pub status: u16,
    pub body: Value,
}

impl UpstreamReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

fn extract_text(response: GenerateResponse) -> Result<String> {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content.parts.into_iter().next())
        .map(|p| p.text)
        .ok_or_else(|| WeeklogError::Generate("empty response from model".to_string()))
}

/// Error message for a non-success reply: the server-supplied `message` when
/// the body carries one, else a generic status-code message.
fn status_message(status: u16, body: &Value) -> String {
    body.get("message")
        .or_else(|| body.get("error").and_then(|e| e.get("message")))
        .and_then(Value::as_str)
        .map(|m| m.to_string())
        .unwrap_or_else(|| format!("HTTP error! status: {}", status))
}

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            model,
        }
    }

    /// Build a client from `GEMINI_API_KEY`, if set.
    pub fn from_env(model: &str) -> Option<Self> {
        let api_key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty())?;
        Some(Self::new(api_key, model.to_string()))
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent?key={}",
            API_BASE, self.model, self.api_key
        )
    }

    /// Forward a prompt upstream and return status plus body verbatim.
    /// Transport failure is an error; a non-success status is not.
    pub async fn proxy(&self, prompt: &str) -> Result<UpstreamReply> {
        let response = self
            .http
            .post(self.endpoint())
            .json(&GenerateRequest::new(prompt))
            .send()
            .await?;

        let status = response.status().as_u16();
        let body: Value = response.json().await?;

        Ok(UpstreamReply { status, body })
    }

    /// One generate call, returning the reply text.
    pub async fn generate_text(&self, prompt: &str) -> Result<String> {
        let reply = self.proxy(prompt).await?;
        if !reply.is_success() {
            return Err(WeeklogError::Generate(status_message(
                reply.status,
                &reply.body,
            )));
        }

        let response: GenerateResponse = serde_json::from_value(reply.body)?;
        extract_text(response)
    }

    /// `generate_text` wrapped in a capped retry: the delay doubles before
    /// each attempt, and exhaustion surfaces a generic failure rather than
    /// partial data.
    pub async fn generate_with_backoff(&self, prompt: &str) -> Result<String> {
        let mut attempt = 0;
        while attempt < MAX_ATTEMPTS {
            match self.generate_text(prompt).await {
                Ok(text) => return Ok(text),
                Err(e) => {
                    let delay_ms = BASE_DELAY_MS << attempt;
                    warn!(attempt = attempt + 1, error = %e, "generate attempt failed, retrying in {}ms", delay_ms);
                    tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
                    attempt += 1;
                }
            }
        }
        Err(WeeklogError::Generate(
            "Max retries reached. Could not generate content.".to_string(),
        ))
    }
}
