use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::time::Duration;

use crate::config::AiConfig;
use crate::models::itinerary::PlanDay;

#[derive(Debug)]
pub enum AiError {
    EnvironmentError(String),
    HttpError(reqwest::Error),
    ApiError { status: u16, body: String },
    ModelsExhausted,
    MalformedResponse(String),
}

impl fmt::Display for AiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AiError::EnvironmentError(msg) => write!(f, "Environment error: {}", msg),
            AiError::HttpError(err) => write!(f, "HTTP error: {}", err),
            AiError::ApiError { status, body } => write!(f, "API error {}: {}", status, body),
            AiError::ModelsExhausted => write!(f, "No configured model could answer"),
            AiError::MalformedResponse(msg) => write!(f, "Malformed response: {}", msg),
        }
    }
}

impl Error for AiError {}

impl From<reqwest::Error> for AiError {
    fn from(err: reqwest::Error) -> Self {
        AiError::HttpError(err)
    }
}

/// A text model that turns a prompt into a reply.
#[async_trait]
pub trait PlanModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, AiError>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

/// Client for the Gemini `generateContent` endpoint.
///
/// Models are tried in order. A model that is over quota (429) or unknown
/// (404) is skipped; any other failure ends the attempt.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    models: Vec<String>,
}

impl GeminiClient {
    pub fn new(config: &AiConfig) -> Result<Self, AiError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| AiError::EnvironmentError("GEMINI_API_KEY not set".to_string()))?;

        if config.models.is_empty() {
            return Err(AiError::EnvironmentError(
                "GEMINI_MODELS is empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            models: config.models.clone(),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }
}

#[async_trait]
impl PlanModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        for model in &self.models {
            let response = self
                .client
                .post(self.endpoint(model))
                .query(&[("key", self.api_key.as_str())])
                .json(&body)
                .send()
                .await?;

            match response.status() {
                StatusCode::TOO_MANY_REQUESTS => {
                    log::warn!("Gemini model {} is over quota, trying next", model);
                    continue;
                }
                StatusCode::NOT_FOUND => {
                    log::warn!("Gemini model {} not found, trying next", model);
                    continue;
                }
                status if !status.is_success() => {
                    let body = response.text().await.unwrap_or_default();
                    return Err(AiError::ApiError {
                        status: status.as_u16(),
                        body,
                    });
                }
                _ => {}
            }

            let parsed: GenerateResponse = response.json().await?;
            let text = parsed.text();
            if text.trim().is_empty() {
                return Err(AiError::MalformedResponse(format!(
                    "model {} returned no text",
                    model
                )));
            }

            log::info!("Itinerary generated with Gemini model {}", model);
            return Ok(text);
        }

        Err(AiError::ModelsExhausted)
    }
}

/// Turns a model reply into exactly `days` plan days.
///
/// Accepts replies wrapped in Markdown code fences or surrounded by prose.
/// Extra days are dropped; too few is an error. Days are renumbered from 1
/// and a missing cost becomes `daily_budget`.
pub fn parse_ai_plan(text: &str, days: usize, daily_budget: i64) -> Result<Vec<PlanDay>, AiError> {
    let cleaned = strip_code_fences(text);
    if cleaned.is_empty() {
        return Err(AiError::MalformedResponse("empty reply".to_string()));
    }

    let start = cleaned.find('[');
    let end = cleaned.rfind(']');
    let json = match (start, end) {
        (Some(s), Some(e)) if s < e => &cleaned[s..=e],
        _ => {
            return Err(AiError::MalformedResponse(
                "reply contains no JSON array".to_string(),
            ))
        }
    };

    let mut plan: Vec<PlanDay> = serde_json::from_str(json)
        .map_err(|e| AiError::MalformedResponse(format!("invalid plan JSON: {}", e)))?;

    if plan.len() < days {
        return Err(AiError::MalformedResponse(format!(
            "expected {} days, got {}",
            days,
            plan.len()
        )));
    }

    plan.truncate(days);
    for (i, day) in plan.iter_mut().enumerate() {
        day.day = (i + 1) as u32;
        if day.approx_cost.is_none() {
            day.approx_cost = Some(daily_budget);
        }
    }

    Ok(plan)
}

fn strip_code_fences(text: &str) -> &str {
    let mut trimmed = text.trim();
    if let Some(rest) = trimmed.strip_prefix("```") {
        // Drop the info string ("json") along with the opening fence.
        trimmed = match rest.find('\n') {
            Some(newline) => &rest[newline + 1..],
            None => rest,
        };
    }
    if let Some(rest) = trimmed.strip_suffix("```") {
        trimmed = rest;
    }
    trimmed.trim()
}
