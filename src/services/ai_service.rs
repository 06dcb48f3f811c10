use anyhow::anyhow;
use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::error;

use crate::config::UpstreamConfig;
use crate::error::RelayError;
use crate::models::{ChatMessage, SearchResult};
use crate::providers::AiProvider;
use crate::utils::{build_answer_prompt, ANSWER_SYSTEM_PROMPT};

#[derive(Clone)]
pub struct AiService {
    client: Client,
    timeout: Duration,
    max_tokens: u32,
    temperature: f32,
}

impl AiService {
    pub fn new(client: Client, config: &UpstreamConfig) -> Self {
        Self {
            client,
            timeout: Duration::from_secs(config.ai_timeout_secs),
            max_tokens: config.ai_max_tokens,
            temperature: config.ai_temperature,
        }
    }

    pub async fn generate(
        &self,
        provider: AiProvider,
        query: &str,
        context: &[SearchResult],
        api_key: &str,
    ) -> Result<String, RelayError> {
        let prompt = build_answer_prompt(query, context);
        let body = generate_body(provider, &prompt, self.max_tokens, self.temperature, false);

        let data = self
            .execute(provider, api_key, &body)
            .await?
            .json::<Value>()
            .await
            .map_err(RelayError::from_reqwest)?;

        extract_answer(provider, &data)
            .ok_or_else(|| RelayError::Internal(anyhow!("unexpected {} response shape", provider)))
    }

    /// Opens the upstream event stream with `stream: true`. The status is
    /// checked here; the caller owns forwarding the body.
    pub async fn stream_generate(
        &self,
        provider: AiProvider,
        query: &str,
        context: &[SearchResult],
        api_key: &str,
    ) -> Result<reqwest::Response, RelayError> {
        let prompt = build_answer_prompt(query, context);
        let body = generate_body(provider, &prompt, self.max_tokens, self.temperature, true);
        self.execute(provider, api_key, &body).await
    }

    pub async fn chat(
        &self,
        provider: AiProvider,
        messages: &[ChatMessage],
        api_key: &str,
    ) -> Result<String, RelayError> {
        let conversation: Vec<Value> = messages
            .iter()
            .map(|message| json!({ "role": message.role.as_str(), "content": message.content }))
            .collect();

        let body = json!({
            "model": provider.default_model(),
            "messages": conversation,
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
        });

        let data = self
            .execute(provider, api_key, &body)
            .await?
            .json::<Value>()
            .await
            .map_err(RelayError::from_reqwest)?;

        extract_answer(provider, &data)
            .ok_or_else(|| RelayError::Internal(anyhow!("unexpected {} response shape", provider)))
    }

    async fn execute(
        &self,
        provider: AiProvider,
        api_key: &str,
        body: &Value,
    ) -> Result<reqwest::Response, RelayError> {
        let request = with_credentials(self.client.post(provider.endpoint()), provider, api_key);
        let response = request
            .timeout(self.timeout)
            .json(body)
            .send()
            .await
            .map_err(RelayError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("AI API error for {}: {} - {}", provider, status, body);
            return Err(RelayError::from_status(status, body));
        }

        Ok(response)
    }
}

fn with_credentials(
    request: RequestBuilder,
    provider: AiProvider,
    api_key: &str,
) -> RequestBuilder {
    match provider {
        AiProvider::OpenAi | AiProvider::Groq | AiProvider::Cohere => request.bearer_auth(api_key),
        AiProvider::Anthropic => request
            .header("x-api-key", api_key)
            .header("anthropic-version", "2023-06-01"),
    }
}

fn generate_body(
    provider: AiProvider,
    prompt: &str,
    max_tokens: u32,
    temperature: f32,
    stream: bool,
) -> Value {
    match provider {
        AiProvider::OpenAi | AiProvider::Groq => json!({
            "model": provider.default_model(),
            "messages": [
                { "role": "system", "content": ANSWER_SYSTEM_PROMPT },
                { "role": "user", "content": prompt }
            ],
            "max_tokens": max_tokens,
            "temperature": temperature,
            "stream": stream,
        }),
        AiProvider::Cohere => json!({
            "prompt": prompt,
            "max_tokens": max_tokens,
            "temperature": temperature,
            "k": 0,
            "stop_sequences": [],
            "return_likelihoods": "NONE",
        }),
        AiProvider::Anthropic => json!({
            "model": provider.default_model(),
            "max_tokens": max_tokens,
            "messages": [
                { "role": "user", "content": prompt }
            ],
        }),
    }
}

fn extract_answer(provider: AiProvider, data: &Value) -> Option<String> {
    let text = match provider {
        AiProvider::OpenAi | AiProvider::Groq => data
            .get("choices")?
            .get(0)?
            .get("message")?
            .get("content")?
            .as_str()?,
        AiProvider::Cohere => data.get("generations")?.get(0)?.get("text")?.as_str()?,
        AiProvider::Anthropic => data.get("content")?.get(0)?.get("text")?.as_str()?,
    };
    Some(text.trim().to_string())
}
