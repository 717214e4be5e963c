// src/annotate/openai.rs
//! OpenAI Chat Completions collaborator.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::annotate::LanguageModel;
use crate::config::ai::AiConfig;

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

pub struct OpenAiChat {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl OpenAiChat {
    pub fn new(cfg: &AiConfig) -> Result<Self> {
        if cfg.api_key.trim().is_empty() {
            bail!("OpenAI client requires an api key");
        }
        let http = reqwest::Client::builder()
            .user_agent("goma-news/0.1")
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("building openai http client")?;
        Ok(Self {
            http,
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
        })
    }
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct Req<'a> {
    model: &'a str,
    messages: Vec<Msg<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct Resp {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMsg,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChoiceMsg {
    #[serde(default)]
    content: Option<String>,
}

fn check_status(status: reqwest::StatusCode) -> Result<()> {
    if !status.is_success() {
        bail!("openai returned http {status}");
    }
    Ok(())
}

/// First choice's text. Truncated, missing or blank replies are errors.
fn reply_text(body: Resp) -> Result<String> {
    let choice = body
        .choices
        .into_iter()
        .next()
        .context("openai response without choices")?;
    if choice.finish_reason.as_deref() == Some("length") {
        bail!("openai reply truncated (finish_reason=length)");
    }
    let content = choice.message.content.unwrap_or_default();
    if content.trim().is_empty() {
        bail!("openai reply is empty");
    }
    Ok(content)
}

#[async_trait]
impl LanguageModel for OpenAiChat {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let req = Req {
            model: &self.model,
            messages: vec![
                Msg {
                    role: "system",
                    content: system,
                },
                Msg {
                    role: "user",
                    content: user,
                },
            ],
            temperature: 0.2,
            max_tokens: 400,
        };

        let resp = self
            .http
            .post(CHAT_COMPLETIONS_URL)
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await
            .context("openai request")?;

        check_status(resp.status())?;
        let body: Resp = resp.json().await.context("decoding openai response")?;
        reply_text(body)
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}
