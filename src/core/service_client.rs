// src/core/service_client.rs
//! JSON client for the external review model service.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{error, info, trace};

use crate::reviews::model::SentimentScore;

const SUMMARIZE_ENDPOINT: &str = "/summarize";
const SENTIMENT_ENDPOINT: &str = "/sentiment";

#[derive(Serialize)]
struct SummarizeRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct SummarizeResponse {
    summary: String,
}

#[derive(Serialize)]
struct SentimentRequest<'a> {
    texts: &'a [&'a str],
}

pub struct ModelServiceClient {
    client: reqwest::Client,
    base_url: String,
}

impl ModelServiceClient {
    pub fn new(base_url: String, timeout_seconds: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn summarize(&self, text: &str) -> Result<String> {
        let url = format!("{}{}", self.base_url, SUMMARIZE_ENDPOINT);
        info!("Calling summarization service: {} ({} chars)", url, text.len());

        let response: SummarizeResponse = self.post_json(&url, &SummarizeRequest { text }).await?;
        Ok(response.summary)
    }

    pub async fn sentiment(&self, texts: &[&str]) -> Result<Vec<SentimentScore>> {
        let url = format!("{}{}", self.base_url, SENTIMENT_ENDPOINT);
        info!("Calling sentiment service: {} ({} texts)", url, texts.len());

        self.post_json(&url, &SentimentRequest { texts }).await
    }

    async fn post_json<B, T>(&self, url: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: for<'de> Deserialize<'de>,
    {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to call model service: {}", url))?;

        let status = response.status();
        trace!("Model service response status: {}", status);

        if status.is_success() {
            let response_text = response
                .text()
                .await
                .context("Failed to read response text")?;

            serde_json::from_str(&response_text).with_context(|| {
                format!(
                    "Failed to parse model service response. Raw response: {}",
                    response_text
                )
            })
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            error!("Model service error response: {}", error_text);
            anyhow::bail!("Model service returned error status {}: {}", status, error_text)
        }
    }
}
