//! reqwest による解析サービス呼び出し

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use style_advisor_common::{
    AnalysisTransport, AnalyzeRequest, AnalyzeResponse, ClientConfig, Error,
    GenerateImagesRequest, GenerateImagesResponse,
};
use tracing::debug;

use crate::error::{Result, StyleAdvisorError};

pub struct ReqwestTransport {
    client: reqwest::Client,
    analyze_url: String,
    generate_images_url: String,
}

impl ReqwestTransport {
    pub fn new(config: &ClientConfig, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StyleAdvisorError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            analyze_url: config.analyze_url(),
            generate_images_url: config.generate_images_url(),
        })
    }

    pub fn analyze_url(&self) -> &str {
        &self.analyze_url
    }

    pub fn generate_images_url(&self) -> &str {
        &self.generate_images_url
    }

    async fn post_json<Req, Resp>(&self, url: &str, payload: &Req) -> style_advisor_common::Result<Resp>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        debug!(url, "POST");
        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::Transport(format!("API error: {} {}", status, text.trim())));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Transport(format!("{}: {}", url, e)))?;
        debug!(url, bytes = body.len(), "response received");
        Ok(serde_json::from_str(&body)?)
    }
}

impl AnalysisTransport for ReqwestTransport {
    async fn analyze(&self, request: &AnalyzeRequest) -> style_advisor_common::Result<AnalyzeResponse> {
        self.post_json(&self.analyze_url, request).await
    }

    async fn generate_images(
        &self,
        request: &GenerateImagesRequest,
    ) -> style_advisor_common::Result<GenerateImagesResponse> {
        self.post_json(&self.generate_images_url, request).await
    }
}

/// 画像生成を行わないトランスポート（`--no-images`）
pub struct WithoutImages<T>(pub T);

impl<T: AnalysisTransport> AnalysisTransport for WithoutImages<T> {
    async fn analyze(&self, request: &AnalyzeRequest) -> style_advisor_common::Result<AnalyzeResponse> {
        let mut response = self.0.analyze(request).await?;
        response.needs_image_generation = Some(false);
        Ok(response)
    }

    async fn generate_images(
        &self,
        _request: &GenerateImagesRequest,
    ) -> style_advisor_common::Result<GenerateImagesResponse> {
        Err(Error::SecondaryRequestFailed("image generation is disabled".into()))
    }
}
