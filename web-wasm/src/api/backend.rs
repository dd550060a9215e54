//! 解析バックエンド（/analyze, /generate-images）への fetch 通信

use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use style_advisor_common::{
    AnalysisTransport, AnalyzeRequest, AnalyzeResponse, ClientConfig, Error,
    GenerateImagesRequest, GenerateImagesResponse, Result,
};

use crate::camera::describe_js_error;

/// ブラウザの fetch を使うトランスポート
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTransport {
    analyze_url: String,
    generate_images_url: String,
}

impl FetchTransport {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            analyze_url: config.analyze_url(),
            generate_images_url: config.generate_images_url(),
        }
    }

    pub fn analyze_url(&self) -> &str {
        &self.analyze_url
    }

    pub fn generate_images_url(&self) -> &str {
        &self.generate_images_url
    }
}

/// JSONをPOSTしてJSONを受け取る（共通処理）
async fn post_json<Req, Resp>(url: &str, payload: &Req) -> std::result::Result<Resp, JsValue>
where
    Req: Serialize,
    Resp: DeserializeOwned,
{
    let body = serde_json::to_string(payload)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_body(&JsValue::from_str(&body));

    let request = Request::new_with_str_and_init(url, &opts)?;
    request.headers().set("Content-Type", "application/json")?;

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("window is not available"))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request)).await?;
    let resp: Response = resp_value.dyn_into()?;

    if !resp.ok() {
        return Err(JsValue::from_str(&format!("API error: {}", resp.status())));
    }

    // 本文がJSONでなければここで reject される
    let json = JsFuture::from(resp.json()?).await?;
    Ok(serde_wasm_bindgen::from_value(json)?)
}

fn transport_error(url: &str, e: JsValue) -> Error {
    Error::Transport(format!("{}: {}", url, describe_js_error(&e)))
}

impl AnalysisTransport for FetchTransport {
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalyzeResponse> {
        post_json(&self.analyze_url, request)
            .await
            .map_err(|e| transport_error(&self.analyze_url, e))
    }

    async fn generate_images(&self, request: &GenerateImagesRequest) -> Result<GenerateImagesResponse> {
        post_json(&self.generate_images_url, request)
            .await
            .map_err(|e| transport_error(&self.generate_images_url, e))
    }
}


#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    async fn wasm_unreachable_backend_is_transport_error() {
        let transport = FetchTransport::new(&ClientConfig::with_base_url("http://127.0.0.1:9"));
        let request = AnalyzeRequest {
            image: "data:image/jpeg;base64,/9j/".into(),
            occasion: "work".into(),
            attire: "business".into(),
        };
        let err = transport.analyze(&request).await.expect_err("接続できないはず");
        assert!(matches!(err, Error::Transport(_)));
    }
}
