//! 解析リクエストパイプライン
//!
//! POST /analyze → (needsImageGeneration のとき) POST /generate-images の
//! 2段階呼び出し。リトライはしない。同時実行の抑止は呼び出し側
//! （`PipelineState::is_requesting` の間は解析ボタンを無効化）。
//!
//! ```text
//! Idle → RequestingPrimary ─┬─ 失敗 / result.error ──────────▶ ErrorDisplay
//!                           ├─ needsImageGeneration=false ──▶ Complete
//!                           └─ needsImageGeneration=true ───▶ RequestingSecondary
//!                                  ├─ 成功 ──▶ CompleteWithImages
//!                                  └─ 失敗 ──▶ CompleteWithoutImages
//! ```

use crate::error::{Error, Result};
use crate::render::{Generation, ResultView};
use crate::selection::{Attire, Occasion, ReadinessPolicy, SelectionState};
use crate::types::{
    AnalysisResult, AnalyzeRequest, AnalyzeResponse, GenerateImagesRequest,
    GenerateImagesResponse, ImageAsset, StyleImageResult,
};

/// 通信失敗時に表示する汎用メッセージ
pub const GENERIC_FAILURE: &str = "Something went wrong while analyzing your photo. Please try again.";

/// 解析サービスへの通信手段
#[allow(async_fn_in_trait)]
pub trait AnalysisTransport {
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalyzeResponse>;

    async fn generate_images(&self, request: &GenerateImagesRequest) -> Result<GenerateImagesResponse>;
}

/// パイプラインの状態
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PipelineState {
    #[default]
    Idle,
    RequestingPrimary,
    RequestingSecondary,
    ErrorDisplay(String),
    Complete,
    CompleteWithImages,
    CompleteWithoutImages,
}

impl PipelineState {
    pub fn is_requesting(&self) -> bool {
        matches!(self, PipelineState::RequestingPrimary | PipelineState::RequestingSecondary)
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, PipelineState::Idle) && !self.is_requesting()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineState::Idle => "idle",
            PipelineState::RequestingPrimary => "requesting-primary",
            PipelineState::RequestingSecondary => "requesting-secondary",
            PipelineState::ErrorDisplay(_) => "error",
            PipelineState::Complete => "complete",
            PipelineState::CompleteWithImages => "complete-with-images",
            PipelineState::CompleteWithoutImages => "complete-without-images",
        }
    }
}

/// パイプラインの進行を受け取る側（表示・ログ）
pub trait AnalysisObserver {
    fn on_state(&mut self, _state: &PipelineState) {}

    /// 初回結果。`images_pending` ならスタイル画像が後から届く
    fn on_initial(&mut self, generation: Generation, result: &AnalysisResult, images_pending: bool);

    /// エラーパネルに出すメッセージ
    fn on_error(&mut self, generation: Generation, message: &str);

    fn on_style_image(&mut self, generation: Generation, image: &StyleImageResult);

    /// 失敗の詳細（ログ用）。2段目の失敗はここにしか通知されない
    fn on_failure(&mut self, _generation: Generation, _error: &Error) {}
}

impl AnalysisObserver for ResultView {
    fn on_initial(&mut self, generation: Generation, result: &AnalysisResult, images_pending: bool) {
        self.show_result(generation, result, images_pending);
    }

    fn on_error(&mut self, generation: Generation, message: &str) {
        self.show_error(generation, message);
    }

    fn on_style_image(&mut self, generation: Generation, image: &StyleImageResult) {
        self.patch_style_image(generation, image);
    }
}

/// 1回の解析に必要な入力
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisInput {
    pub image: ImageAsset,
    pub occasion: Occasion,
    pub attire: Option<Attire>,
}

impl AnalysisInput {
    /// 選択状態から入力を作る（未入力があれば `Error::MissingSelection`）
    pub fn from_selection(
        image: Option<&ImageAsset>,
        selection: &SelectionState,
        policy: &ReadinessPolicy,
    ) -> Result<Self> {
        selection.require_ready(image.is_some(), policy)?;
        match (image, selection.occasion) {
            (Some(image), Some(occasion)) => Ok(Self {
                image: image.clone(),
                occasion,
                attire: selection.attire,
            }),
            _ => Err(Error::MissingSelection(selection.missing(image.is_some(), policy))),
        }
    }

    fn attire_str(&self) -> &'static str {
        self.attire.map(|a| a.as_str()).unwrap_or_default()
    }

    pub fn analyze_request(&self) -> AnalyzeRequest {
        AnalyzeRequest {
            image: self.image.as_str().to_string(),
            occasion: self.occasion.as_str().to_string(),
            attire: self.attire_str().to_string(),
        }
    }

    pub fn generate_images_request(&self, result: &AnalysisResult) -> GenerateImagesRequest {
        GenerateImagesRequest {
            occasion: self.occasion.as_str().to_string(),
            attire: self.attire_str().to_string(),
            styles: result.styles.clone(),
            gender: result.gender.clone(),
            age_range: result.age_range.clone(),
        }
    }
}

fn finish<O: AnalysisObserver>(observer: &mut O, state: PipelineState) -> PipelineState {
    observer.on_state(&state);
    state
}

fn fail_primary<O: AnalysisObserver>(
    observer: &mut O,
    generation: Generation,
    detail: String,
    message: &str,
) -> PipelineState {
    observer.on_failure(generation, &Error::PrimaryRequestFailed(detail));
    observer.on_error(generation, message);
    finish(observer, PipelineState::ErrorDisplay(message.to_string()))
}

/// 解析を1回実行して終端状態を返す
pub async fn run_analysis<T, O>(
    transport: &T,
    generation: Generation,
    input: &AnalysisInput,
    observer: &mut O,
) -> PipelineState
where
    T: AnalysisTransport,
    O: AnalysisObserver,
{
    observer.on_state(&PipelineState::RequestingPrimary);

    let response = match transport.analyze(&input.analyze_request()).await {
        Ok(response) => response,
        Err(e) => return fail_primary(observer, generation, e.to_string(), GENERIC_FAILURE),
    };

    if !response.success {
        let message = response
            .error
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| GENERIC_FAILURE.to_string());
        return fail_primary(observer, generation, message.clone(), &message);
    }

    let Some(result) = response.result else {
        return fail_primary(observer, generation, "response has no result".into(), GENERIC_FAILURE);
    };

    if let Some(message) = result.error_message() {
        observer.on_error(generation, message);
        return finish(observer, PipelineState::ErrorDisplay(message.to_string()));
    }

    let needs_images = response.needs_image_generation.unwrap_or(false);
    observer.on_initial(generation, &result, needs_images);
    if !needs_images {
        return finish(observer, PipelineState::Complete);
    }

    observer.on_state(&PipelineState::RequestingSecondary);
    let request = input.generate_images_request(&result);
    let images = match transport.generate_images(&request).await {
        Ok(GenerateImagesResponse { success: true, images, .. }) => images.unwrap_or_default(),
        Ok(GenerateImagesResponse { error, .. }) => {
            let detail = error.unwrap_or_else(|| "service reported failure".into());
            observer.on_failure(generation, &Error::SecondaryRequestFailed(detail));
            return finish(observer, PipelineState::CompleteWithoutImages);
        }
        Err(e) => {
            observer.on_failure(generation, &Error::SecondaryRequestFailed(e.to_string()));
            return finish(observer, PipelineState::CompleteWithoutImages);
        }
    };

    for image in &images {
        observer.on_style_image(generation, image);
    }
    finish(observer, PipelineState::CompleteWithImages)
}
