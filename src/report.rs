//! 端末への進捗表示と結果サマリ

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use style_advisor_common::render::CardImage;
use style_advisor_common::{
    AnalysisObserver, AnalysisResult, Error, Generation, PatchOutcome, PipelineState, RenderConfig,
    Report, ResultView, StyleImageResult,
};
use tracing::{debug, info, warn};

/// 解析の進行を端末に表示しつつ `ResultView` を更新する
pub struct CliObserver {
    view: ResultView,
    spinner: Option<ProgressBar>,
    result: Option<AnalysisResult>,
    images: Vec<StyleImageResult>,
}

impl CliObserver {
    pub fn new(config: RenderConfig) -> Self {
        Self { view: ResultView::new(config), spinner: None, result: None, images: Vec::new() }
    }

    pub fn view(&self) -> &ResultView {
        &self.view
    }

    pub fn begin(&mut self) -> Generation {
        self.result = None;
        self.images.clear();
        self.view.begin()
    }

    /// 受信した解析結果とスタイル画像（`--json` 用）
    pub fn raw_json(&self) -> Option<serde_json::Value> {
        let result = self.result.as_ref()?;
        Some(serde_json::json!({
            "result": result,
            "images": self.images,
        }))
    }

    fn spin(&mut self, message: &'static str) {
        let spinner = self.spinner.get_or_insert_with(|| {
            let bar = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} ({elapsed})") {
                bar.set_style(style);
            }
            bar.enable_steady_tick(Duration::from_millis(120));
            bar
        });
        spinner.set_message(message);
    }

    fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

impl AnalysisObserver for CliObserver {
    fn on_state(&mut self, state: &PipelineState) {
        debug!(state = state.as_str(), "pipeline state");
        match state {
            PipelineState::RequestingPrimary => self.spin("写真を解析中..."),
            PipelineState::RequestingSecondary => self.spin("スタイル画像を生成中..."),
            PipelineState::Idle => {}
            _ => self.stop_spinner(),
        }
    }

    fn on_initial(&mut self, generation: Generation, result: &AnalysisResult, images_pending: bool) {
        info!(
            styles = result.styles.len(),
            colors = result.colors.len(),
            images_pending,
            "analysis received"
        );
        self.view.show_result(generation, result, images_pending);
        // エラーのみの結果は保存対象にしない
        if self.view.generation() == generation && self.view.report().is_some() {
            self.result = Some(result.clone());
        }
    }

    fn on_error(&mut self, generation: Generation, message: &str) {
        self.view.show_error(generation, message);
    }

    fn on_style_image(&mut self, generation: Generation, image: &StyleImageResult) {
        match self.view.patch_style_image(generation, image) {
            PatchOutcome::Applied => {
                debug!(style = %image.style_name, "style image applied");
                self.images.push(image.clone());
            }
            outcome => warn!(style = %image.style_name, ?outcome, "style image not applied"),
        }
    }

    fn on_failure(&mut self, generation: Generation, error: &Error) {
        warn!(generation = generation.value(), "{}", error);
    }
}

impl Drop for CliObserver {
    fn drop(&mut self) {
        self.stop_spinner();
    }
}

/// 結果サマリを端末に出力
pub fn print_summary(report: &Report) {
    println!("\n💬 {}\n", report.compliment);

    for attr in &report.attributes {
        match &attr.swatch {
            Some(swatch) => println!("  {:<10} {} ({})", attr.label, swatch.label, swatch.color),
            None => println!("  {:<10} {}", attr.label, attr.value),
        }
    }

    if let Some(hair) = &report.hair {
        println!("\n💇 髪型");
        println!("  現在: {}", hair.current_hair);
        println!("  顔型: {}", hair.face_shape);
        if !hair.lengths.is_empty() {
            println!("  おすすめの長さ: {}", hair.lengths.join(", "));
        }
        if !hair.styles.is_empty() {
            println!("  おすすめのスタイル: {}", hair.styles.join(", "));
        }
    }

    if !report.palette.is_empty() {
        println!("\n🎨 おすすめの色");
        for swatch in &report.palette {
            println!("  {} {}", swatch.color, swatch.label);
        }
    }

    if !report.styles.is_empty() {
        println!("\n👔 おすすめのスタイル");
        for (i, card) in report.styles.iter().enumerate() {
            println!("  {}. {} - {}", i + 1, card.name, card.description);
            match &card.image {
                CardImage::Ready(url) => println!("     画像: {}", url),
                CardImage::Unavailable(Some(reason)) => println!("     画像なし: {}", reason),
                CardImage::Unavailable(None) | CardImage::Generating => println!("     画像なし"),
                CardImage::NotRequested => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use style_advisor_common::StyleSuggestion;

    fn result() -> AnalysisResult {
        AnalysisResult {
            compliment: "Great smile.".into(),
            styles: vec![StyleSuggestion::new("Smart Casual", "Chinos and a blazer")],
            ..Default::default()
        }
    }

    #[test]
    fn test_observer_updates_view() {
        let mut observer = CliObserver::new(RenderConfig::default());
        let generation = observer.begin();
        observer.on_initial(generation, &result(), true);
        observer.on_style_image(generation, &StyleImageResult::new("Smart Casual", "https://img/1.png"));

        let report = observer.view().report().unwrap();
        assert_eq!(report.styles[0].image, CardImage::Ready("https://img/1.png".into()));

        let raw = observer.raw_json().unwrap();
        assert_eq!(raw["result"]["compliment"], "Great smile.");
        assert_eq!(raw["images"][0]["image_url"], "https://img/1.png");
    }

    #[test]
    fn test_error_result_has_no_raw_json() {
        let mut observer = CliObserver::new(RenderConfig::default());
        let generation = observer.begin();
        observer.on_initial(generation, &AnalysisResult::error("No person found"), false);
        assert!(observer.raw_json().is_none());
        assert!(observer.view().report().is_none());
    }

    #[test]
    fn test_error_after_success_drops_previous_raw_json() {
        let mut observer = CliObserver::new(RenderConfig::default());
        let first = observer.begin();
        observer.on_initial(first, &result(), false);
        assert!(observer.raw_json().is_some());

        let second = observer.begin();
        observer.on_initial(second, &AnalysisResult::error("No person found"), false);
        assert!(observer.raw_json().is_none());
    }

    #[test]
    fn test_terminal_state_stops_spinner() {
        let mut observer = CliObserver::new(RenderConfig::default());
        observer.on_state(&PipelineState::RequestingPrimary);
        assert!(observer.spinner.is_some());
        observer.on_state(&PipelineState::Complete);
        assert!(observer.spinner.is_none());
    }
}
