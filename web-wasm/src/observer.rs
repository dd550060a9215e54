//! パイプラインの進行をシグナルへ反映する

use leptos::prelude::*;
use style_advisor_common::{
    AnalysisObserver, AnalysisResult, Error, Generation, PatchOutcome, PipelineState, ResultView,
    StyleImageResult,
};

/// 結果表示シグナルに書き込むオブザーバ
///
/// リセットや次の解析で世代が進んだ後は、状態表示も更新しない。
pub struct SignalObserver {
    generation: Generation,
    view: RwSignal<ResultView>,
    state: WriteSignal<PipelineState>,
}

impl SignalObserver {
    pub fn new(
        generation: Generation,
        view: RwSignal<ResultView>,
        state: WriteSignal<PipelineState>,
    ) -> Self {
        Self { generation, view, state }
    }

    fn is_current(&self) -> bool {
        self.view.with_untracked(|v| v.generation()) == self.generation
    }
}

impl AnalysisObserver for SignalObserver {
    fn on_state(&mut self, state: &PipelineState) {
        if self.is_current() {
            self.state.set(state.clone());
        }
    }

    fn on_initial(&mut self, generation: Generation, result: &AnalysisResult, images_pending: bool) {
        self.view.update(|v| {
            v.show_result(generation, result, images_pending);
        });
    }

    fn on_error(&mut self, generation: Generation, message: &str) {
        self.view.update(|v| {
            v.show_error(generation, message);
        });
    }

    fn on_style_image(&mut self, generation: Generation, image: &StyleImageResult) {
        let outcome = self.view.try_update(|v| v.patch_style_image(generation, image));
        match outcome {
            Some(PatchOutcome::Applied) => {}
            Some(PatchOutcome::Stale) => gloo::console::log!(format!(
                "dropped style image '{}' from superseded analysis #{}",
                image.style_name,
                generation.value()
            )),
            other => gloo::console::warn!(format!(
                "style image '{}' not applied: {:?}",
                image.style_name, other
            )),
        }
    }

    fn on_failure(&mut self, generation: Generation, error: &Error) {
        gloo::console::error!(format!("analysis #{}: {}", generation.value(), error));
    }
}
