//! 解析ボタン

use leptos::prelude::*;

use style_advisor_common::PipelineState;

#[component]
pub fn AnalyzeButton<FA>(
    is_ready: Memo<bool>,
    pipeline_state: ReadSignal<PipelineState>,
    on_analyze: FA,
) -> impl IntoView
where
    FA: Fn(()) + 'static + Clone,
{
    let is_requesting = move || pipeline_state.with(PipelineState::is_requesting);

    view! {
        <div class="export-buttons">
            <button
                class="btn btn-primary"
                data-state=move || pipeline_state.with(|s| s.as_str())
                disabled=move || !is_ready.get() || is_requesting()
                on:click={
                    let on_analyze = on_analyze.clone();
                    move |_| on_analyze(())
                }
            >
                {move || if is_requesting() { "Analyzing..." } else { "Analyze My Style" }}
            </button>
        </div>
    }
}
