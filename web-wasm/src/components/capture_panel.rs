//! カメラ/アップロードのプレビューパネル

use leptos::html::Video;
use leptos::prelude::*;
use web_sys::HtmlInputElement;

use style_advisor_common::Presentation;

use crate::app::CaptureSignals;

#[component]
pub fn CapturePanel<FC, FU, FR>(
    video_ref: NodeRef<Video>,
    capture: CaptureSignals,
    on_capture: FC,
    on_upload: FU,
    on_reset: FR,
) -> impl IntoView
where
    FC: Fn(()) + 'static + Clone,
    FU: Fn(web_sys::File) + 'static + Clone,
    FR: Fn(()) + 'static + Clone,
{
    let is_frozen = move || capture.presentation.get() == Presentation::Frozen;

    let on_file_change = move |ev: web_sys::Event| {
        let input: HtmlInputElement = event_target(&ev);
        if let Some(file) = input.files().and_then(|files| files.get(0)) {
            on_upload(file);
        }
        // 同じファイルを再選択しても change を発火させる
        input.set_value("");
    };

    view! {
        <div class="capture-panel">
            <div class="preview-area">
                <video
                    node_ref=video_ref
                    class="camera-feed"
                    autoplay=true
                    playsinline=true
                    prop:muted=true
                    style:display=move || if is_frozen() { "none" } else { "block" }
                />
                <Show when=is_frozen>
                    <img
                        class="captured-photo"
                        alt="Your photo"
                        src=move || capture.preview.get().unwrap_or_default()
                    />
                </Show>
            </div>

            <div class="capture-actions">
                <button
                    class="btn btn-primary"
                    on:click={
                        let on_capture = on_capture.clone();
                        move |_| on_capture(())
                    }
                >
                    {move || if is_frozen() { "Retake" } else { "Take Photo" }}
                </button>

                <label for="file-upload" class="btn btn-secondary">"Upload Photo"</label>
                <input
                    type="file"
                    id="file-upload"
                    accept="image/*"
                    style="display: none"
                    on:change=on_file_change
                />

                <button
                    class="btn btn-tertiary"
                    on:click={
                        let on_reset = on_reset.clone();
                        move |_| on_reset(())
                    }
                >
                    "Reset"
                </button>
            </div>

            <p class="file-name text-muted">
                {move || capture.file_name.get().unwrap_or_default()}
            </p>
        </div>
    }
}
