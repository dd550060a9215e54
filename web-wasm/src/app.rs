//! メインアプリケーションコンポーネント

use std::rc::Rc;

use futures::lock::Mutex;
use gloo::console::{error, log, warn};
use gloo::dialogs::alert;
use leptos::html::Video;
use leptos::prelude::*;
use leptos::task::spawn_local;

use style_advisor_common::{
    run_analysis, AcquisitionController, AnalysisInput, Attire, ClientConfig, Error, Occasion,
    PipelineState, Presentation, ResultView, SelectionState,
};

use crate::api::backend::FetchTransport;
use crate::camera::BrowserCamera;
use crate::components::{
    analyze_button::AnalyzeButton, capture_panel::CapturePanel, header::Header,
    result_panel::ResultPanel, selection_panel::SelectionPanel,
};
use crate::observer::SignalObserver;

type Controller = StoredValue<Rc<Mutex<AcquisitionController<BrowserCamera>>>, LocalStorage>;

/// プレビュー表示用のシグナル
#[derive(Clone, Copy)]
pub struct CaptureSignals {
    pub presentation: RwSignal<Presentation>,
    /// 静止表示中の画像（Data URL）
    pub preview: RwSignal<Option<String>>,
    pub file_name: RwSignal<Option<String>>,
}

impl CaptureSignals {
    fn new() -> Self {
        Self {
            presentation: RwSignal::new(Presentation::Live),
            preview: RwSignal::new(None),
            file_name: RwSignal::new(None),
        }
    }

    fn sync(&self, controller: &AcquisitionController<BrowserCamera>) {
        self.presentation.set(controller.presentation());
        self.preview
            .set(controller.current_image().map(|image| image.as_str().to_string()));
        self.file_name.set(controller.file_name().map(str::to_string));
    }
}

/// カメラ系のエラーを通知する
fn report_camera_error(e: &Error) {
    error!(e.to_string());
    if let Error::CameraAccessDenied(_) = e {
        alert("Error accessing camera. Please make sure you've granted camera permissions.");
    }
}

fn start_camera(controller: Controller, signals: CaptureSignals) {
    spawn_local(async move {
        let controller = controller.get_value();
        let mut controller = controller.lock().await;
        match controller.use_camera_capture().await {
            Ok(()) => log!("camera started"),
            Err(e) => report_camera_error(&e),
        }
        signals.sync(&controller);
    });
}

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    let config = ClientConfig::default();
    let policy = config.readiness_policy();

    let video_ref = NodeRef::<Video>::new();
    let controller: Controller = StoredValue::new_local(Rc::new(Mutex::new(
        AcquisitionController::new(BrowserCamera::new(video_ref), config.camera.clone()),
    )));
    let transport = StoredValue::new(FetchTransport::new(&config));

    let capture = CaptureSignals::new();
    let (occasion, set_occasion) = signal(None::<Occasion>);
    let (attire, set_attire) = signal(None::<Attire>);
    let pipeline_state = RwSignal::new(PipelineState::Idle);
    let result_view = RwSignal::new(ResultView::new(config.render.clone()));

    let is_ready = Memo::new(move |_| {
        let selection = SelectionState { occasion: occasion.get(), attire: attire.get() };
        capture.preview.with(|p| selection.is_ready(p.is_some(), &policy))
    });

    // <video> がマウントされたらカメラを起動
    Effect::new(move |_| {
        if video_ref.get().is_some() {
            start_camera(controller, capture);
        }
    });

    let on_capture = move |_: ()| {
        spawn_local(async move {
            let controller = controller.get_value();
            let mut controller = controller.lock().await;
            match controller.toggle_capture().await {
                Ok(presentation) => log!(format!("capture: {}", presentation.as_str())),
                Err(e) => report_camera_error(&e),
            }
            capture.sync(&controller);
        });
    };

    let on_upload = move |file: web_sys::File| {
        let file = gloo::file::File::from(file);
        spawn_local(async move {
            let bytes = match gloo::file::futures::read_as_bytes(&file).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    error!(format!("failed to read {}: {}", file.name(), e));
                    return;
                }
            };
            let controller = controller.get_value();
            let mut controller = controller.lock().await;
            match controller.use_uploaded_file(&bytes, file.name()) {
                Ok(()) => log!(format!("uploaded {} ({} bytes)", file.name(), bytes.len())),
                Err(e) => {
                    warn!(e.to_string());
                    alert(&e.to_string());
                }
            }
            capture.sync(&controller);
        });
    };

    let on_reset = move |_: ()| {
        result_view.update(|v| v.clear());
        pipeline_state.set(PipelineState::Idle);
        spawn_local(async move {
            {
                let controller = controller.get_value();
                let mut controller = controller.lock().await;
                controller.reset();
                capture.sync(&controller);
            }
            start_camera(controller, capture);
        });
    };

    let on_analyze = move |_: ()| {
        // 解析中は受け付けない
        if pipeline_state.get_untracked().is_requesting() {
            return;
        }
        pipeline_state.set(PipelineState::RequestingPrimary);

        spawn_local(async move {
            let image = controller.get_value().lock().await.current_image().cloned();
            let selection = SelectionState {
                occasion: occasion.get_untracked(),
                attire: attire.get_untracked(),
            };
            let input = match AnalysisInput::from_selection(image.as_ref(), &selection, &policy) {
                Ok(input) => input,
                Err(e) => {
                    warn!(e.to_string());
                    alert(&e.to_string());
                    pipeline_state.set(PipelineState::Idle);
                    return;
                }
            };

            let Some(generation) = result_view.try_update(|v| v.begin()) else {
                return;
            };
            log!(format!(
                "analysis #{} started (occasion={}, attire={})",
                generation.value(),
                input.occasion,
                input.attire.map(|a| a.as_str()).unwrap_or("-")
            ));

            let transport = transport.get_value();
            let mut observer = SignalObserver::new(generation, result_view, pipeline_state.write_only());
            let state = run_analysis(&transport, generation, &input, &mut observer).await;
            log!(format!("analysis #{} finished: {}", generation.value(), state.as_str()));
        });
    };

    view! {
        <div class="container">
            <Header />

            <CapturePanel
                video_ref=video_ref
                capture=capture
                on_capture=on_capture
                on_upload=on_upload
                on_reset=on_reset
            />

            <SelectionPanel
                occasion=occasion
                set_occasion=set_occasion
                attire=attire
                set_attire=set_attire
                attire_required=policy.attire_required
            />

            <AnalyzeButton
                is_ready=is_ready
                pipeline_state=pipeline_state.read_only()
                on_analyze=on_analyze
            />

            <ResultPanel results=result_view.read_only() />
        </div>
    }
}
