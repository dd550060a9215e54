//! Style Advisor Common Library
//!
//! CLIとWeb(WASM)で共有される型・状態機械・レンダラ

pub mod types;
pub mod error;
pub mod config;
pub mod selection;
pub mod acquisition;
pub mod pipeline;
pub mod render;

pub use types::{
    AnalysisResult, HairSuggestions, ImageAsset, NamedColor, StyleImageResult, StyleSuggestion,
    AnalyzeRequest, AnalyzeResponse, GenerateImagesRequest, GenerateImagesResponse,
};
pub use error::{Error, Missing, Result};
pub use config::{CameraConfig, ClientConfig};
pub use selection::{Attire, Occasion, ReadinessPolicy, SelectionState};
pub use acquisition::{AcquisitionController, CaptureSource, FrameSource, ImageOrigin, Presentation};
pub use pipeline::{run_analysis, AnalysisInput, AnalysisObserver, AnalysisTransport, PipelineState};
pub use render::{
    style_slug, CardImage, Generation, PatchOutcome, RenderConfig, Report, ResultBody, ResultView,
};
