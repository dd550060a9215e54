//! 解析結果の表示モデル
//!
//! `Report` は1回の解析結果から作る表示ツリー。`ResultView` は唯一の
//! 結果表示領域で、世代番号を持ち、古い解析サイクルから遅れて届いた
//! スタイル画像を破棄する。

pub mod html;

use serde::{Deserialize, Serialize};

use crate::types::{AnalysisResult, NamedColor, StyleImageResult};

/// スタイル名からカードIDを作る（空白の連続は `-` 1文字に置換）
///
/// ```
/// use style_advisor_common::style_slug;
///
/// assert_eq!(style_slug("Smart Casual"), "style-Smart-Casual");
/// ```
pub fn style_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len() + 6);
    slug.push_str("style-");
    let mut in_space = false;
    for c in name.chars() {
        if c.is_whitespace() {
            if !in_space {
                slug.push('-');
            }
            in_space = true;
        } else {
            slug.push(c);
            in_space = false;
        }
    }
    slug
}

/// 全セクション共通の表示設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub title: String,
    pub hair_title: String,
    pub palette_title: String,
    pub styles_title: String,
    pub compliment_fallback: String,
    pub loading_text: String,
    pub generating_text: String,
    pub image_unavailable_text: String,
    pub show_hair_section: bool,
    /// 色コードが不正なときのスウォッチ色
    pub fallback_swatch: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            title: "Style Analysis".into(),
            hair_title: "Hair Recommendations".into(),
            palette_title: "Recommended Colors".into(),
            styles_title: "Recommended Styles".into(),
            compliment_fallback: "You have a unique style that we're excited to enhance!".into(),
            loading_text: "Analyzing your style...".into(),
            generating_text: "Generating style image...".into(),
            image_unavailable_text: "Style image unavailable".into(),
            show_hair_section: true,
            fallback_swatch: "#d6d3d1".into(),
        }
    }
}

/// 色見本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Swatch {
    pub label: String,
    pub color: String,
}

impl Swatch {
    fn from_color(color: &NamedColor, config: &RenderConfig) -> Self {
        Self {
            label: color.name.clone(),
            color: color
                .css_color()
                .map(str::to_string)
                .unwrap_or_else(|| config.fallback_swatch.clone()),
        }
    }
}

/// 属性カード（年齢層・性別・髪・肌色）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub label: &'static str,
    pub value: String,
    pub swatch: Option<Swatch>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HairSection {
    pub current_hair: String,
    pub face_shape: String,
    pub lengths: Vec<String>,
    pub styles: Vec<String>,
}

/// スタイルカードの画像状態
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CardImage {
    /// 画像生成を要求していない
    NotRequested,
    Generating,
    Ready(String),
    Unavailable(Option<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleCard {
    pub slug: String,
    pub name: String,
    pub description: String,
    pub image: CardImage,
}

/// 1回分の解析結果の表示ツリー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub compliment: String,
    pub attributes: Vec<Attribute>,
    pub hair: Option<HairSection>,
    pub palette: Vec<Swatch>,
    pub styles: Vec<StyleCard>,
}

impl Report {
    /// 表示ツリーを構築（`result.error` の判定は呼び出し側）
    pub fn build(result: &AnalysisResult, config: &RenderConfig, images_pending: bool) -> Self {
        let compliment = match result.compliment.trim() {
            "" => config.compliment_fallback.clone(),
            text => text.to_string(),
        };

        let attributes = vec![
            Attribute { label: "Age Range", value: result.age_range.clone(), swatch: None },
            Attribute { label: "Gender", value: result.gender.clone(), swatch: None },
            Attribute { label: "Hair", value: result.hair.clone(), swatch: None },
            Attribute {
                label: "Skin Tone",
                value: result.skin.name.clone(),
                swatch: Some(Swatch::from_color(&result.skin, config)),
            },
        ];

        let hair = config.show_hair_section.then(|| {
            let h = &result.hair_suggestions;
            HairSection {
                current_hair: h.current_hair.clone(),
                face_shape: h.face_shape_comment.clone(),
                lengths: h.recommended_hair_lengths.clone(),
                styles: h.recommended_hair_styles.clone(),
            }
        });

        let palette = result.colors.iter().map(|c| Swatch::from_color(c, config)).collect();

        let image = if images_pending { CardImage::Generating } else { CardImage::NotRequested };
        let styles = result
            .styles
            .iter()
            .map(|s| StyleCard {
                slug: style_slug(&s.name),
                name: s.name.clone(),
                description: s.description.clone(),
                image: image.clone(),
            })
            .collect();

        Self { compliment, attributes, hair, palette, styles }
    }

    pub fn card(&self, slug: &str) -> Option<&StyleCard> {
        self.styles.iter().find(|c| c.slug == slug)
    }

    /// 画像生成待ちのカード数
    pub fn pending_images(&self) -> usize {
        self.styles.iter().filter(|c| c.image == CardImage::Generating).count()
    }

    /// 生成待ちのまま残ったカードを画像なしにする（保存用の静的ページ向け）
    pub fn settle_pending_images(&mut self) -> usize {
        let mut settled = 0;
        for card in self.styles.iter_mut().filter(|c| c.image == CardImage::Generating) {
            card.image = CardImage::Unavailable(None);
            settled += 1;
        }
        settled
    }
}

/// 解析サイクルの世代番号
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// 結果表示領域の中身
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ResultBody {
    #[default]
    Empty,
    Loading,
    Error(String),
    Report(Report),
}

/// `patch_style_image` の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    Applied,
    /// 該当カードなし（名前不一致）
    UnknownStyle,
    /// 別の解析サイクルの画像
    Stale,
    NoReport,
}

/// 唯一の結果表示領域
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultView {
    generation: Generation,
    body: ResultBody,
    config: RenderConfig,
}

impl ResultView {
    pub fn new(config: RenderConfig) -> Self {
        Self { generation: Generation::default(), body: ResultBody::Empty, config }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn body(&self) -> &ResultBody {
        &self.body
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn report(&self) -> Option<&Report> {
        match &self.body {
            ResultBody::Report(report) => Some(report),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.body, ResultBody::Loading)
    }

    /// 新しい解析サイクルを開始（前の結果は破棄）
    pub fn begin(&mut self) -> Generation {
        self.generation = Generation(self.generation.0 + 1);
        self.body = ResultBody::Loading;
        self.generation
    }

    /// 表示を消去（進行中サイクルの結果も以後は破棄される）
    pub fn clear(&mut self) {
        self.generation = Generation(self.generation.0 + 1);
        self.body = ResultBody::Empty;
    }

    pub fn show_error(&mut self, generation: Generation, message: &str) -> bool {
        if generation != self.generation {
            return false;
        }
        self.body = ResultBody::Error(message.to_string());
        true
    }

    /// 初回描画。`result.error` があればエラーのみを表示する
    pub fn show_result(
        &mut self,
        generation: Generation,
        result: &AnalysisResult,
        images_pending: bool,
    ) -> bool {
        if let Some(message) = result.error_message() {
            return self.show_error(generation, message);
        }
        if generation != self.generation {
            return false;
        }
        self.body = ResultBody::Report(Report::build(result, &self.config, images_pending));
        true
    }

    pub fn settle_pending_images(&mut self) -> usize {
        match &mut self.body {
            ResultBody::Report(report) => report.settle_pending_images(),
            _ => 0,
        }
    }

    /// スタイル画像でカードを置き換える（同じスタイルへの再適用は上書き）
    pub fn patch_style_image(
        &mut self,
        generation: Generation,
        image: &StyleImageResult,
    ) -> PatchOutcome {
        if generation != self.generation {
            return PatchOutcome::Stale;
        }
        let ResultBody::Report(report) = &mut self.body else {
            return PatchOutcome::NoReport;
        };

        let slug = style_slug(&image.style_name);
        let Some(card) = report.styles.iter_mut().find(|c| c.slug == slug) else {
            return PatchOutcome::UnknownStyle;
        };

        card.image = if image.image_url.trim().is_empty() {
            CardImage::Unavailable(image.error.clone())
        } else {
            CardImage::Ready(image.image_url.clone())
        };
        PatchOutcome::Applied
    }
}
