//! 解析結果の表示パネル
//!
//! セクション構成とクラス名は `style_advisor_common::render::html` と同じ。
//! スタイルカードは位置・スラッグ・画像状態をキーにしているので、画像が届いた
//! カードだけが差し替わる。

use leptos::prelude::*;

use style_advisor_common::render::{Attribute, CardImage, HairSection, StyleCard, Swatch};
use style_advisor_common::{Generation, RenderConfig, ResultBody, ResultView};

/// 本文の種類（レポートの中身の変化では再描画しない）
#[derive(Debug, Clone, PartialEq)]
enum BodyKind {
    Empty,
    Loading,
    Error(String),
    Report(Generation),
}

#[component]
pub fn ResultPanel(results: ReadSignal<ResultView>) -> impl IntoView {
    let config = StoredValue::new(results.with_untracked(|v| v.config().clone()));

    let body = Memo::new(move |_| {
        results.with(|v| match v.body() {
            ResultBody::Empty => BodyKind::Empty,
            ResultBody::Loading => BodyKind::Loading,
            ResultBody::Error(message) => BodyKind::Error(message.clone()),
            ResultBody::Report(_) => BodyKind::Report(v.generation()),
        })
    });

    let cards = Memo::new(move |_| {
        results.with(|v| v.report().map(|r| r.styles.clone()).unwrap_or_default())
    });

    view! {
        <div id="results" class="results">
            {move || match body.get() {
                BodyKind::Empty => ().into_any(),
                BodyKind::Loading => {
                    view! { <LoadingIndicator text=config.with_value(|c| c.loading_text.clone()) /> }
                        .into_any()
                }
                BodyKind::Error(message) => view! { <ErrorPanel message=message /> }.into_any(),
                BodyKind::Report(_) => {
                    let Some(report) = results.with_untracked(|v| v.report().cloned()) else {
                        return ().into_any();
                    };
                    let config = config.get_value();
                    view! {
                        <div class="analysis-details">
                            <h3>{config.title.clone()}</h3>
                            <Compliment text=report.compliment />
                            <AttributeGrid attributes=report.attributes />
                            {report.hair.map(|hair| view! { <HairPanel hair=hair title=config.hair_title.clone() /> })}
                        </div>
                        <ColorPalette palette=report.palette title=config.palette_title.clone() />
                        <StyleGrid cards=cards config=config />
                    }
                        .into_any()
                }
            }}
        </div>
    }
}

#[component]
fn LoadingIndicator(text: String) -> impl IntoView {
    view! { <div class="loading-indicator">{text}</div> }
}

#[component]
fn ErrorPanel(message: String) -> impl IntoView {
    view! {
        <div class="analysis-details">
            <div class="error-message">
                <p class="error">{message}</p>
            </div>
        </div>
    }
}

#[component]
fn Compliment(text: String) -> impl IntoView {
    view! {
        <div class="compliment">
            <p>{text}</p>
        </div>
    }
}

#[component]
fn AttributeGrid(attributes: Vec<Attribute>) -> impl IntoView {
    let items = attributes
        .into_iter()
        .map(|attr| {
            let value = match attr.swatch {
                Some(swatch) => view! { <SkinSwatch swatch=swatch /> }.into_any(),
                None => attr.value.into_any(),
            };
            view! {
                <div class="analysis-item">
                    <div class="item-label">{attr.label}</div>
                    <div class="item-value">{value}</div>
                </div>
            }
        })
        .collect_view();

    view! { <div class="analysis-grid">{items}</div> }
}

#[component]
fn SkinSwatch(swatch: Swatch) -> impl IntoView {
    view! {
        <div class="skin-swatch">
            <div class="color-preview" style:background-color=swatch.color></div>
            <span class="color-name">{swatch.label}</span>
        </div>
    }
}

fn bullet_list(items: Vec<String>) -> impl IntoView {
    view! {
        <ul>
            {items.into_iter().map(|item| view! { <li>{item}</li> }).collect_view()}
        </ul>
    }
}

#[component]
fn HairPanel(hair: HairSection, title: String) -> impl IntoView {
    view! {
        <div class="hair-suggestions">
            <h4>{title}</h4>
            <div class="hair-grid">
                <div class="hair-item">
                    <div class="item-label">"Current Hair"</div>
                    <div class="item-value">{hair.current_hair}</div>
                </div>
                <div class="hair-item">
                    <div class="item-label">"Face Shape"</div>
                    <div class="item-value">{hair.face_shape}</div>
                </div>
            </div>
            <div class="recommendations">
                <div class="rec-section">
                    <div class="section-label">"Recommended Lengths"</div>
                    {bullet_list(hair.lengths)}
                </div>
                <div class="rec-section">
                    <div class="section-label">"Recommended Styles"</div>
                    {bullet_list(hair.styles)}
                </div>
            </div>
        </div>
    }
}

#[component]
fn ColorPalette(palette: Vec<Swatch>, title: String) -> impl IntoView {
    let swatches = palette
        .into_iter()
        .map(|swatch| {
            view! {
                <div class="color-swatch">
                    <div class="color-preview" style:background-color=swatch.color></div>
                    <span class="color-name">{swatch.label}</span>
                </div>
            }
        })
        .collect_view();

    view! {
        <div class="color-palette">
            <h3>{title}</h3>
            <div class="color-swatches">{swatches}</div>
        </div>
    }
}

#[component]
fn StyleGrid(cards: Memo<Vec<StyleCard>>, config: RenderConfig) -> impl IntoView {
    let config = StoredValue::new(config);

    view! {
        <div class="styles-section">
            <h3>{config.with_value(|c| c.styles_title.clone())}</h3>
            <div id="styles-grid" class="styles-grid">
                <For
                    each=move || cards.get().into_iter().enumerate()
                    key=|(index, card)| card_key(*index, card)
                    children=move |(_, card)| view! { <StyleCardView card=card config=config.get_value() /> }
                />
            </div>
        </div>
    }
}

/// `<For>` のキー（同名スタイルが並んでも行が潰れないよう位置を含める）
fn card_key(index: usize, card: &StyleCard) -> (usize, String, CardImage) {
    (index, card.slug.clone(), card.image.clone())
}

#[component]
fn StyleCardView(card: StyleCard, config: RenderConfig) -> impl IntoView {
    let image = match card.image {
        CardImage::NotRequested => ().into_any(),
        CardImage::Generating => view! { <LoadingIndicator text=config.generating_text /> }.into_any(),
        CardImage::Ready(url) => view! {
            <a href=url.clone() target="_blank" rel="noopener noreferrer">
                <img src=url alt=card.name.clone() class="style-image" />
            </a>
        }
        .into_any(),
        CardImage::Unavailable(_) => view! {
            <div class="style-image-unavailable">{config.image_unavailable_text}</div>
        }
        .into_any(),
    };

    view! {
        <div class="style-item" id=card.slug>
            <h4>{card.name}</h4>
            <p>{card.description}</p>
            {image}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use style_advisor_common::{AnalysisResult, Report, StyleSuggestion};

    #[test]
    fn test_duplicate_style_names_get_distinct_keys() {
        let result = AnalysisResult {
            styles: vec![
                StyleSuggestion::new("Smart Casual", "Blazer with denim"),
                StyleSuggestion::new("Smart Casual", "Knit polo with chinos"),
            ],
            ..Default::default()
        };
        let report = Report::build(&result, &RenderConfig::default(), true);
        let keys: Vec<_> = report.styles.iter().enumerate().map(|(i, c)| card_key(i, c)).collect();
        assert_eq!(keys.len(), 2);
        assert_ne!(keys[0], keys[1]);
    }

    #[test]
    fn test_key_changes_when_image_arrives() {
        let mut card = StyleCard {
            slug: "style-Boho".into(),
            name: "Boho".into(),
            description: String::new(),
            image: CardImage::Generating,
        };
        let before = card_key(0, &card);
        card.image = CardImage::Ready("boho.jpg".into());
        assert_ne!(before, card_key(0, &card));
    }
}
