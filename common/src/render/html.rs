//! HTML出力
//!
//! セクションごとに1つのテンプレート関数。クラス名はブラウザ版と揃える。

use std::fmt::Write;

use super::{Attribute, CardImage, HairSection, RenderConfig, Report, ResultBody, ResultView, StyleCard, Swatch};

/// HTMLエスケープ（テキスト・属性値共通）
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// 結果表示領域の中身をHTML断片にする
pub fn render_view(view: &ResultView) -> String {
    let config = view.config();
    match view.body() {
        ResultBody::Empty => String::new(),
        ResultBody::Loading => loading_indicator(&config.loading_text),
        ResultBody::Error(message) => error_panel(message),
        ResultBody::Report(report) => render_report(report, config),
    }
}

/// 単体で開けるHTMLページ
pub fn render_page(view: &ResultView, generated_at: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n<style>{css}</style>\n</head>\n<body>\n<div id=\"results\">\n{body}\n</div>\n<footer class=\"generated-at\">{generated_at}</footer>\n</body>\n</html>\n",
        title = escape(&view.config().title),
        css = PAGE_CSS,
        body = render_view(view),
        generated_at = escape(generated_at),
    )
}

pub fn render_report(report: &Report, config: &RenderConfig) -> String {
    let mut html = String::new();
    html.push_str("<div class=\"analysis-details\">");
    let _ = write!(html, "<h3>{}</h3>", escape(&config.title));
    html.push_str(&compliment(&report.compliment));
    html.push_str(&attribute_grid(&report.attributes));
    if let Some(hair) = &report.hair {
        html.push_str(&hair_section(hair, config));
    }
    html.push_str("</div>");
    html.push_str(&color_palette(&report.palette, config));
    html.push_str(&style_grid(&report.styles, config));
    html
}

pub fn loading_indicator(text: &str) -> String {
    format!("<div class=\"loading-indicator\">{}</div>", escape(text))
}

pub fn error_panel(message: &str) -> String {
    format!(
        "<div class=\"analysis-details\"><div class=\"error-message\"><p class=\"error\">{}</p></div></div>",
        escape(message)
    )
}

fn compliment(text: &str) -> String {
    format!("<div class=\"compliment\"><p>{}</p></div>", escape(text))
}

fn attribute_grid(attributes: &[Attribute]) -> String {
    let mut html = String::from("<div class=\"analysis-grid\">");
    for attr in attributes {
        let value = match &attr.swatch {
            Some(swatch) => skin_swatch(swatch),
            None => escape(&attr.value),
        };
        let _ = write!(
            html,
            "<div class=\"analysis-item\"><div class=\"item-label\">{}</div><div class=\"item-value\">{}</div></div>",
            escape(attr.label),
            value
        );
    }
    html.push_str("</div>");
    html
}

fn skin_swatch(swatch: &Swatch) -> String {
    format!(
        "<div class=\"skin-swatch\"><div class=\"color-preview\" style=\"background-color: {}\"></div><span class=\"color-name\">{}</span></div>",
        escape(&swatch.color),
        escape(&swatch.label)
    )
}

fn bullet_list(items: &[String]) -> String {
    let mut html = String::from("<ul>");
    for item in items {
        let _ = write!(html, "<li>{}</li>", escape(item));
    }
    html.push_str("</ul>");
    html
}

fn hair_section(hair: &HairSection, config: &RenderConfig) -> String {
    format!(
        concat!(
            "<div class=\"hair-suggestions\"><h4>{title}</h4>",
            "<div class=\"hair-grid\">",
            "<div class=\"hair-item\"><div class=\"item-label\">Current Hair</div><div class=\"item-value\">{current}</div></div>",
            "<div class=\"hair-item\"><div class=\"item-label\">Face Shape</div><div class=\"item-value\">{face}</div></div>",
            "</div>",
            "<div class=\"recommendations\">",
            "<div class=\"rec-section\"><div class=\"section-label\">Recommended Lengths</div>{lengths}</div>",
            "<div class=\"rec-section\"><div class=\"section-label\">Recommended Styles</div>{styles}</div>",
            "</div></div>"
        ),
        title = escape(&config.hair_title),
        current = escape(&hair.current_hair),
        face = escape(&hair.face_shape),
        lengths = bullet_list(&hair.lengths),
        styles = bullet_list(&hair.styles),
    )
}

fn color_palette(palette: &[Swatch], config: &RenderConfig) -> String {
    let mut html = format!(
        "<div class=\"color-palette\"><h3>{}</h3><div class=\"color-swatches\">",
        escape(&config.palette_title)
    );
    for swatch in palette {
        let _ = write!(
            html,
            "<div class=\"color-swatch\"><div class=\"color-preview\" style=\"background-color: {}\"></div><span class=\"color-name\">{}</span></div>",
            escape(&swatch.color),
            escape(&swatch.label)
        );
    }
    html.push_str("</div></div>");
    html
}

fn style_grid(cards: &[StyleCard], config: &RenderConfig) -> String {
    let mut html = format!(
        "<div class=\"styles-section\"><h3>{}</h3><div id=\"styles-grid\" class=\"styles-grid\">",
        escape(&config.styles_title)
    );
    for card in cards {
        html.push_str(&style_card(card, config));
    }
    html.push_str("</div></div>");
    html
}

pub fn style_card(card: &StyleCard, config: &RenderConfig) -> String {
    let image = match &card.image {
        CardImage::NotRequested => String::new(),
        CardImage::Generating => loading_indicator(&config.generating_text),
        CardImage::Ready(url) => format!(
            "<a href=\"{url}\" target=\"_blank\" rel=\"noopener noreferrer\"><img src=\"{url}\" alt=\"{alt}\" class=\"style-image\"></a>",
            url = escape(url),
            alt = escape(&card.name)
        ),
        CardImage::Unavailable(_) => format!(
            "<div class=\"style-image-unavailable\">{}</div>",
            escape(&config.image_unavailable_text)
        ),
    };
    format!(
        "<div class=\"style-item\" id=\"{}\"><h4>{}</h4><p>{}</p>{}</div>",
        escape(&card.slug),
        escape(&card.name),
        escape(&card.description),
        image
    )
}

const PAGE_CSS: &str = "body{font-family:sans-serif;max-width:960px;margin:2rem auto;color:#44403c}\
.analysis-details,.color-palette,.styles-section{background:#fff;border-radius:12px;padding:24px;margin-top:20px;box-shadow:0 2px 4px rgba(124,45,18,.1)}\
.analysis-grid,.hair-grid{display:grid;grid-template-columns:repeat(auto-fit,minmax(200px,1fr));gap:16px}\
.analysis-item,.hair-item,.rec-section,.style-item,.compliment{background:#fafaf9;padding:16px;border-radius:8px;border:1px solid #e7e5e4}\
.compliment p{font-style:italic;text-align:center;margin:0}\
.skin-swatch{display:flex;align-items:center;gap:8px}\
.skin-swatch .color-preview{width:30px;height:30px;border-radius:50%}\
.color-swatches{display:flex;gap:20px;flex-wrap:wrap;justify-content:center}\
.color-swatch{text-align:center}\
.color-swatch .color-preview{width:50px;height:50px;border-radius:8px;margin:0 auto 8px}\
.styles-grid{display:grid;gap:20px}\
.style-image{width:100%;border-radius:8px;margin-top:16px}\
.loading-indicator,.style-image-unavailable{text-align:center;padding:20px}\
.error{background:#f5f5f4;padding:1rem;border-radius:8px;text-align:center}\
.generated-at{margin-top:2rem;font-size:.8rem;color:#a8a29e}";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::tests::sample_result;
    use crate::types::{AnalysisResult, StyleImageResult};

    fn rendered(images_pending: bool) -> (ResultView, String) {
        let mut view = ResultView::new(RenderConfig::default());
        let generation = view.begin();
        view.show_result(generation, &sample_result(), images_pending);
        let html = render_view(&view);
        (view, html)
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("<b>\"x\" & 'y'</b>"), "&lt;b&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/b&gt;");
    }

    #[test]
    fn test_error_only_render() {
        let mut view = ResultView::new(RenderConfig::default());
        let generation = view.begin();
        view.show_result(generation, &AnalysisResult::error("X"), true);
        let html = render_view(&view);
        assert!(html.contains("<p class=\"error\">X</p>"));
        assert!(!html.contains("color-palette"));
        assert!(!html.contains("styles-section"));
    }

    #[test]
    fn test_sections_in_order() {
        let (_, html) = rendered(true);
        let order = ["compliment", "analysis-grid", "hair-suggestions", "color-palette", "styles-section"];
        let positions: Vec<usize> = order.iter().map(|c| html.find(c).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_single_swatch_markup() {
        let (_, html) = rendered(true);
        assert_eq!(html.matches("class=\"color-swatch\"").count(), 1);
        assert!(html.contains("background-color: #000080\"></div><span class=\"color-name\">Navy</span>"));
    }

    #[test]
    fn test_style_card_placeholder_then_image() {
        let (mut view, html) = rendered(true);
        assert!(html.contains("id=\"style-Smart-Casual\""));
        assert!(html.contains("Generating style image..."));

        let generation = view.generation();
        view.patch_style_image(generation, &StyleImageResult::new("Smart Casual", "http://x/y.jpg"));
        let html = render_view(&view);
        assert!(html.contains("<img src=\"http://x/y.jpg\""));
        assert!(!html.contains("loading-indicator"));
    }

    #[test]
    fn test_no_placeholder_when_not_requested() {
        let (_, html) = rendered(false);
        assert!(!html.contains("loading-indicator"));
    }

    #[test]
    fn test_text_is_escaped() {
        let mut result = sample_result();
        result.compliment = "<script>alert(1)</script>".into();
        let mut view = ResultView::new(RenderConfig::default());
        let generation = view.begin();
        view.show_result(generation, &result, false);
        let html = render_view(&view);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_loading_and_empty() {
        let mut view = ResultView::new(RenderConfig::default());
        assert_eq!(render_view(&view), "");
        view.begin();
        assert_eq!(render_view(&view), "<div class=\"loading-indicator\">Analyzing your style...</div>");
    }

    #[test]
    fn test_render_page() {
        let (view, _) = rendered(false);
        let page = render_page(&view, "2026-01-01 12:00");
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>Style Analysis</title>"));
        assert!(page.contains("2026-01-01 12:00"));
    }

    #[test]
    fn test_saved_page_has_no_pending_placeholder() {
        let (mut view, _) = rendered(true);
        view.settle_pending_images();
        let page = render_page(&view, "2026-01-01 12:00");
        assert!(!page.contains("Generating style image..."));
        assert!(page.contains("Style image unavailable"));
    }
}
