//! PDF encoding of laid-out pages.

use std::path::PathBuf;

use printpdf::lopdf::Document;
use printpdf::{BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, Rgb};

use super::ShoppingListError;
use super::layout::{LineStyle, Page};

const DOCUMENT_TITLE: &str = "Shopping list";
const LAYER_NAME: &str = "Layer 1";

// A4 with 2 cm margins.
const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
const USABLE_HEIGHT_MM: f32 = PAGE_HEIGHT_MM - 2.0 * MARGIN_MM;

const CONTINUATION_INDENT_MM: f32 = 8.0;

const MAX_LINE_STEP_MM: f32 = 8.0;
const POINTS_PER_MM: f32 = 2.835;

// Text encoding printpdf uses for the builtin faces.
const BUILTIN_ENCODING: &str = "WinAnsiEncoding";

/// Where the export font comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FontSource {
    /// Standard Helvetica, always available. Covers Western European text
    /// only (the WinAnsi character set).
    #[default]
    Builtin,
    /// A TrueType font file read at render time.
    File(PathBuf),
}

struct Style {
    size_pt: f32,
    rgb: (f32, f32, f32),
}

const fn style_for(style: LineStyle) -> Style {
    match style {
        LineStyle::Title => Style {
            size_pt: 16.0,
            rgb: (0.0, 0.0, 0.0),
        },
        LineStyle::Item | LineStyle::Continuation => Style {
            size_pt: 12.0,
            rgb: (0.1, 0.1, 0.1),
        },
        LineStyle::Notice => Style {
            size_pt: 14.0,
            rgb: (0.45, 0.45, 0.45),
        },
    }
}

/// Encode pages as an A4 PDF document.
///
/// The font is resolved before any page is drawn, so a missing font never
/// yields a partial document.
///
/// # Errors
///
/// Returns `ShoppingListError::ResourceUnavailable` if the font cannot be
/// read or parsed, or if the builtin font cannot draw some character of the
/// text. Returns `ShoppingListError::Render` if serialization fails.
pub fn encode(pages: &[Page], font: &FontSource) -> Result<Vec<u8>, ShoppingListError> {
    let font_bytes = match font {
        FontSource::Builtin => {
            ensure_builtin_coverage(pages)?;
            None
        }
        FontSource::File(path) => Some(std::fs::read(path).map_err(|e| {
            ShoppingListError::ResourceUnavailable(format!(
                "cannot read font {}: {e}",
                path.display()
            ))
        })?),
    };

    let (doc, first_page, first_layer) = PdfDocument::new(
        DOCUMENT_TITLE,
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        LAYER_NAME,
    );
    let font_ref = load_font(&doc, font_bytes.as_deref())?;

    let rows = pages.iter().map(|p| p.lines().len()).max().unwrap_or(1);
    let step = line_step(rows);

    let mut first = Some((first_page, first_layer));
    for page in pages {
        let (page_index, layer_index) = first.take().unwrap_or_else(|| {
            doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER_NAME)
        });
        let layer = doc.get_page(page_index).get_layer(layer_index);

        let mut y = PAGE_HEIGHT_MM - MARGIN_MM - step;
        for line in page.lines() {
            let style = style_for(line.style);
            let (r, g, b) = style.rgb;
            layer.set_fill_color(Color::Rgb(Rgb::new(r, g, b, None)));
            let x = match line.style {
                LineStyle::Continuation => MARGIN_MM + CONTINUATION_INDENT_MM,
                _ => MARGIN_MM,
            };
            layer.use_text(
                line.text.as_str(),
                style.size_pt.min(step * POINTS_PER_MM * 0.8),
                Mm(x),
                Mm(y),
                &font_ref,
            );
            y -= step;
        }
    }

    doc.save_to_bytes()
        .map_err(|e| ShoppingListError::Render(format!("{e:?}")))
}

fn load_font(
    doc: &PdfDocumentReference,
    bytes: Option<&[u8]>,
) -> Result<IndirectFontRef, ShoppingListError> {
    match bytes {
        Some(bytes) => doc
            .add_external_font(bytes)
            .map_err(|e| ShoppingListError::ResourceUnavailable(format!("invalid font: {e:?}"))),
        None => doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ShoppingListError::Render(format!("{e:?}"))),
    }
}

/// Fail if any character would be dropped when drawn with the builtin font.
fn ensure_builtin_coverage(pages: &[Page]) -> Result<(), ShoppingListError> {
    let mut buf = [0; 4];
    let missing = pages
        .iter()
        .flat_map(Page::lines)
        .flat_map(|line| line.text.chars())
        .find(|c| Document::encode_text(Some(BUILTIN_ENCODING), c.encode_utf8(&mut buf)).is_empty());

    match missing {
        Some(c) => Err(ShoppingListError::ResourceUnavailable(format!(
            "builtin font cannot draw {c:?}; configure a TrueType font that covers it"
        ))),
        None => Ok(()),
    }
}

/// Vertical distance between baselines so that `rows` lines fit the page.
fn line_step(rows: usize) -> f32 {
    let rows = u16::try_from(rows.max(1)).unwrap_or(u16::MAX);
    (USABLE_HEIGHT_MM / f32::from(rows)).min(MAX_LINE_STEP_MM)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use foodgram_core::CartLine;

    use printpdf::lopdf::Object;
    use printpdf::lopdf::content::Content;

    use super::*;
    use crate::services::shopping_list::layout::{LayoutText, PageCapacity, lay_out};

    /// Text drawn on each page, one entry per `Tj` operation.
    fn drawn_text(bytes: &[u8]) -> Vec<Vec<String>> {
        let mut doc = Document::load_mem(bytes).unwrap();
        doc.decompress();
        doc.get_pages()
            .into_values()
            .map(|page_id| {
                let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
                content
                    .operations
                    .iter()
                    .filter(|op| op.operator == "Tj")
                    .filter_map(|op| match op.operands.first() {
                        Some(Object::String(raw, _)) => {
                            Some(Document::decode_text(Some(BUILTIN_ENCODING), raw))
                        }
                        _ => None,
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_encode_builtin_font() {
        let pages = lay_out(
            &[CartLine::new("Flour", "g", 300), CartLine::new("Crème fraîche", "g", 200)],
            PageCapacity::default(),
            &LayoutText::default(),
        );
        let bytes = encode(&pages, &FontSource::Builtin).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert_eq!(
            drawn_text(&bytes),
            vec![vec![
                "Shopping list:".to_owned(),
                "1. Flour - 300 g.".to_owned(),
                "2. Crème fraîche - 200 g.".to_owned(),
            ]]
        );
    }

    #[test]
    fn test_builtin_font_rejects_text_it_cannot_draw() {
        let pages = lay_out(
            &[CartLine::new("Flour", "g", 300), CartLine::new("Мука", "г", 300)],
            PageCapacity::default(),
            &LayoutText::default(),
        );
        let err = encode(&pages, &FontSource::Builtin).unwrap_err();
        assert!(matches!(err, ShoppingListError::ResourceUnavailable(ref msg) if msg.contains('М')));
    }

    #[test]
    fn test_encode_multiple_pages() {
        let lines: Vec<CartLine> = (1..=30)
            .map(|i| CartLine::new(format!("Spice {i}"), "g", 5))
            .collect();
        let pages = lay_out(&lines, PageCapacity::new(8).unwrap(), &LayoutText::default());
        assert!(pages.len() > 1);
        let bytes = encode(&pages, &FontSource::Builtin).unwrap();

        let drawn = drawn_text(&bytes);
        assert_eq!(drawn.len(), pages.len());
        for (page, text) in pages.iter().zip(&drawn) {
            let expected: Vec<&str> = page.lines().iter().map(|l| l.text.as_str()).collect();
            assert_eq!(text, &expected);
        }
    }

    #[test]
    fn test_encode_wrapped_rows() {
        let name = "Smoked paprika from the hills near the old mill road ".repeat(4);
        let pages = lay_out(
            &[CartLine::new(name.trim_end(), "g", 15)],
            PageCapacity::default(),
            &LayoutText::default(),
        );
        let bytes = encode(&pages, &FontSource::Builtin).unwrap();

        let drawn = drawn_text(&bytes);
        assert_eq!(drawn.len(), 1);
        assert!(drawn[0].len() > 2);
        assert!(drawn[0][1].starts_with("1. Smoked paprika"));
        assert_eq!(drawn[0][1..].join(" "), format!("1. {} - 15 g.", name.trim_end()));
    }

    #[test]
    fn test_encode_missing_font() {
        let pages = lay_out(&[], PageCapacity::default(), &LayoutText::default());
        let err = encode(
            &pages,
            &FontSource::File(PathBuf::from("/nonexistent/fonts/missing.ttf")),
        )
        .unwrap_err();
        assert!(matches!(err, ShoppingListError::ResourceUnavailable(_)));
    }

    #[test]
    fn test_line_step_fits_page() {
        assert!((line_step(1) - MAX_LINE_STEP_MM).abs() < f32::EPSILON);
        assert!(line_step(100) * 100.0 <= USABLE_HEIGHT_MM + 0.01);
        assert!(line_step(0) > 0.0);

        // Item text stays at 9pt or more at the largest page capacity.
        let size = line_step(PageCapacity::MAX) * POINTS_PER_MM * 0.8;
        assert!(size >= 9.0);
    }
}
