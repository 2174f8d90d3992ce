use log::debug;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};

use super::ExportSettings;
use crate::model::ResolvedCertificate;
use crate::preview::Branding;

const POINTS_PER_INCH: f32 = 72.0;

/// Внутренний отступ рамки сертификата.
const PADDING: f32 = 30.0;

const REGULAR: &str = "F1";
const BOLD: &str = "F2";

/// Отрисовывает сертификат в одностраничный PDF документ.
/// Раскладка повторяет HTML превью: шапка, заголовок, получатель с линией,
/// текст и подвал с подписью и данными сертификата.
pub fn render(
    certificate: &ResolvedCertificate,
    branding: &Branding,
    settings: &ExportSettings,
) -> lopdf::Result<Vec<u8>> {
    let (width, height) = settings.page_size();
    debug!("Рисуем PDF страницу {}x{}", width, height);

    let accent = parse_color(&branding.accent_color);
    let secondary = parse_color(&branding.secondary_color);

    // Рамка с учётом полей страницы.
    let left = settings.margin[1] * POINTS_PER_INCH + PADDING;
    let right = width - settings.margin[1] * POINTS_PER_INCH - PADDING;
    let top = height - settings.margin[0] * POINTS_PER_INCH - PADDING;
    let bottom = settings.margin[0] * POINTS_PER_INCH + PADDING;

    let mut page = Page::default();

    page.frame(left, bottom, right - left, top - bottom, accent);

    let inner_left = left + PADDING;
    let inner_width = right - left - 2.0 * PADDING;
    let mut y = top - PADDING - 14.0;

    page.text(BOLD, 19.4, inner_left, y, accent, &branding.organization);
    y -= 80.0;

    page.text(BOLD, 42.6, inner_left, y, BLACK, &branding.headline);
    y -= 30.0;
    page.text(REGULAR, 21.3, inner_left, y, secondary, &branding.subheadline);
    y -= 60.0;

    page.text(BOLD, 24.0, inner_left, y, BLACK, certificate.recipient_name.as_str());
    y -= 8.0;
    page.line(inner_left, y, inner_left + inner_width * 0.8, y, accent);
    y -= 24.0;

    for line in wrap(&certificate.template, max_chars(12.0, inner_width * 0.8)) {
        page.text(REGULAR, 12.0, inner_left, y, BLACK, &line);
        y -= 16.0;
    }

    // Подвал: подпись по центру, печать справа.
    let footer = bottom + PADDING;
    let center = left + (right - left) / 2.0 - 60.0;
    page.text(BOLD, 11.9, center, footer + 14.0, BLACK, &branding.signatory_name);
    page.text(REGULAR, 9.9, center, footer, BLACK, &branding.signatory_title);

    let seal = right - PADDING - 140.0;
    page.text(BOLD, 14.9, seal, footer + 30.0, accent, &branding.certified_label);
    page.text(BOLD, 11.9, seal, footer + 14.0, BLACK, certificate.certificate_id.as_str());
    page.text(BOLD, 11.9, seal, footer, BLACK, certificate.date.as_str());

    page.into_document(width, height)
}

type Color = [f32; 3];

const BLACK: Color = [0.0, 0.0, 0.0];

/// Разбирает цвет вида `#RRGGBB`. Некорректный цвет заменяется чёрным.
fn parse_color(hex: &str) -> Color {
    let digits = hex.trim_start_matches('#');
    if digits.len() != 6 {
        return BLACK;
    }

    let channel = |i: usize| {
        digits
            .get(i..i + 2)
            .and_then(|c| u8::from_str_radix(c, 16).ok())
            .map(|c| c as f32 / 255.0)
    };

    match (channel(0), channel(2), channel(4)) {
        (Some(r), Some(g), Some(b)) => [r, g, b],
        _ => BLACK,
    }
}

/// Примерное число символов Helvetica, помещающихся в строку.
fn max_chars(font_size: f32, width: f32) -> usize {
    ((width / (font_size * 0.5)) as usize).max(1)
}

/// Разбивает текст на строки по словам.
fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

/// Кодирует текст для стандартных шрифтов PDF.
/// Символы за пределами Latin-1 заменяются на `?`.
fn encode_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

#[derive(Default)]
struct Page {
    operations: Vec<Operation>,
}

impl Page {
    fn frame(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        self.stroke_color(color);
        self.operations.push(Operation::new("w", vec![3.5.into()]));
        self.operations.push(Operation::new(
            "re",
            vec![x.into(), y.into(), width.into(), height.into()],
        ));
        self.operations.push(Operation::new("S", vec![]));
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Color) {
        self.stroke_color(color);
        self.operations.push(Operation::new("w", vec![2.0.into()]));
        self.operations.push(Operation::new("m", vec![x1.into(), y1.into()]));
        self.operations.push(Operation::new("l", vec![x2.into(), y2.into()]));
        self.operations.push(Operation::new("S", vec![]));
    }

    fn text(&mut self, font: &str, size: f32, x: f32, y: f32, color: Color, text: &str) {
        self.operations.push(Operation::new(
            "rg",
            vec![color[0].into(), color[1].into(), color[2].into()],
        ));
        self.operations.push(Operation::new("BT", vec![]));
        self.operations.push(Operation::new(
            "Tf",
            vec![Object::Name(font.as_bytes().to_vec()), size.into()],
        ));
        self.operations.push(Operation::new("Td", vec![x.into(), y.into()]));
        self.operations.push(Operation::new(
            "Tj",
            vec![Object::String(encode_text(text), StringFormat::Literal)],
        ));
        self.operations.push(Operation::new("ET", vec![]));
    }

    fn stroke_color(&mut self, color: Color) {
        self.operations.push(Operation::new(
            "RG",
            vec![color[0].into(), color[1].into(), color[2].into()],
        ));
    }

    fn into_document(self, width: f32, height: f32) -> lopdf::Result<Vec<u8>> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let bold_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                REGULAR => regular_id,
                BOLD => bold_id,
            },
        });

        let content = Content {
            operations: self.operations,
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.0.into(), 0.0.into(), width.into(), height.into()],
            "Contents" => content_id,
            "Resources" => resources_id,
        });

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf)?;

        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{Orientation, PageFormat};
    use crate::form::{self, Form};
    use crate::template::Strategy;

    fn certificate() -> ResolvedCertificate {
        let form = Form {
            recipient_name: "Jane Doe".to_owned(),
            certificate_id: "C-001".to_owned(),
            date: "2024-01-01".to_owned(),
            template: "{{recipientName}} completed the course on {{date}}.".to_owned(),
        };
        form::submit(&form, Strategy::Sequential).unwrap()
    }

    fn media_box(bytes: &[u8]) -> Vec<f32> {
        let doc = Document::load_mem(bytes).unwrap();
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 1);

        let page_id = *pages.values().next().unwrap();
        doc.get_dictionary(page_id)
            .unwrap()
            .get(b"MediaBox")
            .unwrap()
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o.as_float().unwrap())
            .collect()
    }

    #[test]
    fn letter_portrait_by_default() {
        let bytes = render(&certificate(), &Branding::default(), &ExportSettings::default()).unwrap();

        assert!(bytes.starts_with(b"%PDF-1.5"));
        assert_eq!(media_box(&bytes), vec![0.0, 0.0, 612.0, 792.0]);
    }

    #[test]
    fn a4_landscape() {
        let settings = ExportSettings {
            format: PageFormat::A4,
            orientation: Orientation::Landscape,
            ..ExportSettings::default()
        };

        let bytes = render(&certificate(), &Branding::default(), &settings).unwrap();

        assert_eq!(media_box(&bytes), vec![0.0, 0.0, 842.0, 595.0]);
    }

    #[test]
    fn page_contains_certificate_text() {
        let bytes = render(&certificate(), &Branding::default(), &ExportSettings::default()).unwrap();

        let doc = Document::load_mem(&bytes).unwrap();
        let page_id = *doc.get_pages().values().next().unwrap();
        let content = String::from_utf8_lossy(&doc.get_page_content(page_id).unwrap()).into_owned();

        assert!(content.contains("(Jane Doe)"), "{content}");
        assert!(content.contains("(C-001)"));
        assert!(content.contains("(2024-01-01)"));
        assert!(content.contains("(CERTIFIED)"));
    }

    #[test]
    fn wrap_by_words() {
        assert_eq!(
            wrap("one two three four", 9),
            vec!["one two", "three", "four"]
        );
        assert_eq!(wrap("  ", 10), Vec::<String>::new());
        assert_eq!(wrap("verylongword", 4), vec!["verylongword"]);
    }

    #[test]
    fn colors() {
        assert_eq!(parse_color("#FF0000"), [1.0, 0.0, 0.0]);
        assert_eq!(parse_color("red"), BLACK);
        assert_eq!(parse_color("#GG0000"), BLACK);
    }

    #[test]
    fn non_latin_text_is_replaced() {
        assert_eq!(encode_text("Ann é"), b"Ann \xe9".to_vec());
        assert_eq!(encode_text("Анна"), b"????".to_vec());
    }
}
