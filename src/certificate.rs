//! Course completion certificate rendering.

use chrono::NaiveDate;
use lopdf::{
    Document, Object, Stream,
    content::{Content, Operation},
    dictionary,
};
use uuid::Uuid;

use crate::error::AppResult;

// A4 landscape, in points.
const PAGE_WIDTH: i64 = 842;
const PAGE_HEIGHT: i64 = 595;

#[derive(Debug, Clone)]
pub struct CertificateDetails {
    pub certificate_id: Uuid,
    pub student_name: String,
    pub course_title: String,
    pub instructor_name: String,
    pub issued_on: NaiveDate,
}

pub fn render_certificate(details: &CertificateDetails) -> AppResult<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular,
            "F2" => bold,
        },
    });

    let content = Content {
        operations: layout(details),
    };
    let encoded = content
        .encode()
        .map_err(|e| anyhow::anyhow!("failed to encode certificate content: {e}"))?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| anyhow::anyhow!("failed to write certificate pdf: {e}"))?;
    Ok(buffer)
}

fn layout(details: &CertificateDetails) -> Vec<Operation> {
    let mut ops = Vec::new();

    // Double border.
    ops.push(Operation::new("RG", vec![Object::Real(0.16), Object::Real(0.29), Object::Real(0.48)]));
    ops.push(Operation::new("w", vec![6.into()]));
    ops.push(rect(20, 20, PAGE_WIDTH - 40, PAGE_HEIGHT - 40));
    ops.push(Operation::new("S", vec![]));
    ops.push(Operation::new("w", vec![1.into()]));
    ops.push(rect(34, 34, PAGE_WIDTH - 68, PAGE_HEIGHT - 68));
    ops.push(Operation::new("S", vec![]));

    ops.extend(centered("F2", 40, 450, "Certificate of Completion"));
    ops.extend(centered("F1", 16, 400, "This certifies that"));
    ops.extend(centered("F2", 32, 350, &details.student_name));
    ops.extend(centered("F1", 16, 300, "has successfully completed the course"));
    ops.extend(centered("F2", 24, 255, &details.course_title));
    ops.extend(centered(
        "F1",
        14,
        200,
        &format!("Instructor: {}", details.instructor_name),
    ));
    ops.extend(centered(
        "F1",
        12,
        120,
        &format!("Issued on {}", details.issued_on.format("%B %-d, %Y")),
    ));
    ops.extend(centered(
        "F1",
        9,
        80,
        &format!("Certificate ID {}", details.certificate_id),
    ));

    ops
}

fn rect(x: i64, y: i64, width: i64, height: i64) -> Operation {
    Operation::new("re", vec![x.into(), y.into(), width.into(), height.into()])
}

/// Text operations for one line centred horizontally. Width is estimated
/// from an average Helvetica glyph width of half the font size.
fn centered(font: &str, size: i64, y: i64, text: &str) -> Vec<Operation> {
    let encoded = win_ansi(text);
    let estimated_width = encoded.len() as i64 * size / 2;
    let x = ((PAGE_WIDTH - estimated_width) / 2).max(40);

    vec![
        Operation::new("BT", vec![]),
        Operation::new("rg", vec![Object::Real(0.1), Object::Real(0.1), Object::Real(0.1)]),
        Operation::new("Tf", vec![font.into(), size.into()]),
        Operation::new("Td", vec![x.into(), y.into()]),
        Operation::new("Tj", vec![Object::string_literal(encoded)]),
        Operation::new("ET", vec![]),
    ]
}

/// Latin-1 bytes for the standard fonts; anything outside becomes `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| u8::try_from(u32::from(ch)).unwrap_or(b'?'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> CertificateDetails {
        CertificateDetails {
            certificate_id: Uuid::new_v4(),
            student_name: "Ada Lovelace".into(),
            course_title: "Analytical Engines 101".into(),
            instructor_name: "Charles Babbage".into(),
            issued_on: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        }
    }

    #[test]
    fn renders_a_pdf_document() {
        let bytes = render_certificate(&details()).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn non_latin_characters_are_replaced() {
        assert_eq!(win_ansi("José 東"), vec![b'J', b'o', b's', 0xE9, b' ', b'?']);
    }
}
