use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream};

use super::{ChecklistError, BULLET, CHECKLIST_TITLE};
use crate::catalog::Requirement;

// A4 portrait, in points.
const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;

const LEFT_MARGIN: i64 = 28;
const TITLE_FONT_SIZE: i64 = 16;
// Helvetica-Bold advance width of the title at 16pt is ~189pt.
const TITLE_X: i64 = (PAGE_WIDTH - 189) / 2;
const TITLE_BASELINE: i64 = 780;

const BODY_FONT_SIZE: i64 = 12;
const FIRST_LINE_BASELINE: i64 = 739;
const LINE_HEIGHT: i64 = 28;

/// Render a single-page checklist: the title followed by one bulleted line
/// per requirement, in the order given. Lines that run past the bottom of
/// the page are not moved to another page.
pub fn render_checklist(requirements: &[Requirement]) -> Result<Vec<u8>, ChecklistError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(type1_font("Helvetica"));
    let bold_id = doc.add_object(type1_font("Helvetica-Bold"));
    let resources_id = doc.add_object(Dictionary::from_iter([(
        "Font",
        Object::Dictionary(Dictionary::from_iter([
            ("F1", Object::Reference(regular_id)),
            ("F2", Object::Reference(bold_id)),
        ])),
    )]));

    let mut operations = text_line("F2", TITLE_FONT_SIZE, TITLE_X, TITLE_BASELINE, CHECKLIST_TITLE);
    let mut baseline = FIRST_LINE_BASELINE;
    for requirement in requirements {
        let line = format!("{BULLET}{}", requirement.label);
        operations.extend(text_line("F1", BODY_FONT_SIZE, LEFT_MARGIN, baseline, &line));
        baseline -= LINE_HEIGHT;
    }

    let content = Content { operations }
        .encode()
        .map_err(|err| ChecklistError::Render(format!("content stream: {err}")))?;
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content));

    let page_id = doc.add_object(Dictionary::from_iter([
        ("Type", Object::Name(b"Page".to_vec())),
        ("Parent", Object::Reference(pages_id)),
        ("Contents", Object::Reference(content_id)),
        ("Resources", Object::Reference(resources_id)),
        (
            "MediaBox",
            Object::Array(vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()]),
        ),
    ]));

    let pages = Dictionary::from_iter([
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(vec![Object::Reference(page_id)])),
        ("Count", Object::Integer(1)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(Dictionary::from_iter([
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut output = Vec::new();
    doc.save_to(&mut output)
        .map_err(|err| ChecklistError::Render(format!("save: {err}")))?;
    Ok(output)
}

fn type1_font(base_font: &str) -> Dictionary {
    Dictionary::from_iter([
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(base_font.as_bytes().to_vec())),
    ])
}

fn text_line(font: &str, size: i64, x: i64, y: i64, text: &str) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![font.into(), size.into()]),
        Operation::new("Td", vec![x.into(), y.into()]),
        Operation::new("Tj", vec![Object::string_literal(text)]),
        Operation::new("ET", vec![]),
    ]
}
