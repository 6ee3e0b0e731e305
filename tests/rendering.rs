use report_composer::builder::PdfBuilder;
use report_composer::document::{ReportDocument, RevisionEntry};
use report_composer::fonts;
use report_composer::model::{Block, Column, RichParagraph, Section};
use report_composer::report_pdf::{render_report, PdfOptions};
use report_composer::richtext::Span;
use sha2::{Digest, Sha256};

fn sample_document(revisions: usize) -> ReportDocument {
    ReportDocument {
        title: "Annual Report".into(),
        kind: "Relatório".into(),
        year: Some(2024),
        status: "Final".into(),
        submitted_at: "2024-05-01T10:30".into(),
        revisions: (1..=revisions)
            .map(|index| RevisionEntry {
                timestamp: "2024-05-02T09:00".into(),
                reviewer: format!("Revisor {}", index),
                comment: "Comentário longo o suficiente para quebrar em mais de uma linha \
                          quando desenhado dentro da largura fixa do conteúdo da página."
                    .into(),
            })
            .collect(),
        ..ReportDocument::default()
    }
}

fn render_sample_pdf() -> Option<Vec<u8>> {
    if !fonts::default_fonts_available() {
        eprintln!("Skipping rendering assertions: no usable fonts installed");
        return None;
    }

    let bytes = PdfBuilder::new()
        .add_sections([Section::new("Sample")
            .with_block(Block::paragraph(vec![Span::new("Hello, PDF!").bold()]))])
        .render()
        .expect("render sample pdf")
        .bytes;

    Some(bytes)
}

fn scrub_pdf(bytes: &[u8]) -> Vec<u8> {
    fn scrub_segment(data: &mut [u8], tag: &[u8], terminator: u8) {
        let mut index = 0;
        while index + tag.len() < data.len() {
            if data[index..].starts_with(tag) {
                let mut cursor = index + tag.len();
                while cursor < data.len() {
                    let byte = data[cursor];
                    if byte == terminator {
                        break;
                    }
                    if terminator == b')' {
                        data[cursor] = b'0';
                    } else if !matches!(byte, b'<' | b'>' | b' ' | b'\n' | b'\r' | b'\t') {
                        data[cursor] = b'0';
                    }
                    cursor += 1;
                }
                index = cursor;
            } else {
                index += 1;
            }
        }
    }

    fn scrub_xml(data: &mut [u8], start: &[u8], end: &[u8]) {
        let mut offset = 0;
        while offset + start.len() < data.len() {
            let Some(start_pos) = data[offset..]
                .windows(start.len())
                .position(|window| window == start)
            else {
                break;
            };
            let start_index = offset + start_pos + start.len();
            let Some(end_pos) = data[start_index..]
                .windows(end.len())
                .position(|window| window == end)
            else {
                break;
            };
            for byte in &mut data[start_index..start_index + end_pos] {
                if !matches!(*byte, b'<' | b'>' | b'/' | b' ' | b'\n' | b'\r' | b'\t') {
                    *byte = b'0';
                }
            }
            offset = start_index + end_pos + end.len();
        }
    }

    let mut normalized = bytes.to_vec();
    scrub_segment(&mut normalized, b"/CreationDate(", b')');
    scrub_segment(&mut normalized, b"/ModDate(", b')');
    scrub_segment(&mut normalized, b"/ID[", b']');
    scrub_segment(&mut normalized, b"/Producer(", b')');
    for tag in [
        "xmp:CreateDate",
        "xmp:ModifyDate",
        "xmp:MetadataDate",
        "xmpMM:DocumentID",
        "xmpMM:InstanceID",
        "xmpMM:VersionID",
    ] {
        let start = format!("<{}>", tag);
        let end = format!("</{}>", tag);
        scrub_xml(&mut normalized, start.as_bytes(), end.as_bytes());
    }
    normalized
}

fn normalized_hash(bytes: &[u8]) -> [u8; 32] {
    let normalized = scrub_pdf(bytes);
    let digest = Sha256::digest(&normalized);
    digest.into()
}

#[test]
fn renders_non_empty_output() {
    let Some(bytes) = render_sample_pdf() else {
        return;
    };
    assert!(bytes.starts_with(b"%PDF"), "rendered bytes should carry a PDF header");
}

#[test]
fn rendering_is_deterministic() {
    let Some(bytes_a) = render_sample_pdf() else {
        return;
    };
    let Some(bytes_b) = render_sample_pdf() else {
        return;
    };

    assert_eq!(bytes_a.len(), bytes_b.len(), "PDF sizes should match");
    assert_eq!(
        normalized_hash(&bytes_a),
        normalized_hash(&bytes_b),
        "PDF renders must be deterministic after metadata normalization"
    );
}

#[test]
fn indented_items_and_columns_render() {
    if !fonts::default_fonts_available() {
        return;
    }

    let section = Section::new("Responsável").with_blocks([
        Block::Paragraph(
            RichParagraph::new(vec![Span::new("- Nome: Ana").sized(12)]).with_indent_mm(5.0),
        ),
        Block::Columns(vec![
            Column::new(10, RichParagraph::new(vec![Span::new("Tipo: Relatório")])),
            Column::new(
                7,
                RichParagraph::new(vec![Span::new("Ano: 2024")]).with_indent_mm(2.0),
            ),
        ]),
        Block::gap(8.0),
    ]);

    let pdf = PdfBuilder::new()
        .add_sections([section])
        .render()
        .expect("render indented content");
    assert!(pdf.bytes.starts_with(b"%PDF"));
    assert_eq!(pdf.page_count, 1);
}

#[test]
fn report_without_revisions_fits_one_page() {
    if !fonts::default_fonts_available() {
        return;
    }

    let report = render_report(&sample_document(0), &PdfOptions::default()).expect("render report");
    assert_eq!(report.file_name, "Annual_Report.pdf");
    assert_eq!(report.pdf.page_count, 1);
}

#[test]
fn many_revisions_flow_onto_new_pages() {
    if !fonts::default_fonts_available() {
        return;
    }

    let report =
        render_report(&sample_document(30), &PdfOptions::default()).expect("render report");
    assert!(
        report.pdf.page_count > 1,
        "expected pagination, got {} page(s)",
        report.pdf.page_count
    );
}
