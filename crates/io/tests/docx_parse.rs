// End-to-end: build real .docx containers in memory, parse, compare.

use std::io::{Cursor, Write};

use docdelta_core::compare;
use docdelta_io::{parse, parse_file, UnreadableDocument};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>
<w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/></w:style>
<w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/></w:style>
</w:styles>"#;

fn zip_parts(parts: &[(&str, &str)]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, body) in parts {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(body.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn para(style: Option<&str>, text: &str) -> String {
    let ppr = style
        .map(|s| format!(r#"<w:pPr><w:pStyle w:val="{s}"/></w:pPr>"#))
        .unwrap_or_default();
    format!(
        r#"<w:p>{ppr}<w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
        escape(text)
    )
}

fn table(rows: &[Vec<String>]) -> String {
    let mut xml = String::from("<w:tbl>");
    for row in rows {
        xml.push_str("<w:tr>");
        for cell in row {
            xml.push_str("<w:tc>");
            xml.push_str(&para(None, cell));
            xml.push_str("</w:tc>");
        }
        xml.push_str("</w:tr>");
    }
    xml.push_str("</w:tbl>");
    xml
}

fn docx(body: &str) -> Vec<u8> {
    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}<w:sectPr/></w:body></w:document>"#
    );
    zip_parts(&[
        ("[Content_Types].xml", "<Types/>"),
        ("word/document.xml", &document),
        ("word/styles.xml", STYLES),
    ])
}

fn price_rows(prices: &[(&str, &str, &str, &str)]) -> Vec<Vec<String>> {
    let mut rows = vec![["Support Item Number", "Support Item Name", "National", "Remote", "Very Remote", "Unit"]
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()];
    for (i, (id, national, remote, very_remote)) in prices.iter().enumerate() {
        rows.push(vec![
            id.to_string(),
            format!("Assistance with self-care activities {i}"),
            national.to_string(),
            remote.to_string(),
            very_remote.to_string(),
            "Hour".to_string(),
        ]);
    }
    rows
}

fn catalogue(extra: &[(&str, &str, &str, &str)]) -> Vec<(String, String, String, String)> {
    let mut items: Vec<(String, String, String, String)> = (0..24)
        .map(|i| {
            (
                format!("01_{:03}_0107_1_1", i),
                format!("${}.47", 60 + i),
                format!("${}.66", 90 + i),
                format!("${}.21", 98 + i),
            )
        })
        .collect();
    items.extend(
        extra
            .iter()
            .map(|(a, b, c, d)| (a.to_string(), b.to_string(), c.to_string(), d.to_string())),
    );
    items
}

fn pricing_doc(extra: &[(&str, &str, &str, &str)], rule: &str) -> Vec<u8> {
    let items = catalogue(extra);
    let borrowed: Vec<(&str, &str, &str, &str)> = items
        .iter()
        .map(|(a, b, c, d)| (a.as_str(), b.as_str(), c.as_str(), d.as_str()))
        .collect();
    let body = format!(
        "{}{}{}{}",
        para(Some("Heading1"), "Core supports"),
        para(None, rule),
        para(None, "The following price limits apply to these support items."),
        table(&price_rows(&borrowed)),
    );
    docx(&body)
}

#[test]
fn parses_headings_rules_and_pricing_table() {
    let bytes = pricing_doc(
        &[],
        "Providers must obtain quotes for supports valued at $15,000 or more.",
    );
    let doc = parse(&bytes).unwrap();

    assert_eq!(doc.paragraphs.len(), 3);
    assert!(doc.paragraphs[0].is_heading);
    assert_eq!(doc.paragraphs[0].style_name, "Heading 1");
    assert_eq!(doc.paragraphs[0].heading_level, 1);
    assert_eq!(doc.paragraphs[1].style_name, "Normal");

    assert_eq!(doc.tables.len(), 1);
    let t = &doc.tables[0];
    assert!(t.is_pricing_table);
    assert!(!t.is_anomalous);
    assert_eq!(t.row_count, 25);
    assert_eq!(t.col_count, 6);
    assert_eq!(t.page, 1);
    assert!(doc.rules.iter().any(|r| r.text.contains("$15,000")));
}

#[test]
fn compares_two_docx_versions() {
    let old = parse(&pricing_doc(
        &[("04_599_0104_6_1", "$77.00", "$107.80", "$115.50")],
        "Providers must obtain quotes for supports valued at $15,000 or more.",
    ))
    .unwrap();
    let new = parse(&pricing_doc(
        &[("04_599_0104_6_1", "$80.06", "$112.08", "$120.09")],
        "Providers must obtain a quote for supports valued at $16,000 or more.",
    ))
    .unwrap();

    let result = compare(&old, &new);
    assert_eq!(result.price_changes.len(), 3);
    assert!(result
        .price_changes
        .iter()
        .all(|c| c.item_id == "04_599_0104_6_1" && c.difference_cents > 0));
    assert_eq!(result.summary.rules_modified, 1);
    assert_eq!(result.summary.rules_added, 0);
    assert_eq!(result.summary.rules_removed, 0);
}

#[test]
fn identical_containers_compare_empty() {
    let bytes = pricing_doc(&[], "Claims must be lodged within 30 days.");
    let a = parse(&bytes).unwrap();
    let b = parse(&bytes).unwrap();
    assert!(!compare(&a, &b).summary.has_changes());
}

#[test]
fn missing_styles_part_falls_back_to_style_ids() {
    let document = format!(
        r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}{}</w:body></w:document>"#,
        para(Some("Heading2"), "Scope"),
        para(None, "Plain text"),
    );
    let bytes = zip_parts(&[("word/document.xml", &document)]);
    let doc = parse(&bytes).unwrap();
    assert_eq!(doc.paragraphs[0].style_name, "Heading2");
    assert_eq!(doc.paragraphs[0].heading_level, 2);
    assert_eq!(doc.paragraphs[1].style_name, "Normal");
}

#[test]
fn rejects_non_zip_bytes() {
    let err = parse(b"definitely not a zip file").unwrap_err();
    assert!(matches!(err, UnreadableDocument::Container(_)));
}

#[test]
fn rejects_container_without_document_part() {
    let bytes = zip_parts(&[("word/styles.xml", STYLES)]);
    let err = parse(&bytes).unwrap_err();
    assert!(matches!(err, UnreadableDocument::MissingPart("word/document.xml")));
}

#[test]
fn rejects_malformed_document_xml() {
    let bytes = zip_parts(&[("word/document.xml", "<w:document><w:body><w:p></w:tbl>")]);
    let err = parse(&bytes).unwrap_err();
    assert!(matches!(err, UnreadableDocument::Malformed { .. }));
}

#[test]
fn parses_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("guide.docx");
    std::fs::write(&path, pricing_doc(&[], "Claims must be lodged within 30 days.")).unwrap();

    let doc = parse_file(&path, &Default::default()).unwrap();
    assert_eq!(doc.metadata.pricing_tables, 1);

    let missing = parse_file(&dir.path().join("absent.docx"), &Default::default()).unwrap_err();
    assert!(matches!(missing, UnreadableDocument::Io(_)));
}
