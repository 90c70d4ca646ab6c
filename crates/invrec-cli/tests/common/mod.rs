//! Fixtures shared by the CLI integration tests.

#![allow(dead_code)]

use std::path::Path;

use calamine::{open_workbook, Data, Reader, Xlsx};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// Builder for single-page text PDFs using the Helvetica base font.
pub struct TestPdfBuilder {
    lines: Vec<String>,
}

impl TestPdfBuilder {
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    pub fn line(mut self, text: &str) -> Self {
        self.lines.push(text.to_string());
        self
    }

    pub fn build(self, path: &Path) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut operations = Vec::new();
        for (i, line) in self.lines.iter().enumerate() {
            let y = 780 - 20 * i as i64;
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec!["F1".into(), 12.into()]));
            operations.push(Operation::new("Td", vec![50.into(), y.into()]));
            operations.push(Operation::new("Tj", vec![Object::string_literal(win_ansi(line))]));
            operations.push(Operation::new("ET", vec![]));
        }

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
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

        doc.save(path).unwrap();
    }
}

/// Latin-1 text as single bytes, which matches WinAnsi for the accented letters used here.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(|c| c as u32 as u8).collect()
}

/// A typical invoice carrying an order number.
pub fn create_invoice(path: &Path, folio: &str, order: &str) {
    TestPdfBuilder::new()
        .line("FACTURA ELECTRONICA")
        .line(&format!("Folio {}", folio))
        .line("Fecha emisión 2024-03-05 10:15:00")
        .line(&format!("Pedido de compra {}", order))
        .line("Total 1500.00")
        .build(path);
}

/// Spreadsheet cell value used to build fixtures.
pub enum Value<'a> {
    Text(&'a str),
    Number(f64),
    Empty,
}

/// Write a one-sheet workbook named `Pedidos`.
pub fn create_workbook(path: &Path, headers: &[&str], rows: &[Vec<Value>]) {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Pedidos").unwrap();

    for (c, header) in headers.iter().enumerate() {
        worksheet.write_string(0, c as u16, *header).unwrap();
    }

    for (r, row) in rows.iter().enumerate() {
        let r = r as u32 + 1;
        for (c, value) in row.iter().enumerate() {
            let c = c as u16;
            match value {
                Value::Text(s) => {
                    worksheet.write_string(r, c, *s).unwrap();
                }
                Value::Number(n) => {
                    worksheet.write_number(r, c, *n).unwrap();
                }
                Value::Empty => {}
            }
        }
    }

    workbook.save(path).unwrap();
}

/// Read the first worksheet back as a header row plus data rows.
pub fn read_first_sheet(path: &Path) -> (Vec<String>, Vec<Vec<Data>>) {
    let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
    let name = workbook.sheet_names()[0].clone();
    let range = workbook.worksheet_range(&name).unwrap();

    let mut rows = range.rows();
    let headers = rows
        .next()
        .map(|r| r.iter().map(|c| c.to_string()).collect())
        .unwrap_or_default();
    let data = rows.map(|r| r.to_vec()).collect();

    (headers, data)
}

/// Cell of `row` under the column named `header`.
pub fn column<'a>(headers: &[String], row: &'a [Data], header: &str) -> &'a Data {
    let idx = headers
        .iter()
        .position(|h| h == header)
        .unwrap_or_else(|| panic!("column {} not found in {:?}", header, headers));
    &row[idx]
}
