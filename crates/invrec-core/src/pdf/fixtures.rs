//! Generated PDFs for tests.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, encryption, Dictionary, Document, Object, ObjectId, Stream};

const FILE_ID: &[u8] = b"invrec-fixture-id";

/// Document with one page per entry, each line drawn in Helvetica.
pub fn text_pdf(pages: &[&[&str]]) -> Vec<u8> {
    save(build(pages, helvetica()))
}

/// Same layout as [`text_pdf`], but the font dictionary has no `BaseFont`.
///
/// lopdf still decodes the text; pdf-extract cannot build the font.
pub fn pdf_without_base_font(pages: &[&[&str]]) -> Vec<u8> {
    let mut font = helvetica();
    font.remove(b"BaseFont");
    save(build(pages, font))
}

/// Structurally valid document whose page tree has no kids.
pub fn pdf_without_pages() -> Vec<u8> {
    save(build(&[], helvetica()))
}

/// RC4-encrypted document that opens with the empty user password.
pub fn empty_password_pdf(pages: &[&[&str]]) -> Vec<u8> {
    let mut doc = build(pages, helvetica());
    let encrypt_id = add_encryption(&mut doc, None);

    let key = encryption::get_encryption_key(&doc, "", false).unwrap();
    for (id, object) in doc.objects.iter_mut() {
        if *id == encrypt_id || !matches!(object, Object::Stream(_)) {
            continue;
        }
        // RC4 is symmetric, so decrypting plain content encrypts it
        let cipher = encryption::decrypt_object(&key, *id, &*object, false).unwrap();
        if let Object::Stream(stream) = object {
            stream.set_content(cipher);
        }
    }

    save(doc)
}

/// Encrypted document whose user password is not empty.
pub fn password_protected_pdf(pages: &[&[&str]]) -> Vec<u8> {
    let mut doc = build(pages, helvetica());
    add_encryption(&mut doc, Some(vec![0u8; 32]));
    save(doc)
}

fn helvetica() -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    }
}

fn build(pages: &[&[&str]], font: Dictionary) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(font);
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for lines in pages {
        let mut operations = Vec::new();
        for (i, line) in lines.iter().enumerate() {
            let y = 780 - 20 * i as i64;
            let bytes: Vec<u8> = line.chars().map(|c| c as u32 as u8).collect();
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec!["F1".into(), 12.into()]));
            operations.push(Operation::new("Td", vec![50.into(), y.into()]));
            operations.push(Operation::new("Tj", vec![Object::string_literal(bytes)]));
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
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

/// Standard security handler, revision 4 with RC4 streams. Without `user_hash`
/// the password check is skipped, so any password (the empty one included) opens it.
fn add_encryption(doc: &mut Document, user_hash: Option<Vec<u8>>) -> ObjectId {
    let mut dict = dictionary! {
        "Filter" => "Standard",
        "V" => 4,
        "R" => 4,
        "Length" => 128,
        "O" => Object::string_literal(vec![0x5au8; 32]),
        "P" => -4,
        "CF" => dictionary! {
            "StdCF" => dictionary! { "CFM" => "V2", "Length" => 16 },
        },
        "StmF" => "StdCF",
        "StrF" => "StdCF",
    };
    if let Some(hash) = user_hash {
        dict.set("U", Object::string_literal(hash));
    }

    let encrypt_id = doc.add_object(dict);
    doc.trailer.set("Encrypt", encrypt_id);
    doc.trailer.set(
        "ID",
        vec![
            Object::string_literal(FILE_ID.to_vec()),
            Object::string_literal(FILE_ID.to_vec()),
        ],
    );
    encrypt_id
}

fn save(mut doc: Document) -> Vec<u8> {
    let mut data = Vec::new();
    doc.save_to(&mut data).unwrap();
    data
}
