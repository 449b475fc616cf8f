use lopdf::encryption::crypt_filters::{Aes128CryptFilter, Aes256CryptFilter, CryptFilter};
use lopdf::{Document, EncryptionState, EncryptionVersion, Object, Permissions, Stream, StringFormat, dictionary};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[allow(dead_code)]
pub const USER_PASSWORD: &str = "user_secret";
#[allow(dead_code)]
pub const OWNER_PASSWORD: &str = "owner_secret";

/// A Helvetica document with one page per entry of `texts`.
#[allow(dead_code)]
pub fn plain_document(texts: &[&str]) -> Document {
    let mut doc = Document::with_version("1.5");

    // The file ID is required for encryption.
    let id1 = vec![1u8, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16];
    let id2 = vec![16u8, 15, 14, 13, 12, 11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1];
    doc.trailer.set(
        "ID",
        Object::Array(vec![
            Object::String(id1, StringFormat::Literal),
            Object::String(id2, StringFormat::Literal),
        ]),
    );

    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica"
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => Object::Reference(font_id)
        }
    });

    let mut kids = Vec::new();
    for text in texts {
        let content = format!("BT\n/F1 12 Tf\n100 700 Td\n({}) Tj\nET\n", text);
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "MediaBox" => vec![Object::Integer(0), Object::Integer(0), Object::Integer(612), Object::Integer(792)],
            "Resources" => Object::Reference(resources_id),
            "Contents" => Object::Reference(content_id)
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id)
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));
    doc
}

/// Save a plain document with the given pages to `dir/name`.
#[allow(dead_code)]
pub fn write_plain(dir: &Path, name: &str, texts: &[&str]) -> PathBuf {
    let path = dir.join(name);
    plain_document(texts).save(&path).unwrap();
    path
}

/// Security handlers the tests encrypt with.
#[allow(dead_code)]
#[derive(Clone, Copy, Debug)]
pub enum Scheme {
    /// RC4 128-bit, revision 3.
    Rc4,
    /// AES-128, revision 4.
    Aes128,
    /// AES-256, revision 6.
    Aes256,
}

/// Save an RC4 128-bit encrypted document with the given pages to `dir/name`.
#[allow(dead_code)]
pub fn write_encrypted(dir: &Path, name: &str, texts: &[&str]) -> PathBuf {
    write_encrypted_with(dir, name, texts, Scheme::Rc4)
}

/// Save a document encrypted with `scheme` to `dir/name`.
#[allow(dead_code)]
pub fn write_encrypted_with(dir: &Path, name: &str, texts: &[&str], scheme: Scheme) -> PathBuf {
    let mut doc = plain_document(texts);
    let permissions = Permissions::all();
    let file_encryption_key = [7u8; 32];

    let version = match scheme {
        Scheme::Rc4 => EncryptionVersion::V2 {
            document: &doc,
            owner_password: OWNER_PASSWORD,
            user_password: USER_PASSWORD,
            key_length: 128,
            permissions,
        },
        Scheme::Aes128 => {
            let crypt_filter: Arc<dyn CryptFilter> = Arc::new(Aes128CryptFilter);
            EncryptionVersion::V4 {
                document: &doc,
                encrypt_metadata: true,
                crypt_filters: BTreeMap::from([(b"StdCF".to_vec(), crypt_filter)]),
                stream_filter: b"StdCF".to_vec(),
                string_filter: b"StdCF".to_vec(),
                owner_password: OWNER_PASSWORD,
                user_password: USER_PASSWORD,
                permissions,
            }
        }
        Scheme::Aes256 => {
            let crypt_filter: Arc<dyn CryptFilter> = Arc::new(Aes256CryptFilter);
            EncryptionVersion::V5 {
                encrypt_metadata: true,
                crypt_filters: BTreeMap::from([(b"StdCF".to_vec(), crypt_filter)]),
                file_encryption_key: &file_encryption_key,
                stream_filter: b"StdCF".to_vec(),
                string_filter: b"StdCF".to_vec(),
                owner_password: OWNER_PASSWORD,
                user_password: USER_PASSWORD,
                permissions,
            }
        }
    };
    let state = EncryptionState::try_from(version).unwrap();
    doc.encrypt(&state).unwrap();

    let path = dir.join(name);
    doc.save(&path).unwrap();
    path
}

/// Page count and text of an unencrypted document on disk.
#[allow(dead_code)]
pub fn page_text(path: &Path) -> (usize, String) {
    let doc = Document::load(path).unwrap();
    assert!(!doc.is_encrypted(), "{} should open without a password", path.display());
    let pages = doc.get_pages();
    let numbers: Vec<u32> = pages.keys().cloned().collect();
    (pages.len(), doc.extract_text(&numbers).unwrap())
}
