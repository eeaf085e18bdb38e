#![allow(dead_code)]

use std::path::{Path, PathBuf};

use pdf::crypt::Rc4;

pub const USER_PASSWORD: &str = "010190";
pub const OWNER_PASSWORD: &str = "owner-secret";

const PADDING: [u8; 32] = [
    0x28, 0xBF, 0x4E, 0x5E, 0x4E, 0x75, 0x8A, 0x41, 0x64, 0x00, 0x4E, 0x56, 0xFF, 0xFA, 0x01,
    0x08, 0x2E, 0x2E, 0x00, 0xB6, 0xD0, 0x68, 0x3E, 0x80, 0x2F, 0x0C, 0xA9, 0xFE, 0x64, 0x53,
    0x69, 0x7A,
];
const FILE_ID: [u8; 16] = *b"pdf-unlock-text!";
const PERMISSIONS: i32 = -4;

fn padded(password: &str) -> [u8; 32] {
    let bytes = password.as_bytes();
    let n = bytes.len().min(32);
    let mut out = PADDING;
    out[..n].copy_from_slice(&bytes[..n]);
    out[n..].copy_from_slice(&PADDING[..32 - n]);
    out
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Standard security handler, revision 2 (40-bit RC4).
struct Security {
    key: [u8; 5],
    owner: [u8; 32],
    user: [u8; 32],
}

impl Security {
    fn rev2(user_password: &str, owner_password: &str) -> Self {
        let owner_key = md5::compute(padded(owner_password));
        let mut owner = padded(user_password);
        Rc4::encrypt(&owner_key.0[..5], &mut owner);

        let mut ctx = md5::Context::new();
        ctx.consume(padded(user_password));
        ctx.consume(owner);
        ctx.consume(PERMISSIONS.to_le_bytes());
        ctx.consume(FILE_ID);
        let digest = ctx.compute();
        let mut key = [0u8; 5];
        key.copy_from_slice(&digest.0[..5]);

        let mut user = PADDING;
        Rc4::encrypt(&key, &mut user);
        Security { key, owner, user }
    }

    fn encrypt_object(&self, id: u32, data: &mut [u8]) {
        let mut object_key = self.key.to_vec();
        object_key.extend_from_slice(&id.to_le_bytes()[..3]);
        object_key.extend_from_slice(&[0, 0]);
        let digest = md5::compute(&object_key);
        Rc4::encrypt(&digest.0[..10], data);
    }

    fn dictionary(&self) -> String {
        format!(
            "<< /Filter /Standard /V 1 /R 2 /O <{}> /U <{}> /P {} >>",
            hex(&self.owner),
            hex(&self.user),
            PERMISSIONS
        )
    }
}

fn build(pages: &[&str], security: Option<&Security>) -> Vec<u8> {
    let kids: Vec<String> = (0..pages.len())
        .map(|i| format!("{} 0 R", 4 + 2 * i))
        .collect();

    let mut objects: Vec<Vec<u8>> = vec![
        b"<< /Type /Catalog /Pages 2 0 R >>".to_vec(),
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            pages.len()
        )
        .into_bytes(),
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_vec(),
    ];
    for (i, text) in pages.iter().enumerate() {
        let content_id = 5 + 2 * i;
        objects.push(
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
                 /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
                content_id
            )
            .into_bytes(),
        );

        let mut content = format!("BT /F1 12 Tf 72 720 Td ({}) Tj ET", text).into_bytes();
        if let Some(security) = security {
            security.encrypt_object(content_id as u32, &mut content);
        }
        let mut body = format!("<< /Length {} >>\nstream\n", content.len()).into_bytes();
        body.extend_from_slice(&content);
        body.extend_from_slice(b"\nendstream");
        objects.push(body);
    }

    let mut trailer_extra = String::new();
    if let Some(security) = security {
        objects.push(security.dictionary().into_bytes());
        trailer_extra = format!(
            " /Encrypt {} 0 R /ID [<{}> <{}>]",
            objects.len(),
            hex(&FILE_ID),
            hex(&FILE_ID)
        );
    }

    let mut out = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n", i + 1).as_bytes());
        out.extend_from_slice(body);
        out.extend_from_slice(b"\nendobj\n");
    }

    let xref = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).as_bytes());
    for offset in offsets {
        out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R{} >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            trailer_extra,
            xref
        )
        .as_bytes(),
    );
    out
}

/// Builds an unencrypted PDF with one Helvetica text line per page.
pub fn simple_pdf(pages: &[&str]) -> Vec<u8> {
    build(pages, None)
}

/// Same document as [`simple_pdf`], encrypted with 40-bit RC4 under
/// [`USER_PASSWORD`] / [`OWNER_PASSWORD`].
pub fn encrypted_pdf(pages: &[&str]) -> Vec<u8> {
    build(pages, Some(&Security::rev2(USER_PASSWORD, OWNER_PASSWORD)))
}

pub fn write_pdf(dir: &Path, name: &str, pages: &[&str]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, simple_pdf(pages)).unwrap();
    path
}

pub fn write_encrypted_pdf(dir: &Path, name: &str, pages: &[&str]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, encrypted_pdf(pages)).unwrap();
    path
}

/// The `--- Page N ---` header lines of an output file, in order.
pub fn headers(text: &str) -> Vec<&str> {
    text.lines().filter(|l| l.starts_with("--- Page ")).collect()
}
