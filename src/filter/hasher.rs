use sha2::{Digest, Sha256};

use crate::domain::Fingerprint;

/// Identity of a post's text. The plain text is hashed as-is.
pub fn fingerprint(plain_content: &str) -> Fingerprint {
    let mut hasher = Sha256::new();
    hasher.update(plain_content.as_bytes());
    Fingerprint::from_hex(hex::encode(hasher.finalize()))
}

/// Line breaks would split the text across records on the service side.
pub fn strip_line_breaks(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}
