use sha2::{Digest, Sha256};

/// Code length used when none is configured.
pub const DEFAULT_CODE_LENGTH: usize = 10;

/// Length of a fully encoded digest: 32 bytes, two characters each.
pub const MAX_CODE_LENGTH: usize = 64;

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Derive the short code for `url`.
///
/// The SHA-256 digest of the UTF-8 bytes is rendered one byte at a time as a
/// zero-padded, two-character base-36 number and the result is cut down to
/// `length` characters. The same input always yields the same code, so a
/// URL can be re-submitted without creating a second mapping.
///
/// Any string is accepted, including the empty string. A `length` above
/// [`MAX_CODE_LENGTH`] returns the whole encoding.
pub fn generate(url: &str, length: usize) -> String {
    let digest = Sha256::digest(url.as_bytes());

    let mut encoded = String::with_capacity(MAX_CODE_LENGTH);
    for byte in digest {
        // 255 is "73" in base 36, so two characters always suffice.
        encoded.push(ALPHABET[(byte / 36) as usize] as char);
        encoded.push(ALPHABET[(byte % 36) as usize] as char);
    }

    encoded.truncate(length.min(MAX_CODE_LENGTH));
    encoded
}
