//! MESSAGE-INTEGRITY and FINGERPRINT computation helpers.
//!
//! The codec itself only reports *which bytes* a check must cover (via the
//! serializer's and deserializer's integrity/fingerprint buffers) and never
//! validates the values. These helpers do the actual digest work for callers
//! that want it, including the credential key derivation of
//! [RFC5389 Section 15.4](https://tools.ietf.org/html/rfc5389#section-15.4).

use crc::{crc32, Hasher32};
use hmac::{Hmac, Mac};
use md5::{Digest, Md5};
use sha1::Sha1;
use stringprep::saslprep;

use crate::definitions::{STUN_FINGERPRINT_XOR_VALUE, STUN_INTEGRITY_VALUE_SIZE};
use crate::errors::IntegrityKeyGenerationError;

/// Calculates the FINGERPRINT value: the CRC-32 of the covered segments
/// XORed with 0x5354554e.
///
/// Accepts the coverage as segments so a received message can be checked
/// through [`CoverageBuffer::segments`](crate::CoverageBuffer::segments)
/// without copying; a serializer-side buffer is passed as a single segment.
pub fn calculate_fingerprint(segments: &[&[u8]]) -> u32 {
    let mut digest = crc32::Digest::new(crc32::IEEE);
    for segment in segments {
        digest.write(segment);
    }

    digest.sum32() ^ STUN_FINGERPRINT_XOR_VALUE
}

/// Calculates the MESSAGE-INTEGRITY value: the HMAC-SHA1 of the covered
/// segments under `key`.
pub fn calculate_integrity_hmac(
    key: &[u8],
    segments: &[&[u8]],
) -> [u8; STUN_INTEGRITY_VALUE_SIZE] {
    // HMAC accepts keys of any length.
    let mut mac = Hmac::<Sha1>::new_from_slice(key).expect("HMAC accepts keys of any length");
    for segment in segments {
        mac.update(segment);
    }

    mac.finalize().into_bytes().into()
}

/// Derives the long-term credential key:
/// `MD5(username ":" realm ":" SASLprep(password))`.
pub fn calculate_long_term_integrity_key(
    username: &str,
    realm: &str,
    password: &str,
) -> Result<[u8; 16], IntegrityKeyGenerationError> {
    let hash_input = format!("{}:{}:{}", username, realm, saslprep(password)?);

    let mut hasher = Md5::new();
    hasher.update(hash_input.as_bytes());
    Ok(hasher.finalize().into())
}

/// Derives the short-term credential key: `SASLprep(password)`.
pub fn calculate_short_term_integrity_key(
    password: &str,
) -> Result<Vec<u8>, IntegrityKeyGenerationError> {
    Ok(saslprep(password)?.as_bytes().to_vec())
}
