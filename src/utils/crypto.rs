// src/utils/crypto.rs
//! Local digest computation for hash signing.
//!
//! The signing service only signs digests it is handed; this module produces
//! them so users can sign a file without uploading it.

use ring::digest::{self, Algorithm};

use crate::models::signing::HashAlgorithm;

fn ring_algorithm(algorithm: HashAlgorithm) -> &'static Algorithm {
    match algorithm {
        HashAlgorithm::Sha256 => &digest::SHA256,
        HashAlgorithm::Sha384 => &digest::SHA384,
        HashAlgorithm::Sha512 => &digest::SHA512,
        HashAlgorithm::Sha1 => &digest::SHA1_FOR_LEGACY_USE_ONLY,
    }
}

/// Computes the digest of `data` with the given algorithm.
///
/// # Returns
/// Raw digest bytes (32, 48, 64 or 20 bytes long).
pub fn hash_data(algorithm: HashAlgorithm, data: &[u8]) -> Vec<u8> {
    digest::digest(ring_algorithm(algorithm), data).as_ref().to_vec()
}

/// Base64 form of [`hash_data`], as expected by `/v1/signhash`.
pub fn hash_data_base64(algorithm: HashAlgorithm, data: &[u8]) -> String {
    base64::encode(hash_data(algorithm, data))
}

/// Checks that a pasted hash is valid base64 of the right length.
pub fn check_base64_digest(algorithm: HashAlgorithm, hash: &str) -> Result<(), String> {
    let decoded = base64::decode(hash.trim()).map_err(|e| format!("hash is not valid base64: {}", e))?;
    let expected = ring_algorithm(algorithm).output_len();
    if decoded.len() != expected {
        return Err(format!(
            "{} digest must be {} bytes, got {}",
            algorithm,
            expected,
            decoded.len()
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_of_hello_world() {
        assert_eq!(
            hash_data_base64(HashAlgorithm::Sha256, b"hello world"),
            "uU0nuZNNPgilLlLX2n2r+sSE7+N6U4DukIj3rOLvzek="
        );
    }

    #[test]
    fn digest_lengths() {
        assert_eq!(hash_data(HashAlgorithm::Sha384, b"").len(), 48);
        assert_eq!(hash_data(HashAlgorithm::Sha512, b"").len(), 64);
        assert_eq!(hash_data(HashAlgorithm::Sha1, b"").len(), 20);
    }

    #[test]
    fn validates_pasted_digest() {
        let good = hash_data_base64(HashAlgorithm::Sha256, b"x");
        assert!(check_base64_digest(HashAlgorithm::Sha256, &good).is_ok());
        assert!(check_base64_digest(HashAlgorithm::Sha512, &good).is_err());
        assert!(check_base64_digest(HashAlgorithm::Sha256, "not base64!").is_err());
    }
}
