//! Ed25519 request signature verification.
//!
//! The platform signs `timestamp ++ body` — the timestamp header bytes
//! immediately followed by the raw payload bytes, no separator. Byte order
//! and the absence of a delimiter are security-critical and must not
//! change. Ed25519 verification is constant-time with respect to the
//! signature, so no separate comparison step is needed.

use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use tracing::warn;

/// Reconstruct the exact byte sequence the platform signed.
pub fn signed_message(timestamp: &str, body: &[u8]) -> Vec<u8> {
    let mut message = Vec::with_capacity(timestamp.len() + body.len());
    message.extend_from_slice(timestamp.as_bytes());
    message.extend_from_slice(body);
    message
}

/// Verify the signature over `timestamp ++ body` under the given key.
///
/// Returns `false` on mismatch; never fails otherwise.
pub fn verify_signature(
    public_key: &VerifyingKey,
    timestamp: &str,
    body: &[u8],
    signature: &Signature,
) -> bool {
    let message = signed_message(timestamp, body);
    let valid = public_key.verify(&message, signature).is_ok();

    if !valid {
        warn!(
            timestamp = %timestamp,
            body_length = body.len(),
            "signature_mismatch"
        );
    }

    valid
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signer, SigningKey};

    fn keypair() -> (SigningKey, VerifyingKey) {
        let signing_key = SigningKey::from_bytes(&[7u8; 32]);
        let verifying_key = signing_key.verifying_key();
        (signing_key, verifying_key)
    }

    #[test]
    fn test_verify_valid_signature() {
        let (signing_key, verifying_key) = keypair();
        let timestamp = "1700000000";
        let body = br#"{"type":1}"#;

        let signature = signing_key.sign(&signed_message(timestamp, body));
        assert!(verify_signature(&verifying_key, timestamp, body, &signature));
    }

    #[test]
    fn test_tampered_body_fails() {
        let (signing_key, verifying_key) = keypair();
        let timestamp = "1700000000";

        let signature = signing_key.sign(&signed_message(timestamp, br#"{"type":1}"#));
        assert!(!verify_signature(
            &verifying_key,
            timestamp,
            br#"{"type":2}"#,
            &signature
        ));
    }

    #[test]
    fn test_tampered_timestamp_fails() {
        let (signing_key, verifying_key) = keypair();
        let body = br#"{"type":1}"#;

        let signature = signing_key.sign(&signed_message("1700000000", body));
        assert!(!verify_signature(&verifying_key, "1700000001", body, &signature));
    }

    #[test]
    fn test_flipped_signature_bit_fails() {
        let (signing_key, verifying_key) = keypair();
        let timestamp = "1700000000";
        let body = br#"{"type":1}"#;

        let mut bytes = signing_key.sign(&signed_message(timestamp, body)).to_bytes();
        bytes[0] ^= 1;
        let signature = Signature::from_bytes(&bytes);

        assert!(!verify_signature(&verifying_key, timestamp, body, &signature));
    }

    #[test]
    fn test_wrong_key_fails() {
        let (signing_key, _) = keypair();
        let other_key = SigningKey::from_bytes(&[9u8; 32]).verifying_key();
        let timestamp = "1700000000";
        let body = br#"{"type":1}"#;

        let signature = signing_key.sign(&signed_message(timestamp, body));
        assert!(!verify_signature(&other_key, timestamp, body, &signature));
    }

    #[test]
    fn test_message_has_no_separator() {
        assert_eq!(signed_message("17", b"ab"), b"17ab");
        assert_eq!(signed_message("", b"ab"), b"ab");
        assert_eq!(signed_message("17", b""), b"17");
    }
}
