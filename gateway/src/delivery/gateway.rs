//! Envelope verification and handler invocation.
//!
//! One invocation is a single pass: decode the envelope, authenticate it,
//! parse the interaction, dispatch, serialize the result. Nothing is
//! retried, queued, or persisted.
//!
//! Failure reporting follows the trust boundary. Anything an attacker can
//! forge (signature headers, signature bytes) is answered with a plain 401
//! and is never an error. Anything only the hosting boundary or the
//! platform itself can get wrong (undecodable body despite the encoding
//! flag, unparseable payload after a valid signature) is a genuine error
//! propagated to the caller.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use ed25519_dalek::{Signature, VerifyingKey};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;
use crate::delivery::envelope::{DeliveryResult, Envelope, SIGNATURE_HEADER, TIMESTAMP_HEADER};
use crate::delivery::signature::verify_signature;
use crate::handler::{Handler, InvocationContext};
use crate::interaction::Interaction;

/// Errors surfaced to the invocation caller.
///
/// Expected authentication failures are not errors; they produce a 401
/// [`DeliveryResult`] instead.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The envelope itself was not valid JSON.
    #[error("malformed delivery envelope: {0}")]
    MalformedEnvelope(#[source] serde_json::Error),

    /// The body was flagged base64 but did not decode.
    #[error("envelope body is not valid base64: {0}")]
    BodyNotBase64(#[source] base64::DecodeError),

    /// The payload did not parse as an interaction even though its
    /// signature verified.
    #[error("interaction payload could not be parsed: {0}")]
    MalformedInteraction(#[source] serde_json::Error),

    /// The delivery result could not be serialized.
    #[error("delivery result could not be serialized: {0}")]
    ResultSerialization(#[source] serde_json::Error),

    /// The application handler failed.
    #[error(transparent)]
    Handler(#[from] anyhow::Error),
}

/// Verifies signed delivery envelopes and dispatches their interactions.
///
/// Build one at startup with a fully wired handler (usually a
/// [`crate::Mux`]); it is read-only afterwards and freely shareable behind
/// an `Arc`.
pub struct Gateway {
    public_key: VerifyingKey,
    handler: Box<dyn Handler>,
}

impl Gateway {
    /// Create a gateway verifying against the given public key.
    pub fn new(public_key: VerifyingKey, handler: impl Handler + 'static) -> Self {
        Self {
            public_key,
            handler: Box::new(handler),
        }
    }

    /// Create a gateway from loaded configuration.
    pub fn from_config(config: &Config, handler: impl Handler + 'static) -> Self {
        Self::new(config.public_key, handler)
    }

    /// Process one raw invocation event and produce the raw result bytes.
    ///
    /// This is the hosting-boundary entry point: raw event bytes in, raw
    /// result bytes out.
    pub async fn invoke(&self, raw: &[u8]) -> Result<Vec<u8>, GatewayError> {
        let envelope =
            serde_json::from_slice(raw).map_err(GatewayError::MalformedEnvelope)?;
        let result = self.handle_envelope(envelope).await?;
        serde_json::to_vec(&result).map_err(GatewayError::ResultSerialization)
    }

    /// Authenticate one envelope and dispatch its interaction.
    pub async fn handle_envelope(
        &self,
        envelope: Envelope,
    ) -> Result<DeliveryResult, GatewayError> {
        let Envelope {
            body,
            headers,
            is_base64_encoded,
        } = envelope;

        let signature = match headers.get(SIGNATURE_HEADER) {
            Some(value) => value,
            None => {
                warn!("signature_header_missing");
                return Ok(DeliveryResult::unauthorized());
            }
        };
        let signature = match BASE64.decode(signature) {
            Ok(bytes) => bytes,
            Err(_) => {
                warn!("signature_not_base64");
                return Ok(DeliveryResult::unauthorized());
            }
        };
        let signature = match Signature::from_slice(&signature) {
            Ok(signature) => signature,
            Err(_) => {
                warn!(signature_length = signature.len(), "signature_malformed");
                return Ok(DeliveryResult::unauthorized());
            }
        };

        let timestamp = match headers.get(TIMESTAMP_HEADER) {
            Some(value) => value.clone(),
            None => {
                warn!("timestamp_header_missing");
                return Ok(DeliveryResult::unauthorized());
            }
        };

        let body = if is_base64_encoded {
            BASE64.decode(&body).map_err(GatewayError::BodyNotBase64)?
        } else {
            body.into_bytes()
        };

        if !verify_signature(&self.public_key, &timestamp, &body, &signature) {
            return Ok(DeliveryResult::unauthorized());
        }

        // The signature proved the sender; a parse failure past this point
        // means the payload shape is ahead of this deployment.
        let interaction: Interaction =
            serde_json::from_slice(&body).map_err(GatewayError::MalformedInteraction)?;

        info!(kind = %interaction.kind, "interaction_verified");

        let cx = InvocationContext { timestamp, headers };
        let response = self.handler.handle(cx, interaction).await?;

        Ok(DeliveryResult::ok(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::signature::signed_message;
    use crate::handler::handler_fn;
    use crate::interaction::{InteractionResponse, ResponseKind};
    use crate::routing::Mux;
    use ed25519_dalek::{Signer, SigningKey};
    use serde_json::{json, Value};
    use std::collections::HashMap;

    fn signing_key() -> SigningKey {
        SigningKey::from_bytes(&[7u8; 32])
    }

    fn pong_gateway() -> Gateway {
        Gateway::new(signing_key().verifying_key(), Mux::default())
    }

    /// A fully signed envelope around the given payload, base64-encoded.
    fn signed_envelope(payload: &str, timestamp: &str) -> Envelope {
        let signature = signing_key().sign(&signed_message(timestamp, payload.as_bytes()));
        Envelope {
            body: BASE64.encode(payload),
            headers: HashMap::from([
                (
                    SIGNATURE_HEADER.to_string(),
                    BASE64.encode(signature.to_bytes()),
                ),
                (TIMESTAMP_HEADER.to_string(), timestamp.to_string()),
            ]),
            is_base64_encoded: true,
        }
    }

    #[tokio::test]
    async fn test_missing_signature_header_is_unauthorized() {
        let mut envelope = signed_envelope(r#"{"type":1}"#, "1700000000");
        envelope.headers.remove(SIGNATURE_HEADER);

        let result = pong_gateway().handle_envelope(envelope).await.unwrap();
        assert_eq!(result.status_code, 401);
        assert!(result.response.is_none());
    }

    #[tokio::test]
    async fn test_missing_timestamp_header_is_unauthorized() {
        let mut envelope = signed_envelope(r#"{"type":1}"#, "1700000000");
        envelope.headers.remove(TIMESTAMP_HEADER);

        let result = pong_gateway().handle_envelope(envelope).await.unwrap();
        assert_eq!(result.status_code, 401);
    }

    #[tokio::test]
    async fn test_signature_not_base64_is_unauthorized() {
        let mut envelope = signed_envelope(r#"{"type":1}"#, "1700000000");
        envelope
            .headers
            .insert(SIGNATURE_HEADER.to_string(), "not base64!!".to_string());

        let result = pong_gateway().handle_envelope(envelope).await.unwrap();
        assert_eq!(result.status_code, 401);
    }

    #[tokio::test]
    async fn test_signature_wrong_length_is_unauthorized() {
        let mut envelope = signed_envelope(r#"{"type":1}"#, "1700000000");
        envelope
            .headers
            .insert(SIGNATURE_HEADER.to_string(), BASE64.encode([0u8; 16]));

        let result = pong_gateway().handle_envelope(envelope).await.unwrap();
        assert_eq!(result.status_code, 401);
    }

    #[tokio::test]
    async fn test_valid_ping_returns_pong() {
        let raw = serde_json::to_vec(&signed_envelope(r#"{"type":1}"#, "1700000000")).unwrap();
        let out = pong_gateway().invoke(&raw).await.unwrap();

        let result: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(result, json!({"statusCode": 200, "body": {"type": 1}}));
    }

    #[tokio::test]
    async fn test_flipped_signature_byte_is_unauthorized() {
        let mut envelope = signed_envelope(r#"{"type":1}"#, "1700000000");
        let mut signature = BASE64
            .decode(envelope.headers.get(SIGNATURE_HEADER).unwrap())
            .unwrap();
        signature[0] ^= 1;
        envelope
            .headers
            .insert(SIGNATURE_HEADER.to_string(), BASE64.encode(signature));

        let raw = serde_json::to_vec(&envelope).unwrap();
        let out = pong_gateway().invoke(&raw).await.unwrap();

        let result: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(result["statusCode"], json!(401));
        assert!(result.get("body").is_none());
    }

    #[tokio::test]
    async fn test_tampered_body_is_unauthorized() {
        let mut envelope = signed_envelope(r#"{"type":1}"#, "1700000000");
        envelope.body = BASE64.encode(r#"{"type":2}"#);

        let result = pong_gateway().handle_envelope(envelope).await.unwrap();
        assert_eq!(result.status_code, 401);
    }

    #[tokio::test]
    async fn test_tampered_timestamp_is_unauthorized() {
        let mut envelope = signed_envelope(r#"{"type":1}"#, "1700000000");
        envelope
            .headers
            .insert(TIMESTAMP_HEADER.to_string(), "1700000001".to_string());

        let result = pong_gateway().handle_envelope(envelope).await.unwrap();
        assert_eq!(result.status_code, 401);
    }

    #[tokio::test]
    async fn test_plain_text_body_is_accepted() {
        let payload = r#"{"type":1}"#;
        let timestamp = "1700000000";
        let signature = signing_key().sign(&signed_message(timestamp, payload.as_bytes()));

        let envelope = Envelope {
            body: payload.to_string(),
            headers: HashMap::from([
                (
                    SIGNATURE_HEADER.to_string(),
                    BASE64.encode(signature.to_bytes()),
                ),
                (TIMESTAMP_HEADER.to_string(), timestamp.to_string()),
            ]),
            is_base64_encoded: false,
        };

        let result = pong_gateway().handle_envelope(envelope).await.unwrap();
        assert_eq!(result.status_code, 200);
    }

    #[tokio::test]
    async fn test_undecodable_body_is_an_error() {
        let mut envelope = signed_envelope(r#"{"type":1}"#, "1700000000");
        envelope.body = "not base64!!".to_string();

        let err = pong_gateway().handle_envelope(envelope).await.unwrap_err();
        assert!(matches!(err, GatewayError::BodyNotBase64(_)));
    }

    #[tokio::test]
    async fn test_malformed_envelope_is_an_error() {
        let err = pong_gateway().invoke(b"not json").await.unwrap_err();
        assert!(matches!(err, GatewayError::MalformedEnvelope(_)));
    }

    #[tokio::test]
    async fn test_unparseable_signed_payload_is_an_error() {
        // Signature verifies, so the broken payload is attributed to the
        // platform rather than masked as a 401.
        let envelope = signed_envelope("definitely not json", "1700000000");

        let err = pong_gateway().handle_envelope(envelope).await.unwrap_err();
        assert!(matches!(err, GatewayError::MalformedInteraction(_)));
    }

    #[tokio::test]
    async fn test_handler_error_propagates() {
        let gateway = Gateway::new(
            signing_key().verifying_key(),
            handler_fn(|_cx, _i| async { anyhow::bail!("downstream failure") }),
        );

        let envelope = signed_envelope(r#"{"type":1}"#, "1700000000");
        let err = gateway.handle_envelope(envelope).await.unwrap_err();
        assert!(matches!(err, GatewayError::Handler(_)));
    }

    #[tokio::test]
    async fn test_handler_sees_context_and_interaction() {
        let gateway = Gateway::new(
            signing_key().verifying_key(),
            handler_fn(|cx: InvocationContext, interaction: Interaction| async move {
                assert_eq!(cx.timestamp, "1700000000");
                assert!(cx.headers.contains_key(SIGNATURE_HEADER));
                assert_eq!(interaction.extra["id"], json!("42"));
                Ok(InteractionResponse::pong())
            }),
        );

        let envelope = signed_envelope(r#"{"type":1,"id":"42"}"#, "1700000000");
        let result = gateway.handle_envelope(envelope).await.unwrap();
        assert_eq!(result.status_code, 200);
    }

    #[tokio::test]
    async fn test_response_round_trips_without_loss() {
        let mut mux = Mux::default();
        mux.register_command_fn("report", |_cx, _i| async {
            let mut response = InteractionResponse::new(
                ResponseKind::ChannelMessageWithSource,
                json!({"content": "done", "embeds": [{"title": "Report"}]}),
            );
            response
                .extra
                .insert("allowed_mentions".to_string(), json!({"parse": []}));
            Ok(response)
        })
        .unwrap();

        let gateway = Gateway::new(signing_key().verifying_key(), mux);
        let payload = r#"{"type":2,"data":{"name":"report"}}"#;
        let raw = serde_json::to_vec(&signed_envelope(payload, "1700000000")).unwrap();

        let out = gateway.invoke(&raw).await.unwrap();
        let result: Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(
            result["body"],
            json!({
                "type": 4,
                "data": {"content": "done", "embeds": [{"title": "Report"}]},
                "allowed_mentions": {"parse": []}
            })
        );
    }
}
