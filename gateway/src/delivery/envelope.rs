//! Delivery envelope and result types for the hosting boundary.
//!
//! The hosting boundary delivers one JSON envelope per invocation and
//! expects one JSON result back. Field names follow the function-host
//! event shape (`isBase64Encoded`, `statusCode`).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::interaction::InteractionResponse;

/// Header carrying the base64-encoded Ed25519 signature.
pub const SIGNATURE_HEADER: &str = "X-Signature-Ed25519";

/// Header carrying the opaque timestamp echoed into the signed message.
pub const TIMESTAMP_HEADER: &str = "X-Signature-Timestamp";

/// Inbound delivery envelope, constructed by the hosting boundary.
///
/// Header lookup is exact and case-sensitive; a hosting boundary that
/// normalizes header case must do so before building the envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    /// Raw request body: text, or base64 when `is_base64_encoded` is set.
    pub body: String,
    /// Transport headers, verbatim.
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Whether `body` is base64-encoded bytes rather than raw text.
    #[serde(default)]
    pub is_base64_encoded: bool,
}

/// Outbound delivery result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryResult {
    /// 200 when a handler ran, 401 on authentication failure.
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    /// The handler's response. Present only with status 200.
    #[serde(default, rename = "body", skip_serializing_if = "Option::is_none")]
    pub response: Option<InteractionResponse>,
}

impl DeliveryResult {
    /// A successful result wrapping a handler response.
    pub fn ok(response: InteractionResponse) -> Self {
        Self {
            status_code: 200,
            response: Some(response),
        }
    }

    /// An authentication failure with no body.
    pub fn unauthorized() -> Self {
        Self {
            status_code: 401,
            response: None,
        }
    }
}
