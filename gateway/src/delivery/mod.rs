//! Delivery module: the hosting-boundary surface of the gateway.
//!
//! This module provides:
//! - Envelope and result types exchanged with the hosting boundary
//! - Ed25519 signature verification over `timestamp ++ body`
//! - The [`Gateway`] that authenticates one envelope and dispatches it
//!
//! ## Invocation flow
//!
//! ```text
//! raw bytes → Envelope → signature gate → Interaction → handler → DeliveryResult → raw bytes
//! ```

pub mod envelope;
pub mod gateway;
pub mod signature;

pub use envelope::{DeliveryResult, Envelope, SIGNATURE_HEADER, TIMESTAMP_HEADER};
pub use gateway::{Gateway, GatewayError};
pub use signature::{signed_message, verify_signature};
