//! SlashGate - serverless interactions gateway.
//!
//! This library receives signed webhook events from an interactions
//! platform at a function-invocation boundary, authenticates them with
//! Ed25519, and dispatches them to registered handlers.
//!
//! ## Architecture
//!
//! ```text
//! Envelope → Gateway (signature gate) → Mux → sub-router → Handler → DeliveryResult
//! ```
//!
//! ## Usage
//!
//! Build a [`Mux`] at startup, register handlers, then wrap it in a
//! [`Gateway`] and feed it raw invocation events:
//!
//! ```no_run
//! use slashgate::{Config, Gateway, InteractionResponse, Mux, ResponseKind};
//! use serde_json::json;
//!
//! # async fn run(raw_event: &[u8]) -> anyhow::Result<()> {
//! let mut mux = Mux::default();
//! mux.register_command_fn("greet", |_cx, _interaction| async {
//!     Ok(InteractionResponse::new(
//!         ResponseKind::ChannelMessageWithSource,
//!         json!({"content": "hello"}),
//!     ))
//! })?;
//!
//! let config = Config::from_env()?;
//! let gateway = Gateway::from_config(&config, mux);
//! let raw_result = gateway.invoke(raw_event).await?;
//! # Ok(())
//! # }
//! ```
//!
//! Registration must finish before the first invocation; a wired gateway
//! is read-only and freely shareable.

pub mod config;
pub mod delivery;
pub mod handler;
pub mod interaction;
pub mod routing;

// Re-export commonly used types
pub use config::{Config, ConfigError};
pub use delivery::{
    DeliveryResult, Envelope, Gateway, GatewayError, SIGNATURE_HEADER, TIMESTAMP_HEADER,
};
pub use handler::{handler_fn, Handler, HandlerFn, HandlerResult, InvocationContext};
pub use interaction::{
    Interaction, InteractionData, InteractionKind, InteractionResponse, ResponseKind,
};
pub use routing::{CommandMux, ComponentMux, HandlerRegistry, ModalMux, Mux, RegistrationError};
