//! Interaction routing module.
//!
//! This module provides:
//! - The keyed registry backing command and custom-id routing
//! - Typed sub-routers, one per keyed interaction kind
//! - The top-level [`Mux`] switching on interaction kind
//!
//! ## Dispatch tree
//!
//! ```text
//! Mux ─┬─ ping        → handler or built-in pong
//!      ├─ command     → CommandMux   ── name      → handler
//!      ├─ component   → ComponentMux ── custom_id → handler
//!      ├─ autocomplete→ CommandMux   ── name      → handler
//!      └─ modal       → ModalMux     ── custom_id → handler
//! ```

pub mod mux;
pub mod registry;

pub use mux::{CommandMux, ComponentMux, ModalMux, Mux};
pub use registry::{HandlerRegistry, RegistrationError};
