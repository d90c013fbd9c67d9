//! Interaction payload types.
//!
//! The platform owns this schema; only the `type` discriminant and the
//! routing fields (`data.name`, `data.custom_id`) matter to the gateway.
//! Everything else is carried through flattened pass-through maps so a
//! payload survives deserialize/reserialize without field loss, and
//! discriminant values this crate does not know yet are preserved
//! numerically instead of failing the parse.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

// =============================================================================
// Discriminants
// =============================================================================

/// Interaction type discriminant as sent by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum InteractionKind {
    /// Endpoint liveness check (type 1).
    Ping,
    /// Slash command invocation (type 2).
    ApplicationCommand,
    /// Button press, select menu choice, etc. (type 3).
    MessageComponent,
    /// Typed-so-far command autocomplete request (type 4).
    Autocomplete,
    /// Modal form submission (type 5).
    ModalSubmit,
    /// A discriminant this crate does not know. Preserved for pass-through.
    Unknown(u8),
}

impl From<u8> for InteractionKind {
    fn from(value: u8) -> Self {
        match value {
            1 => Self::Ping,
            2 => Self::ApplicationCommand,
            3 => Self::MessageComponent,
            4 => Self::Autocomplete,
            5 => Self::ModalSubmit,
            other => Self::Unknown(other),
        }
    }
}

impl From<InteractionKind> for u8 {
    fn from(kind: InteractionKind) -> Self {
        match kind {
            InteractionKind::Ping => 1,
            InteractionKind::ApplicationCommand => 2,
            InteractionKind::MessageComponent => 3,
            InteractionKind::Autocomplete => 4,
            InteractionKind::ModalSubmit => 5,
            InteractionKind::Unknown(other) => other,
        }
    }
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ping => write!(f, "ping"),
            Self::ApplicationCommand => write!(f, "application command"),
            Self::MessageComponent => write!(f, "message component"),
            Self::Autocomplete => write!(f, "autocomplete"),
            Self::ModalSubmit => write!(f, "modal submit"),
            Self::Unknown(value) => write!(f, "unknown ({value})"),
        }
    }
}

/// Interaction response type discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum ResponseKind {
    /// Reply to a ping (type 1).
    Pong,
    /// Immediate message reply (type 4).
    ChannelMessageWithSource,
    /// Acknowledge now, reply later (type 5).
    DeferredChannelMessageWithSource,
    /// Acknowledge a component, edit later (type 6).
    DeferredUpdateMessage,
    /// Edit the message the component lives on (type 7).
    UpdateMessage,
    /// Autocomplete suggestions (type 8).
    AutocompleteResult,
    /// Open a modal (type 9).
    Modal,
    /// A discriminant this crate does not know. Preserved for pass-through.
    Unknown(u8),
}

impl From<u8> for ResponseKind {
    fn from(value: u8) -> Self {
        match value {
            1 => Self::Pong,
            4 => Self::ChannelMessageWithSource,
            5 => Self::DeferredChannelMessageWithSource,
            6 => Self::DeferredUpdateMessage,
            7 => Self::UpdateMessage,
            8 => Self::AutocompleteResult,
            9 => Self::Modal,
            other => Self::Unknown(other),
        }
    }
}

impl From<ResponseKind> for u8 {
    fn from(kind: ResponseKind) -> Self {
        match kind {
            ResponseKind::Pong => 1,
            ResponseKind::ChannelMessageWithSource => 4,
            ResponseKind::DeferredChannelMessageWithSource => 5,
            ResponseKind::DeferredUpdateMessage => 6,
            ResponseKind::UpdateMessage => 7,
            ResponseKind::AutocompleteResult => 8,
            ResponseKind::Modal => 9,
            ResponseKind::Unknown(other) => other,
        }
    }
}

// =============================================================================
// Payloads
// =============================================================================

/// A single interaction event delivered by the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    /// Interaction type discriminant.
    #[serde(rename = "type")]
    pub kind: InteractionKind,
    /// Kind-specific payload. Absent for pings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<InteractionData>,
    /// Platform-owned fields this crate does not model (id, token, member,
    /// guild_id, ...), carried through verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Interaction {
    /// Command name for application command and autocomplete interactions.
    pub fn command_name(&self) -> Option<&str> {
        self.data.as_ref().and_then(|d| d.name.as_deref())
    }

    /// Custom identifier for component and modal submit interactions.
    pub fn custom_id(&self) -> Option<&str> {
        self.data.as_ref().and_then(|d| d.custom_id.as_deref())
    }
}

/// Kind-specific interaction payload.
///
/// Only the two routing fields are modeled; options, components, values and
/// the rest ride along in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionData {
    /// Command name (application command and autocomplete interactions).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Custom identifier the application embedded when it created the
    /// component or modal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_id: Option<String>,
    /// Unmodeled payload fields, carried through verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response returned by a handler, serialized into the delivery result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionResponse {
    /// Response type discriminant.
    #[serde(rename = "type")]
    pub kind: ResponseKind,
    /// Response payload, opaque to the gateway.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Unmodeled response fields, carried through verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InteractionResponse {
    /// Build a response with the given discriminant and payload.
    pub fn new(kind: ResponseKind, data: Value) -> Self {
        Self {
            kind,
            data: Some(data),
            extra: Map::new(),
        }
    }

    /// The reply to a ping.
    pub fn pong() -> Self {
        Self {
            kind: ResponseKind::Pong,
            data: None,
            extra: Map::new(),
        }
    }
}
