//! Interaction routing: typed sub-routers and the top-level mux.
//!
//! Routing failures here are deliberately fatal. An unknown command, a
//! kind mismatch, or an empty slot means the registered handler set does
//! not match the live command set on the platform — a deployment mismatch
//! the operator must fix, not a runtime condition to paper over. The
//! hosting boundary surfaces the resulting crash.

use std::future::Future;

use async_trait::async_trait;
use tracing::info;

use crate::handler::{handler_fn, Handler, HandlerResult, InvocationContext};
use crate::interaction::{Interaction, InteractionKind, InteractionResponse};
use crate::routing::registry::{HandlerRegistry, RegistrationError};

// =============================================================================
// Typed Sub-Routers
// =============================================================================

/// Routes application command and autocomplete interactions by command name.
#[derive(Default)]
pub struct CommandMux {
    registry: HandlerRegistry,
}

impl CommandMux {
    /// Register a handler for the given command name.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        handler: impl Handler + 'static,
    ) -> Result<(), RegistrationError> {
        self.registry.register(name, handler)
    }
}

#[async_trait]
impl Handler for CommandMux {
    /// # Panics
    ///
    /// Panics if the interaction is not an application command or
    /// autocomplete, or if its command name has no registered handler.
    async fn handle(&self, cx: InvocationContext, interaction: Interaction) -> HandlerResult {
        if !matches!(
            interaction.kind,
            InteractionKind::ApplicationCommand | InteractionKind::Autocomplete
        ) {
            panic!(
                "command router asked to handle a {} interaction",
                interaction.kind
            );
        }

        let name = match interaction.command_name() {
            Some(name) => name.to_owned(),
            None => panic!(
                "{} interaction carried no command name",
                interaction.kind
            ),
        };

        info!(command = %name, "command_routing");

        match self.registry.lookup(&name) {
            Some(handler) => handler.handle(cx, interaction).await,
            None => panic!("no handler registered for command `{name}`"),
        }
    }
}

/// Routes message component interactions by custom identifier.
///
/// Appropriate when `custom_id` identifies the component; if it carries
/// state instead, register a custom handler on the slot.
#[derive(Default)]
pub struct ComponentMux {
    registry: HandlerRegistry,
}

impl ComponentMux {
    /// Register a handler for the given component identifier.
    pub fn register(
        &mut self,
        custom_id: impl Into<String>,
        handler: impl Handler + 'static,
    ) -> Result<(), RegistrationError> {
        self.registry.register(custom_id, handler)
    }
}

#[async_trait]
impl Handler for ComponentMux {
    /// # Panics
    ///
    /// Panics if the interaction is not a message component, or if its
    /// custom identifier has no registered handler.
    async fn handle(&self, cx: InvocationContext, interaction: Interaction) -> HandlerResult {
        if interaction.kind != InteractionKind::MessageComponent {
            panic!(
                "component router asked to handle a {} interaction",
                interaction.kind
            );
        }

        let custom_id = match interaction.custom_id() {
            Some(id) => id.to_owned(),
            None => panic!("message component interaction carried no custom id"),
        };

        info!(custom_id = %custom_id, "component_routing");

        match self.registry.lookup(&custom_id) {
            Some(handler) => handler.handle(cx, interaction).await,
            None => panic!("no handler registered for component `{custom_id}`"),
        }
    }
}

/// Routes modal submit interactions by custom identifier.
#[derive(Default)]
pub struct ModalMux {
    registry: HandlerRegistry,
}

impl ModalMux {
    /// Register a handler for the given modal identifier.
    pub fn register(
        &mut self,
        custom_id: impl Into<String>,
        handler: impl Handler + 'static,
    ) -> Result<(), RegistrationError> {
        self.registry.register(custom_id, handler)
    }
}

#[async_trait]
impl Handler for ModalMux {
    /// # Panics
    ///
    /// Panics if the interaction is not a modal submit, or if its custom
    /// identifier has no registered handler.
    async fn handle(&self, cx: InvocationContext, interaction: Interaction) -> HandlerResult {
        if interaction.kind != InteractionKind::ModalSubmit {
            panic!(
                "modal router asked to handle a {} interaction",
                interaction.kind
            );
        }

        let custom_id = match interaction.custom_id() {
            Some(id) => id.to_owned(),
            None => panic!("modal submit interaction carried no custom id"),
        };

        info!(custom_id = %custom_id, "modal_routing");

        match self.registry.lookup(&custom_id) {
            Some(handler) => handler.handle(cx, interaction).await,
            None => panic!("no handler registered for modal `{custom_id}`"),
        }
    }
}

// =============================================================================
// Top-Level Mux
// =============================================================================

/// One dispatch slot of the top-level mux.
///
/// A slot starts empty, becomes a keyed sub-router the first time a key is
/// registered for its kind, or holds a custom handler installed wholesale.
/// The two populated states are mutually exclusive: keyed registration
/// never reaches through a custom handler, and vice versa.
enum Slot<M> {
    Empty,
    Routed(M),
    Custom(Box<dyn Handler>),
}

impl<M> Default for Slot<M> {
    fn default() -> Self {
        Self::Empty
    }
}

impl<M: Default> Slot<M> {
    /// The keyed sub-router, created on first use.
    fn routed_mut(&mut self, kind: InteractionKind) -> Result<&mut M, RegistrationError> {
        if matches!(self, Self::Empty) {
            *self = Self::Routed(M::default());
        }
        match self {
            Self::Routed(mux) => Ok(mux),
            Self::Custom(_) => Err(RegistrationError::SlotOccupied(kind)),
            Self::Empty => unreachable!(),
        }
    }

    fn set_custom(
        &mut self,
        kind: InteractionKind,
        handler: Box<dyn Handler>,
    ) -> Result<(), RegistrationError> {
        match self {
            Self::Empty => {
                *self = Self::Custom(handler);
                Ok(())
            }
            _ => Err(RegistrationError::SlotOccupied(kind)),
        }
    }
}

impl<M: Handler> Slot<M> {
    async fn dispatch(
        &self,
        kind: InteractionKind,
        cx: InvocationContext,
        interaction: Interaction,
    ) -> HandlerResult {
        match self {
            Self::Empty => panic!("no handler is configured for {kind} interactions"),
            Self::Routed(mux) => mux.handle(cx, interaction).await,
            Self::Custom(handler) => handler.handle(cx, interaction).await,
        }
    }
}

/// Top-level router: a five-way switch over interaction kind.
///
/// Build one at startup, register handlers into it, then hand it to
/// [`crate::Gateway`]. Registration is not synchronized against dispatch —
/// finish wiring before the first envelope arrives.
#[derive(Default)]
pub struct Mux {
    ping: Option<Box<dyn Handler>>,
    command: Slot<CommandMux>,
    component: Slot<ComponentMux>,
    autocomplete: Slot<CommandMux>,
    modal: Slot<ModalMux>,
}

impl Mux {
    /// Install a handler for ping interactions.
    ///
    /// Without one, pings are answered with a built-in pong.
    pub fn set_ping_handler(
        &mut self,
        handler: impl Handler + 'static,
    ) -> Result<(), RegistrationError> {
        if self.ping.is_some() {
            return Err(RegistrationError::SlotOccupied(InteractionKind::Ping));
        }
        self.ping = Some(Box::new(handler));
        Ok(())
    }

    /// Install a custom handler for all application command interactions.
    ///
    /// The slot must be empty: custom handlers and keyed routing are
    /// mutually exclusive per kind.
    pub fn set_command_handler(
        &mut self,
        handler: impl Handler + 'static,
    ) -> Result<(), RegistrationError> {
        self.command
            .set_custom(InteractionKind::ApplicationCommand, Box::new(handler))
    }

    /// Install a custom handler for all message component interactions.
    pub fn set_component_handler(
        &mut self,
        handler: impl Handler + 'static,
    ) -> Result<(), RegistrationError> {
        self.component
            .set_custom(InteractionKind::MessageComponent, Box::new(handler))
    }

    /// Install a custom handler for all autocomplete interactions.
    pub fn set_autocomplete_handler(
        &mut self,
        handler: impl Handler + 'static,
    ) -> Result<(), RegistrationError> {
        self.autocomplete
            .set_custom(InteractionKind::Autocomplete, Box::new(handler))
    }

    /// Install a custom handler for all modal submit interactions.
    pub fn set_modal_handler(
        &mut self,
        handler: impl Handler + 'static,
    ) -> Result<(), RegistrationError> {
        self.modal
            .set_custom(InteractionKind::ModalSubmit, Box::new(handler))
    }

    /// Register a handler for application command interactions with the
    /// given command name.
    pub fn register_command(
        &mut self,
        name: impl Into<String>,
        handler: impl Handler + 'static,
    ) -> Result<(), RegistrationError> {
        self.command
            .routed_mut(InteractionKind::ApplicationCommand)?
            .register(name, handler)
    }

    /// Register a handler function for application command interactions
    /// with the given command name.
    pub fn register_command_fn<F, Fut>(
        &mut self,
        name: impl Into<String>,
        f: F,
    ) -> Result<(), RegistrationError>
    where
        F: Fn(InvocationContext, Interaction) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.register_command(name, handler_fn(f))
    }

    /// Register a handler for message component interactions with the
    /// given custom identifier.
    pub fn register_component(
        &mut self,
        custom_id: impl Into<String>,
        handler: impl Handler + 'static,
    ) -> Result<(), RegistrationError> {
        self.component
            .routed_mut(InteractionKind::MessageComponent)?
            .register(custom_id, handler)
    }

    /// Register a handler function for message component interactions with
    /// the given custom identifier.
    pub fn register_component_fn<F, Fut>(
        &mut self,
        custom_id: impl Into<String>,
        f: F,
    ) -> Result<(), RegistrationError>
    where
        F: Fn(InvocationContext, Interaction) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.register_component(custom_id, handler_fn(f))
    }

    /// Register a handler for autocomplete interactions with the given
    /// command name.
    pub fn register_autocomplete(
        &mut self,
        name: impl Into<String>,
        handler: impl Handler + 'static,
    ) -> Result<(), RegistrationError> {
        self.autocomplete
            .routed_mut(InteractionKind::Autocomplete)?
            .register(name, handler)
    }

    /// Register a handler function for autocomplete interactions with the
    /// given command name.
    pub fn register_autocomplete_fn<F, Fut>(
        &mut self,
        name: impl Into<String>,
        f: F,
    ) -> Result<(), RegistrationError>
    where
        F: Fn(InvocationContext, Interaction) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.register_autocomplete(name, handler_fn(f))
    }

    /// Register a handler for modal submit interactions with the given
    /// custom identifier.
    pub fn register_modal(
        &mut self,
        custom_id: impl Into<String>,
        handler: impl Handler + 'static,
    ) -> Result<(), RegistrationError> {
        self.modal
            .routed_mut(InteractionKind::ModalSubmit)?
            .register(custom_id, handler)
    }

    /// Register a handler function for modal submit interactions with the
    /// given custom identifier.
    pub fn register_modal_fn<F, Fut>(
        &mut self,
        custom_id: impl Into<String>,
        f: F,
    ) -> Result<(), RegistrationError>
    where
        F: Fn(InvocationContext, Interaction) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.register_modal(custom_id, handler_fn(f))
    }
}

#[async_trait]
impl Handler for Mux {
    /// Forward the interaction to the slot for its kind.
    ///
    /// # Panics
    ///
    /// Panics if the matching slot (other than ping) is unconfigured, or if
    /// the interaction kind is unknown.
    async fn handle(&self, cx: InvocationContext, interaction: Interaction) -> HandlerResult {
        let kind = interaction.kind;
        match kind {
            InteractionKind::Ping => match &self.ping {
                Some(handler) => handler.handle(cx, interaction).await,
                None => Ok(InteractionResponse::pong()),
            },
            InteractionKind::ApplicationCommand => {
                self.command.dispatch(kind, cx, interaction).await
            }
            InteractionKind::MessageComponent => {
                self.component.dispatch(kind, cx, interaction).await
            }
            InteractionKind::Autocomplete => {
                self.autocomplete.dispatch(kind, cx, interaction).await
            }
            InteractionKind::ModalSubmit => self.modal.dispatch(kind, cx, interaction).await,
            InteractionKind::Unknown(_) => {
                panic!("asked to handle interaction of unknown kind {kind}")
            }
        }
    }
}
