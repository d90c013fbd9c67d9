//! Handler contract for interaction processing.
//!
//! A [`Handler`] receives an invocation context and a parsed interaction and
//! produces a response or fails. Routers are handlers too, which is what lets
//! the dispatch tree compose: the gateway holds one handler, which is usually
//! a [`crate::Mux`] fanning out to application handlers underneath.

use std::collections::HashMap;
use std::future::Future;

use async_trait::async_trait;

use crate::interaction::{Interaction, InteractionResponse};

/// Result type produced by handlers.
///
/// Handler failures are application errors; the gateway propagates them to
/// the invocation caller unchanged.
pub type HandlerResult = anyhow::Result<InteractionResponse>;

/// Per-invocation metadata passed to handlers alongside the interaction.
#[derive(Debug, Clone, Default)]
pub struct InvocationContext {
    /// Value of the signature timestamp header, verbatim.
    pub timestamp: String,
    /// Transport headers as delivered by the hosting boundary.
    pub headers: HashMap<String, String>,
}

/// Handles and responds to a single interaction.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Process the interaction and produce a response.
    async fn handle(&self, cx: InvocationContext, interaction: Interaction) -> HandlerResult;
}

/// Adapter that lets a plain async function or closure act as a [`Handler`].
///
/// Construct it with [`handler_fn`].
pub struct HandlerFn<F>(F);

/// Wrap an async function as a [`Handler`].
///
/// ```no_run
/// use slashgate::{handler_fn, InteractionResponse};
///
/// let handler = handler_fn(|_cx, _interaction| async {
///     Ok(InteractionResponse::pong())
/// });
/// ```
pub fn handler_fn<F, Fut>(f: F) -> HandlerFn<F>
where
    F: Fn(InvocationContext, Interaction) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send,
{
    HandlerFn(f)
}

#[async_trait]
impl<F, Fut> Handler for HandlerFn<F>
where
    F: Fn(InvocationContext, Interaction) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send,
{
    async fn handle(&self, cx: InvocationContext, interaction: Interaction) -> HandlerResult {
        (self.0)(cx, interaction).await
    }
}
