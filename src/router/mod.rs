//! Intent/state-keyed handler dispatch.
//!
//! A [`HandlerTable`] maps dispatch keys to either a handler or a redirect
//! to another key. The [`IntentRouter`] resolves the turn's key, follows
//! redirects with cycle detection, invokes the resolved handler, and awaits
//! its deferred result if it returned one — exactly one suspension point
//! per turn.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::conversation::Conversation;
use crate::error::{Result, RouterError, VoxhookError};

/// What a handler invocation produced: either it already ran to completion
/// synchronously, or it handed back a future the router must await. One
/// explicit branch instead of runtime type-sniffing.
pub enum HandlerOutcome<'a> {
    Immediate(Result<()>),
    Deferred(BoxFuture<'a, Result<()>>),
}

impl HandlerOutcome<'_> {
    pub fn done() -> Self {
        HandlerOutcome::Immediate(Ok(()))
    }
}

impl std::fmt::Debug for HandlerOutcome<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HandlerOutcome::Immediate(r) => f.debug_tuple("Immediate").field(r).finish(),
            HandlerOutcome::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

/// A dispatchable turn handler. Implement directly for stateful handlers,
/// or register plain closures through [`HandlerTable::insert_fn`] /
/// [`HandlerTable::insert_async`].
pub trait TurnHandler: Send + Sync {
    fn call<'a>(&'a self, conv: &'a mut Conversation) -> HandlerOutcome<'a>;
}

/// Invoked when a handler fails; receives the turn and the failure. The
/// default (none registered) re-raises, which the façade turns into the
/// generic apology response.
pub trait TurnErrorHandler: Send + Sync {
    fn call<'a>(
        &'a self,
        conv: &'a mut Conversation,
        error: &'a VoxhookError,
    ) -> HandlerOutcome<'a>;
}

// Closure adapters. Synchronous closures have no lifetime in their return
// type, so ordinary inference works; async closures go through `insert_async`
// with an explicit boxed-future signature (fn items coerce cleanly).

struct SyncFn<F>(F);

impl<F> TurnHandler for SyncFn<F>
where
    F: Fn(&mut Conversation) -> Result<()> + Send + Sync,
{
    fn call<'a>(&'a self, conv: &'a mut Conversation) -> HandlerOutcome<'a> {
        HandlerOutcome::Immediate((self.0)(conv))
    }
}

struct AsyncFn<F>(F);

impl<F> TurnHandler for AsyncFn<F>
where
    F: for<'a> Fn(&'a mut Conversation) -> BoxFuture<'a, Result<()>> + Send + Sync,
{
    fn call<'a>(&'a self, conv: &'a mut Conversation) -> HandlerOutcome<'a> {
        HandlerOutcome::Deferred((self.0)(conv))
    }
}

struct SyncErrorFn<F>(F);

impl<F> TurnErrorHandler for SyncErrorFn<F>
where
    F: Fn(&mut Conversation, &VoxhookError) -> Result<()> + Send + Sync,
{
    fn call<'a>(
        &'a self,
        conv: &'a mut Conversation,
        error: &'a VoxhookError,
    ) -> HandlerOutcome<'a> {
        HandlerOutcome::Immediate((self.0)(conv, error))
    }
}

/// One table entry: dispatch directly, or redirect to another key.
#[derive(Clone)]
pub enum HandlerEntry {
    Direct(Arc<dyn TurnHandler>),
    Redirect(String),
}

impl std::fmt::Debug for HandlerEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HandlerEntry::Direct(_) => f.write_str("Direct(..)"),
            HandlerEntry::Redirect(key) => f.debug_tuple("Redirect").field(key).finish(),
        }
    }
}

// ── Handler table ─────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct HandlerTable {
    entries: HashMap<String, HandlerEntry>,
    fallback: Option<Arc<dyn TurnHandler>>,
    error_handler: Option<Arc<dyn TurnErrorHandler>>,
}

impl HandlerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a dispatch key.
    pub fn insert(&mut self, key: impl Into<String>, handler: impl TurnHandler + 'static) -> &mut Self {
        self.entries
            .insert(key.into(), HandlerEntry::Direct(Arc::new(handler)));
        self
    }

    /// Register a plain synchronous handler.
    pub fn insert_fn<F>(&mut self, key: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(&mut Conversation) -> Result<()> + Send + Sync + 'static,
    {
        self.insert(key, SyncFn(handler))
    }

    /// Register a deferred handler returning a boxed future. Plain `fn`
    /// items with an elided-lifetime `BoxFuture<'_, _>` return coerce here.
    pub fn insert_async<F>(&mut self, key: impl Into<String>, handler: F) -> &mut Self
    where
        F: for<'a> Fn(&'a mut Conversation) -> BoxFuture<'a, Result<()>> + Send + Sync + 'static,
    {
        self.insert(key, AsyncFn(handler))
    }

    /// Register a redirect: dispatching `key` re-resolves as `target`.
    pub fn redirect(&mut self, key: impl Into<String>, target: impl Into<String>) -> &mut Self {
        self.entries
            .insert(key.into(), HandlerEntry::Redirect(target.into()));
        self
    }

    /// Register a handler for a (state, intent) pair. Per-state tables
    /// collapse into flat composite keys, resolved ahead of the bare intent
    /// key when the turn carries that state.
    pub fn insert_for_state<F>(&mut self, state: &str, intent: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut Conversation) -> Result<()> + Send + Sync + 'static,
    {
        self.insert_fn(composite_key(state, intent), handler)
    }

    /// Single-function calling mode: one default handler receives every
    /// turn that matches no explicit entry.
    pub fn fallback(&mut self, handler: impl TurnHandler + 'static) -> &mut Self {
        self.fallback = Some(Arc::new(handler));
        self
    }

    pub fn fallback_fn<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(&mut Conversation) -> Result<()> + Send + Sync + 'static,
    {
        self.fallback(SyncFn(handler))
    }

    /// Register the error handler invoked on handler failure.
    pub fn on_error(&mut self, handler: impl TurnErrorHandler + 'static) -> &mut Self {
        self.error_handler = Some(Arc::new(handler));
        self
    }

    pub fn on_error_fn<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(&mut Conversation, &VoxhookError) -> Result<()> + Send + Sync + 'static,
    {
        self.on_error(SyncErrorFn(handler))
    }

    fn get(&self, key: &str) -> Option<&HandlerEntry> {
        self.entries.get(key)
    }

    /// Dispatch key for a turn: the (state, intent) composite when the turn
    /// carries a state with a registered composite entry, otherwise the
    /// bare intent.
    fn dispatch_key(&self, conv: &Conversation) -> String {
        if let Some(state) = conv.state() {
            let composite = composite_key(state, conv.intent());
            if self.entries.contains_key(&composite) {
                return composite;
            }
        }
        conv.intent().to_owned()
    }
}

fn composite_key(state: &str, intent: &str) -> String {
    format!("{state}::{intent}")
}

// ── Router ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterState {
    AwaitingDispatch,
    Redirected,
    Dispatched,
    TerminalError,
}

pub struct IntentRouter {
    state: RouterState,
}

impl IntentRouter {
    pub fn new() -> Self {
        Self {
            state: RouterState::AwaitingDispatch,
        }
    }

    pub fn state(&self) -> RouterState {
        self.state
    }

    /// Resolve and invoke the handler for this turn.
    ///
    /// Redirect chains are followed with a visited set; revisiting any key
    /// is a fatal configuration error, not a retryable condition. A missing
    /// handler is recoverable (`RouterError::NoHandler`) — the façade
    /// answers with the generic apology instead of propagating.
    pub async fn dispatch(&mut self, table: &HandlerTable, conv: &mut Conversation) -> Result<()> {
        let handler = match self.resolve(table, conv) {
            Ok(handler) => handler,
            Err(err) => {
                self.state = RouterState::TerminalError;
                return Err(err.into());
            }
        };

        self.state = RouterState::Dispatched;
        let result = match handler.call(conv) {
            HandlerOutcome::Immediate(result) => result,
            HandlerOutcome::Deferred(future) => future.await,
        };

        let Err(err) = result else {
            return Ok(());
        };
        tracing::warn!(intent = conv.intent(), error = %err, "handler failed");

        let Some(on_error) = table.error_handler.clone() else {
            self.state = RouterState::TerminalError;
            return Err(err);
        };
        match on_error.call(conv, &err) {
            HandlerOutcome::Immediate(result) => result,
            HandlerOutcome::Deferred(future) => future.await,
        }
    }

    fn resolve(
        &mut self,
        table: &HandlerTable,
        conv: &Conversation,
    ) -> std::result::Result<Arc<dyn TurnHandler>, RouterError> {
        let start = table.dispatch_key(conv);
        let mut visited: HashSet<String> = HashSet::new();
        let mut current = start;
        loop {
            if !visited.insert(current.clone()) {
                tracing::error!(key = %current, "circular handler redirect");
                return Err(RouterError::CircularRedirect(current));
            }
            match table.get(&current) {
                Some(HandlerEntry::Direct(handler)) => {
                    tracing::debug!(key = %current, "dispatching handler");
                    return Ok(handler.clone());
                }
                Some(HandlerEntry::Redirect(target)) => {
                    tracing::debug!(from = %current, to = %target, "following handler redirect");
                    self.state = RouterState::Redirected;
                    current = target.clone();
                }
                None => {
                    if let Some(fallback) = table.fallback.clone() {
                        tracing::debug!(key = %current, "no entry, using fallback handler");
                        return Ok(fallback);
                    }
                    return Err(RouterError::NoHandler(current));
                }
            }
        }
    }
}
