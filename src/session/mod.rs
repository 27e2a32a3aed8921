//! Request orchestration
//!
//! [`AutocompleteSession`] is the stateful lifecycle a UI binds to: it
//! receives raw keystroke text, debounces it, runs the bound suggestion
//! source, and reconciles overlapping in-flight requests so a stale
//! response never overwrites a newer one.
//!
//! Every keystroke mints a fresh generation token from a monotonic
//! counter. The token is re-checked when the debounce timer wakes (a
//! superseded keystroke fires zero network calls) and again when the
//! response arrives (a superseded response is discarded unconditionally).
//! In-flight requests are never aborted; wasted calls are tolerated in
//! exchange for not needing cancellation primitives. At most one outcome
//! is ever observable per generation, and it is always the outcome of the
//! most recently issued query.

use crate::config::DEFAULT_DEBOUNCE_MS;
use crate::error::SuggestError;
use crate::network::HttpClient;
use crate::providers::Provider;
use crate::suggestions::{LocationSuggestion, ProviderConfig};
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Where a session gets its suggestions from.
#[async_trait]
pub trait SuggestionSource: Send + Sync {
    async fn fetch(&self, query: &str) -> Result<Vec<LocationSuggestion>, SuggestError>;
}

/// A provider bound to an HTTP client and call-time config.
pub struct ProviderSource {
    provider: Arc<dyn Provider>,
    client: HttpClient,
    config: ProviderConfig,
}

impl ProviderSource {
    pub fn new(provider: Arc<dyn Provider>, client: HttpClient, config: ProviderConfig) -> Self {
        Self {
            provider,
            client,
            config,
        }
    }
}

#[async_trait]
impl SuggestionSource for ProviderSource {
    async fn fetch(&self, query: &str) -> Result<Vec<LocationSuggestion>, SuggestError> {
        self.provider.suggest(&self.client, query, &self.config).await
    }
}

/// Closure adapter, mainly for stubs and custom backends.
pub struct SourceFn {
    inner: Box<
        dyn Fn(String) -> BoxFuture<'static, Result<Vec<LocationSuggestion>, SuggestError>>
            + Send
            + Sync,
    >,
}

impl SourceFn {
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<LocationSuggestion>, SuggestError>> + Send + 'static,
    {
        Self {
            inner: Box::new(move |query| Box::pin(f(query))),
        }
    }
}

#[async_trait]
impl SuggestionSource for SourceFn {
    async fn fetch(&self, query: &str) -> Result<Vec<LocationSuggestion>, SuggestError> {
        (self.inner)(query.to_string()).await
    }
}

/// Lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing shown.
    Idle,
    /// A keystroke arrived; waiting for input to settle.
    Debouncing,
    /// Settled input triggered a provider call; awaiting the response.
    Loading,
    /// Settled with a non-empty list.
    Populated,
    /// Settled with zero results (also the fail-safe state after errors).
    Empty,
}

/// Observable session state. Replaced atomically on every transition;
/// suggestions are never mutated in place.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub phase: Phase,
    /// Whether the result surface is open. Opens on the first keystroke,
    /// before any data arrives.
    pub open: bool,
    /// The text the current generation was minted for.
    pub query: String,
    pub suggestions: Vec<LocationSuggestion>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            open: false,
            query: String::new(),
            suggestions: Vec::new(),
        }
    }
}

type SelectCallback = Box<dyn Fn(&LocationSuggestion) + Send + Sync>;
type ErrorCallback = Box<dyn Fn(&SuggestError) + Send + Sync>;

struct SessionInner {
    source: Arc<dyn SuggestionSource>,
    debounce: Duration,
    generation: AtomicU64,
    state: watch::Sender<SessionState>,
    on_select: Option<SelectCallback>,
    on_error: Option<ErrorCallback>,
}

/// Builder for [`AutocompleteSession`].
pub struct SessionBuilder {
    source: Arc<dyn SuggestionSource>,
    debounce_ms: u64,
    on_select: Option<SelectCallback>,
    on_error: Option<ErrorCallback>,
}

impl SessionBuilder {
    pub fn debounce_ms(mut self, ms: u64) -> Self {
        self.debounce_ms = ms;
        self
    }

    pub fn on_select<F>(mut self, f: F) -> Self
    where
        F: Fn(&LocationSuggestion) + Send + Sync + 'static,
    {
        self.on_select = Some(Box::new(f));
        self
    }

    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: Fn(&SuggestError) + Send + Sync + 'static,
    {
        self.on_error = Some(Box::new(f));
        self
    }

    pub fn build(self) -> AutocompleteSession {
        let (state, _) = watch::channel(SessionState::default());
        AutocompleteSession {
            inner: Arc::new(SessionInner {
                source: self.source,
                debounce: Duration::from_millis(self.debounce_ms),
                generation: AtomicU64::new(0),
                state,
                on_select: self.on_select,
                on_error: self.on_error,
            }),
        }
    }
}

/// One autocomplete widget's request lifecycle. Each session owns its own
/// generation counter; independent sessions share nothing.
///
/// Methods must be called within a tokio runtime: `input` spawns the
/// debounce task.
///
/// A session expects one driving thread, mirroring the UI event loop it
/// models. The generation check and the state publication are two steps,
/// so `input` calls racing in from other OS threads can transiently
/// publish a superseded result until the newer query resolves. Clone the
/// handle freely for observation (`subscribe`/`state`), but keep `input`,
/// `select` and `clear` on one thread.
#[derive(Clone)]
pub struct AutocompleteSession {
    inner: Arc<SessionInner>,
}

impl AutocompleteSession {
    pub fn builder(source: impl SuggestionSource + 'static) -> SessionBuilder {
        SessionBuilder {
            source: Arc::new(source),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            on_select: None,
            on_error: None,
        }
    }

    /// Convenience constructor with defaults.
    pub fn new(source: impl SuggestionSource + 'static) -> Self {
        Self::builder(source).build()
    }

    /// Feed one keystroke's worth of input.
    ///
    /// Opens the result surface immediately, mints a fresh generation and
    /// restarts the debounce. Empty input clears the session instead.
    pub fn input(&self, text: &str) {
        if text.is_empty() {
            self.clear();
            return;
        }

        let inner = self.inner.clone();
        let generation = inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let text = text.to_string();

        inner.state.send_modify(|s| {
            s.phase = Phase::Debouncing;
            s.open = true;
            s.query = text.clone();
        });

        tokio::spawn(async move {
            tokio::time::sleep(inner.debounce).await;

            // Superseded while waiting: fire no request at all.
            if inner.generation.load(Ordering::SeqCst) != generation {
                return;
            }

            inner.state.send_modify(|s| s.phase = Phase::Loading);
            debug!(query = %text, generation, "debounce settled, querying");

            let outcome = inner.source.fetch(&text).await;

            // Stale on arrival: discard unconditionally, no state change.
            if inner.generation.load(Ordering::SeqCst) != generation {
                debug!(query = %text, generation, "discarding stale response");
                return;
            }

            match outcome {
                Ok(suggestions) => {
                    inner.state.send_modify(|s| {
                        s.phase = if suggestions.is_empty() {
                            Phase::Empty
                        } else {
                            Phase::Populated
                        };
                        s.suggestions = suggestions;
                    });
                }
                Err(err) => {
                    warn!(query = %text, generation, error = %err, "query failed");
                    if let Some(on_error) = &inner.on_error {
                        on_error(&err);
                    }
                    // Fail-safe: never leave stale suggestions visible.
                    inner.state.send_modify(|s| {
                        s.phase = Phase::Empty;
                        s.suggestions = Vec::new();
                    });
                }
            }
        });
    }

    /// Commit a suggestion: fires `on_select`, writes the formatted
    /// address back as the query, returns to Idle and closes the surface.
    pub fn select(&self, suggestion: &LocationSuggestion) {
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(on_select) = &self.inner.on_select {
            on_select(suggestion);
        }
        let committed = suggestion.formatted_address.clone();
        self.inner.state.send_modify(|s| {
            s.phase = Phase::Idle;
            s.open = false;
            s.query = committed;
            s.suggestions = Vec::new();
        });
    }

    /// Reset to Idle and close the surface. Any in-flight work becomes
    /// stale and will be discarded on arrival.
    pub fn clear(&self) {
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        self.inner.state.send_modify(|s| {
            s.phase = Phase::Idle;
            s.open = false;
            s.query = String::new();
            s.suggestions = Vec::new();
        });
    }

    /// Watch state transitions.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }
}
