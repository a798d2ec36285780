//! Request lifecycle controller.
//!
//! Owns the single live analysis request. Every `submit` or `cancel` bumps a
//! generation counter; an outcome is published only if its generation is
//! still current, so a late answer to an abandoned request is dropped no
//! matter when it arrives.
//!
//! Lock order is always generation first, then state. Every transition is
//! published while the generation lock is held, so subscribers see them in
//! the order they happened.

pub mod state;

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use crate::analysis::contract::check_contract;
use crate::analysis::model::{AnalysisKind, AnalysisResult};
use crate::error::{CoreError, CoreResult};
use crate::history::{HistoryStore, SearchHistoryEntry};
use crate::provider::AnalysisProvider;
use state::{ErrorCategory, RequestState};

/// Buffered transitions per subscriber before it starts lagging.
const TRANSITION_CAPACITY: usize = 32;

/// What happened to the outcome of one `submit` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The outcome became the published state.
    Published,
    /// A later submit or a cancel superseded this request.
    Discarded,
}

/// Drives analysis requests and publishes their state.
pub struct RequestController {
    provider: Arc<dyn AnalysisProvider>,
    history: Mutex<HistoryStore>,
    generation: watch::Sender<u64>,
    state: watch::Sender<RequestState>,
    transitions: broadcast::Sender<RequestState>,
}

impl RequestController {
    pub fn new(provider: Arc<dyn AnalysisProvider>, history: HistoryStore) -> Self {
        let (generation, _) = watch::channel(0);
        let (state, _) = watch::channel(RequestState::Idle);
        let (transitions, _) = broadcast::channel(TRANSITION_CAPACITY);
        Self {
            provider,
            history: Mutex::new(history),
            generation,
            state,
            transitions,
        }
    }

    /// Snapshot of the published state.
    pub fn state(&self) -> RequestState {
        self.state.borrow().clone()
    }

    /// Receive every state transition from now on, in order. Drop the
    /// receiver to unsubscribe.
    pub fn subscribe(&self) -> broadcast::Receiver<RequestState> {
        self.transitions.subscribe()
    }

    /// Recent searches, most recent first.
    pub fn history(&self) -> Vec<SearchHistoryEntry> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries()
            .to_vec()
    }

    /// Current request generation.
    pub fn generation(&self) -> u64 {
        *self.generation.borrow()
    }

    /// Run an analysis, superseding whatever request was in flight.
    ///
    /// Returns once this request's outcome has been published or dropped.
    /// If another `submit` or a `cancel` happens meanwhile, the provider
    /// call is abandoned and [`Completion::Discarded`] is returned.
    pub async fn submit(&self, query: &str, kind: AnalysisKind) -> CoreResult<Completion> {
        let query = query.trim();
        if query.is_empty() {
            return Err(CoreError::EmptyQuery);
        }

        let generation = self.begin(query, kind);
        let generations = self.generation.subscribe();
        self.record_history(SearchHistoryEntry::new(query, kind));

        info!(kind = %kind, query = %query, generation, "Starting analysis");

        let outcome = tokio::select! {
            outcome = self.dispatch(kind, query) => outcome,
            _ = superseded(generations, generation) => {
                debug!(generation, "Request superseded before the provider answered");
                return Ok(Completion::Discarded);
            }
        };

        let next = match outcome {
            Ok(result) => {
                for violation in check_contract(&result) {
                    warn!(kind = %kind, generation, %violation, "Provider result deviates from contract");
                }
                RequestState::Success { kind, result }
            }
            Err(e) => {
                let detail = format!("{:#}", e);
                let category = ErrorCategory::classify(&detail);
                warn!(kind = %kind, generation, %category, error = %detail, "Analysis failed");
                RequestState::Failed {
                    category,
                    message: category.user_message().to_string(),
                }
            }
        };

        if self.publish_if_current(generation, next) {
            Ok(Completion::Published)
        } else {
            debug!(generation, "Dropping stale outcome");
            Ok(Completion::Discarded)
        }
    }

    /// Abandon the in-flight request and go back to idle.
    pub fn cancel(&self) {
        self.generation.send_modify(|current| {
            *current += 1;
            self.publish(RequestState::Idle);
            info!(generation = *current, "Analysis cancelled");
        });
    }

    fn begin(&self, query: &str, kind: AnalysisKind) -> u64 {
        let mut started = 0;
        self.generation.send_modify(|current| {
            *current += 1;
            started = *current;
            self.publish(RequestState::Loading {
                query: query.to_string(),
                kind,
            });
        });
        started
    }

    fn publish_if_current(&self, generation: u64, next: RequestState) -> bool {
        let current = self.generation.borrow();
        if *current != generation {
            return false;
        }
        debug!(generation, state = next.name(), "Publishing outcome");
        self.publish(next);
        true
    }

    /// Callers hold the generation lock.
    fn publish(&self, next: RequestState) {
        self.state.send_replace(next.clone());
        // No subscribers is fine.
        let _ = self.transitions.send(next);
    }

    fn record_history(&self, entry: SearchHistoryEntry) {
        let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
        let entries = history.record(entry);
        debug!(count = entries.len(), "Search history updated");
    }

    async fn dispatch(&self, kind: AnalysisKind, query: &str) -> anyhow::Result<AnalysisResult> {
        Ok(match kind {
            AnalysisKind::Product => AnalysisResult::Product(self.provider.analyze_product(query).await?),
            AnalysisKind::Shop => AnalysisResult::Shop(self.provider.analyze_shop(query).await?),
            AnalysisKind::Keyword => AnalysisResult::Keyword(self.provider.analyze_keyword(query).await?),
        })
    }
}

/// Resolves once the generation moves past `generation`.
async fn superseded(mut generations: watch::Receiver<u64>, generation: u64) {
    loop {
        let current = *generations.borrow_and_update();
        if current != generation {
            return;
        }
        if generations.changed().await.is_err() {
            return;
        }
    }
}

impl std::fmt::Debug for RequestController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestController")
            .field("generation", &*self.generation.borrow())
            .field("state", &self.state.borrow().name())
            .finish_non_exhaustive()
    }
}
