//! Busy Bee Core Library
//!
//! Data model, search history and the request lifecycle controller for the
//! Busy Bee market-research assistant.

pub mod analysis;
pub mod config;
pub mod context;
pub mod controller;
pub mod error;
pub mod history;
pub mod provider;

pub use analysis::model::{AnalysisKind, AnalysisResult};
pub use config::Config;
pub use context::AppContext;
pub use controller::{Completion, RequestController};
pub use controller::state::{ErrorCategory, RequestState};
pub use error::{CoreError, CoreResult};
pub use history::{HistoryStore, SearchHistoryEntry};
pub use provider::AnalysisProvider;
