//! Published request state and failure classification.

use std::fmt;

use crate::analysis::model::{AnalysisKind, AnalysisResult};

/// What the controller currently shows to observers.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestState {
    #[default]
    Idle,
    Loading {
        query: String,
        kind: AnalysisKind,
    },
    Success {
        kind: AnalysisKind,
        result: AnalysisResult,
    },
    Failed {
        category: ErrorCategory,
        message: String,
    },
}

impl RequestState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    /// The result, if the last request succeeded.
    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            Self::Success { result, .. } => Some(result),
            _ => None,
        }
    }

    /// Short lowercase name, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading { .. } => "loading",
            Self::Success { .. } => "success",
            Self::Failed { .. } => "failed",
        }
    }
}

/// User-facing failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The provider answered with something that is not the expected JSON.
    MalformedResponse,
    /// Missing or rejected credentials.
    Configuration,
    /// Network trouble, rate limiting, anything else.
    Generic,
}

impl ErrorCategory {
    /// Classify a provider failure by its message text.
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("json") {
            Self::MalformedResponse
        } else if lower.contains("api key") || lower.contains("authorization") {
            Self::Configuration
        } else {
            Self::Generic
        }
    }

    /// Message shown to the user for this category.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MalformedResponse => {
                "Failed to parse the data from the AI. The response might be malformed."
            }
            Self::Configuration => {
                "There seems to be an issue with the API configuration. Please contact support."
            }
            Self::Generic => {
                "Failed to fetch analysis. The AI might be busy, or a network error occurred."
            }
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MalformedResponse => "malformed_response",
            Self::Configuration => "configuration",
            Self::Generic => "generic",
        };
        f.write_str(name)
    }
}
