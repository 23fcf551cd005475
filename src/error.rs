//! Error types for votum.
//!
//! [`ExtractError`] covers everything that can abort the extraction of a
//! single ballot. [`VotumError`] wraps it together with the configuration
//! and IO failures of the command line tool.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VotumError {
    #[error("Config error: {0}")]
    Config(String),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Reasons the extraction of a single ballot was aborted.
///
/// No variant is ever recovered from inside the extractor. A batch caller
/// logs the offending URL and moves on to the next record.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The page violates an assumption about its structure.
    #[error("unexpected page structure at {url}: {reason}")]
    Extraction { url: String, reason: String },

    /// The two similarity metrics picked different result headings.
    #[error(
        "inconclusive similarity evaluation for {title:?}: edit distance prefers {by_edit_distance:?}, token sort prefers {by_token_sort:?}"
    )]
    AmbiguousMatch {
        title: String,
        by_edit_distance: String,
        by_token_sort: String,
    },

    /// The results page has no candidate heading at all.
    #[error("no result block found for {title:?}")]
    NoMatch { title: String },

    #[error(transparent)]
    CantonCount(#[from] CantonCountError),

    #[error("server returned {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ExtractError {
    pub(crate) fn extraction(url: impl Into<String>, reason: impl Into<String>) -> Self {
        ExtractError::Extraction {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

/// A canton count token that is neither a decimal nor an `int/int` fraction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid canton count token {token:?} in {input:?}")]
pub struct CantonCountError {
    pub token: String,
    pub input: String,
}
