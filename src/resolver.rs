use tracing::debug;

use crate::error::ExtractError;
use crate::overrides::TitleRewrite;
use crate::similarity::{levenshtein_ratio, partial_token_sort_ratio};

/// Outcome of matching a bill title against the headings of a results page.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<T> {
    /// Both metrics agree on this candidate.
    Resolved(T),
    /// The metrics prefer different headings.
    Ambiguous {
        by_edit_distance: String,
        by_token_sort: String,
    },
    /// Nothing to choose from, or no candidate scored above zero.
    NoCandidates,
}

impl<T> Resolution<T> {
    /// Converts into a `Result`, naming `title` in the error.
    pub fn into_result(self, title: &str) -> Result<T, ExtractError> {
        match self {
            Resolution::Resolved(block) => Ok(block),
            Resolution::Ambiguous {
                by_edit_distance,
                by_token_sort,
            } => Err(ExtractError::AmbiguousMatch {
                title: title.to_string(),
                by_edit_distance,
                by_token_sort,
            }),
            Resolution::NoCandidates => Err(ExtractError::NoMatch {
                title: title.to_string(),
            }),
        }
    }
}

/// Running maximum of one similarity metric.
struct Best<S> {
    score: S,
    text: String,
}

/// Picks the result heading matching a bill title.
///
/// Results are published per voting day, so one page lists several bills.
/// Headings rarely match the chronology title exactly. Two metrics are
/// tracked independently; when their favourites differ the title is reported
/// as ambiguous instead of guessing.
pub struct TitleResolver<'a> {
    rewrites: &'a [TitleRewrite],
}

impl<'a> TitleResolver<'a> {
    pub fn new(rewrites: &'a [TitleRewrite]) -> Self {
        Self { rewrites }
    }

    /// Applies the known renamings case-sensitively, then lowercases.
    pub fn normalize_target(&self, title: &str) -> String {
        let rewritten = self
            .rewrites
            .iter()
            .fold(title.to_string(), |acc, rewrite| {
                acc.replace(&rewrite.from, &rewrite.to)
            });
        normalize_heading(&rewritten)
    }

    /// Scans `candidates` (display text, block) in order and resolves `target`.
    pub fn resolve<T, I>(&self, candidates: I, target: &str) -> Resolution<T>
    where
        I: IntoIterator<Item = (String, T)>,
    {
        let target = self.normalize_target(target);

        let mut by_edit_distance = Best {
            score: 0.0_f64,
            text: String::new(),
        };
        let mut by_token_sort = Best {
            score: 0_u8,
            text: String::new(),
        };
        let mut best: Option<T> = None;

        for (display, block) in candidates {
            let text = normalize_heading(&display);
            let edit = levenshtein_ratio(&target, &text);
            let tokens = partial_token_sort_ratio(&target, &text);
            debug!(heading = %text, edit, tokens, "scored result heading");

            let beats_edit = edit > by_edit_distance.score;
            let beats_tokens = tokens > by_token_sort.score;
            if beats_edit {
                by_edit_distance = Best {
                    score: edit,
                    text: text.clone(),
                };
            }
            if beats_tokens {
                by_token_sort = Best {
                    score: tokens,
                    text,
                };
            }
            if beats_edit && beats_tokens {
                best = Some(block);
            }
        }

        if by_edit_distance.text != by_token_sort.text {
            return Resolution::Ambiguous {
                by_edit_distance: by_edit_distance.text,
                by_token_sort: by_token_sort.text,
            };
        }
        match best {
            Some(block) => Resolution::Resolved(block),
            None => Resolution::NoCandidates,
        }
    }
}

/// Lowercases and joins lines with a single space.
fn normalize_heading(text: &str) -> String {
    text.lines()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
