//! Suggested corrections and merging them into an entry list.
//!
//! Suggestions come from an external service and address entries by their
//! position in the unfiltered list. The operator reviews them in a
//! [`SuggestionReview`]; accepted ones are merged with [`merge`], which
//! produces a new entry list and reports what it had to skip.

mod merge;
mod review;
mod suggestion;

pub use merge::{merge, MergeOutcome, MergeReport, SkipReason, SkippedSuggestion};
pub use review::{ReviewCounts, ReviewItem, ReviewStatus, SuggestionReview};
pub use suggestion::Suggestion;
