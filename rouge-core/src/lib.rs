//! ROUGE overlap scoring library.
//!
//! This crate provides the scoring engine behind ROUGE-N and summary-level
//! ROUGE-L, including:
//! - N-gram multisets with exclusive (set) or inclusive (counted) insertion
//! - Sliding-window n-gram extraction over whitespace tokens
//! - Longest common subsequence tables and reconstruction
//! - Union-LCS accumulation across multi-sentence summaries
//! - Precision / recall / F1 formulas
//!
//! On top of the engine, [`rouge::Rouge`] evaluates whole corpora of
//! hypothesis/reference pairs, optionally averaging across pairs.

/// Error type shared by every fallible operation of the crate.
pub mod error;

/// N-gram multiset with a mode fixed at construction.
pub mod ngrams;

/// Sliding-window n-gram extraction.
pub mod extract;

/// Longest common subsequence table and reconstruction.
pub mod lcs;

/// Summary-level union-LCS accumulation.
pub mod union_lcs;

/// Score tuples and the precision / recall / F1 formulas.
pub mod score;

/// Closed set of supported metrics and the per-metric scoring functions.
///
/// `rouge_n` and `rouge_l_summary_level` are the pure entry points;
/// `Metric` dispatches to them by name.
pub mod metric;

/// Sentence splitting used by the evaluator.
pub mod sentences;

/// Corpus-level evaluator: configuration, per-pair and averaged scores.
pub mod rouge;

pub use error::{Result, RougeError};
pub use metric::{Metric, rouge_l_summary_level, rouge_n};
pub use ngrams::{Mode, Ngrams};
pub use rouge::{Rouge, RougeConfig, ScoresOutput};
pub use score::{Scores, Stat, score_counts};
