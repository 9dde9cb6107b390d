use thiserror::Error;

/// Errors returned by the scoring engine and the evaluator.
///
/// `EmptyHypothesis` and `EmptyReference` are the validation failures of a
/// scoring call: the call is aborted and no partial scores are produced.
/// Callers decide whether to skip the item or propagate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RougeError {
	#[error("hypothesis is empty")]
	EmptyHypothesis,

	#[error("reference is empty")]
	EmptyReference,

	/// An LCS operation received an empty token sequence.
	#[error("token sequence is empty")]
	EmptySequence,

	/// N-gram order must be at least 1.
	#[error("invalid n-gram order {0}, must be >= 1")]
	InvalidOrder(usize),

	#[error("unknown metric '{0}'")]
	UnknownMetric(String),

	#[error("unknown stat '{0}'")]
	UnknownStat(String),

	#[error("the number of hypotheses ({hyps}) and references ({refs}) must be equal")]
	LengthMismatch { hyps: usize, refs: usize },

	/// A sentence holds more tokens than the evaluator accepts.
	#[error("sentence has {tokens} tokens, at most {max} are accepted")]
	SentenceTooLong { tokens: usize, max: usize },
}

impl RougeError {
	/// Returns `true` for the empty-input failures raised by scoring calls.
	pub fn is_validation(&self) -> bool {
		matches!(self, RougeError::EmptyHypothesis | RougeError::EmptyReference)
	}
}

pub type Result<T> = std::result::Result<T, RougeError>;
