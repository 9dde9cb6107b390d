use log::trace;

use crate::error::{Result, RougeError};
use crate::extract::split_into_words;
use crate::lcs::reconstruct_ngrams;
use crate::ngrams::{Mode, Ngrams};

/// Running union of LCS tokens for summary-level ROUGE-L.
///
/// Each reference sentence is compared with every hypothesis sentence; the
/// reconstructed LCS tokens are merged into one running union so that a token
/// matched by several sentences is only counted once overall.
///
/// # Invariants
/// - The union is always exclusive: it records token coverage, not counts
/// - The union only grows, so `llcs() == increments().iter().sum()`
#[derive(Clone, Debug)]
pub struct UnionLcs {
	/// Tokens covered so far, across all processed references
	union: Ngrams<String>,

	/// New tokens contributed by each processed reference, in order
	increments: Vec<usize>,
}

impl Default for UnionLcs {
	fn default() -> Self {
		Self::new()
	}
}

impl UnionLcs {
	/// Creates an empty accumulator.
	pub fn new() -> Self {
		Self { union: Ngrams::new(Mode::Exclusive), increments: Vec::new() }
	}

	/// Merges the LCS of `reference_sentence` with every hypothesis sentence
	/// into the running union.
	///
	/// Returns the number of tokens this reference added to the union.
	///
	/// # Notes
	/// - Sentences without any token have an empty LCS and are skipped.
	///
	/// # Errors
	/// Returns `RougeError::EmptyHypothesis` if `hypothesis_sentences` is empty.
	pub fn add_reference<S: AsRef<str>>(&mut self, hypothesis_sentences: &[S], reference_sentence: &str) -> Result<usize> {
		if hypothesis_sentences.is_empty() {
			return Err(RougeError::EmptyHypothesis);
		}

		let reference_words = split_into_words(std::slice::from_ref(&reference_sentence));
		let mut reference_lcs = Vec::with_capacity(hypothesis_sentences.len());
		if !reference_words.is_empty() {
			for hypothesis_sentence in hypothesis_sentences {
				let hypothesis_words = split_into_words(std::slice::from_ref(hypothesis_sentence));
				if hypothesis_words.is_empty() {
					continue;
				}
				reference_lcs.push(reconstruct_ngrams(&reference_words, &hypothesis_words, Mode::Exclusive)?);
			}
		}

		let before = self.union.len();
		self.union = self.union.union(&reference_lcs);
		let increment = self.union.len() - before;
		trace!("union-lcs: reference {} added {} token(s), union size {}", self.increments.len(), increment, self.union.len());

		self.increments.push(increment);
		Ok(increment)
	}

	/// Total overlap accumulated so far (size of the union).
	pub fn llcs(&self) -> usize {
		self.union.len()
	}

	/// Per-reference increments, in processing order.
	pub fn increments(&self) -> &[usize] {
		&self.increments
	}

	/// Tokens covered so far.
	pub fn union(&self) -> &Ngrams<String> {
		&self.union
	}
}

/// Runs the union-LCS accumulation over all reference sentences, in order.
///
/// # Errors
/// Returns a validation error if either sentence collection is empty.
pub fn union_lcs<H, R>(hypothesis_sentences: &[H], reference_sentences: &[R]) -> Result<UnionLcs>
where
	H: AsRef<str>,
	R: AsRef<str>,
{
	if hypothesis_sentences.is_empty() {
		return Err(RougeError::EmptyHypothesis);
	}
	if reference_sentences.is_empty() {
		return Err(RougeError::EmptyReference);
	}

	let mut accumulator = UnionLcs::new();
	for reference_sentence in reference_sentences {
		accumulator.add_reference(hypothesis_sentences, reference_sentence.as_ref())?;
	}
	Ok(accumulator)
}
