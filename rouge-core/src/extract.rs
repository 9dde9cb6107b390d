use crate::error::{Result, RougeError};
use crate::ngrams::{Mode, Ngrams};

/// Separator used to join the tokens of an n-gram into a single key.
pub const NGRAM_SEPARATOR: &str = " ";

/// Flattens sentences into one token sequence.
///
/// Each sentence is split on whitespace and the words are concatenated in
/// sentence order. No normalization is performed.
pub fn split_into_words<S: AsRef<str>>(sentences: &[S]) -> Vec<&str> {
	sentences
		.iter()
		.flat_map(|sentence| sentence.as_ref().split_whitespace())
		.collect()
}

/// Builds the n-grams of a token sequence.
///
/// Slides a window of size `n` with stride 1 and joins each window with
/// [`NGRAM_SEPARATOR`].
///
/// # Notes
/// - Returns an empty container when the sequence is shorter than `n`.
///
/// # Errors
/// Returns `RougeError::InvalidOrder` if `n == 0`.
pub fn ngrams<T: AsRef<str>>(n: usize, tokens: &[T], mode: Mode) -> Result<Ngrams<String>> {
	if n == 0 {
		return Err(RougeError::InvalidOrder(n));
	}

	let mut ngrams = Ngrams::new(mode);
	if tokens.len() < n {
		// Sequence too short, no n-grams to compute
		return Ok(ngrams);
	}

	for window in tokens.windows(n) {
		let key = window
			.iter()
			.map(AsRef::as_ref)
			.collect::<Vec<&str>>()
			.join(NGRAM_SEPARATOR);
		ngrams.add(key);
	}
	Ok(ngrams)
}

/// Builds the word n-grams of a list of sentences.
///
/// Equivalent to `ngrams(n, &split_into_words(sentences), mode)`: windows
/// cross sentence boundaries.
pub fn word_ngrams<S: AsRef<str>>(n: usize, sentences: &[S], mode: Mode) -> Result<Ngrams<String>> {
	let words = split_into_words(sentences);
	ngrams(n, &words, mode)
}
