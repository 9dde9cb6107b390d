/// Sentence delimiter used by [`split_sentences`].
pub const SENTENCE_DELIMITER: char = '.';

/// Splits a text into trimmed, non-empty sentences.
///
/// The text is cut on every `'.'`; pieces that are empty after trimming
/// are dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
	text.split(SENTENCE_DELIMITER)
		.map(str::trim)
		.filter(|sentence| !sentence.is_empty())
		.collect()
}

/// Number of whitespace-separated words over all sentences.
pub fn word_count<S: AsRef<str>>(sentences: &[S]) -> usize {
	sentences
		.iter()
		.map(|sentence| sentence.as_ref().split_whitespace().count())
		.sum()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_split_sentences() {
		let sentences = split_sentences("The cat sat. It was happy.  Then it left");
		assert_eq!(sentences, vec!["The cat sat", "It was happy", "Then it left"]);
	}

	#[test]
	fn test_split_sentences_drops_empty_pieces() {
		assert_eq!(split_sentences("..a.. . b."), vec!["a", "b"]);
		assert!(split_sentences("").is_empty());
		assert!(split_sentences(" . ").is_empty());
	}

	#[test]
	fn test_word_count() {
		assert_eq!(word_count(&["the cat", "sat  on the mat"]), 6);
		assert_eq!(word_count::<&str>(&[]), 0);
	}
}
