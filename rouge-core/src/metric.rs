use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RougeError};
use crate::extract::{split_into_words, word_ngrams};
use crate::ngrams::{Mode, Ngrams};
use crate::score::{Scores, score_counts};
use crate::union_lcs::union_lcs;

/// Supported ROUGE metrics.
///
/// # Variants
/// - `Rouge1`: unigram overlap (ROUGE-N with n = 1).
/// - `Rouge2`: bigram overlap (ROUGE-N with n = 2).
/// - `RougeL`: summary-level longest common subsequence (union-LCS).
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Metric {
	#[serde(rename = "rouge-1")]
	Rouge1,
	#[serde(rename = "rouge-2")]
	Rouge2,
	#[serde(rename = "rouge-l")]
	RougeL,
}

impl Metric {
	/// Every supported metric, in reporting order.
	pub const ALL: [Metric; 3] = [Metric::Rouge1, Metric::Rouge2, Metric::RougeL];

	pub fn name(&self) -> &'static str {
		match self {
			Metric::Rouge1 => "rouge-1",
			Metric::Rouge2 => "rouge-2",
			Metric::RougeL => "rouge-l",
		}
	}

	/// Scores one hypothesis against one reference, both given as sentences.
	///
	/// # Errors
	/// Returns a validation error if either sentence collection is empty.
	pub fn score<H, R>(&self, hypothesis: &[H], reference: &[R], raw_results: bool, exclusive: bool) -> Result<Scores>
	where
		H: AsRef<str>,
		R: AsRef<str>,
	{
		match self {
			Metric::Rouge1 => rouge_n(hypothesis, reference, 1, raw_results, exclusive),
			Metric::Rouge2 => rouge_n(hypothesis, reference, 2, raw_results, exclusive),
			Metric::RougeL => rouge_l_summary_level(hypothesis, reference, raw_results, exclusive),
		}
	}
}

impl fmt::Display for Metric {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for Metric {
	type Err = RougeError;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		match s {
			"rouge-1" => Ok(Metric::Rouge1),
			"rouge-2" => Ok(Metric::Rouge2),
			"rouge-l" => Ok(Metric::RougeL),
			_ => Err(RougeError::UnknownMetric(s.to_owned())),
		}
	}
}

fn check_inputs<H, R>(hypothesis: &[H], reference: &[R]) -> Result<()> {
	if hypothesis.is_empty() {
		return Err(RougeError::EmptyHypothesis);
	}
	if reference.is_empty() {
		return Err(RougeError::EmptyReference);
	}
	Ok(())
}

/// ROUGE-N between hypothesis and reference sentences.
///
/// Overlap is the number of distinct n-grams shared by both sides; the
/// evaluated and reference counts are the distinct n-grams of each side.
///
/// # Parameters
/// - `n`: n-gram order (>= 1).
/// - `raw_results`: return the counts instead of precision / recall / F1.
/// - `exclusive`: insertion mode of the n-gram containers.
///
/// # Errors
/// - `RougeError::EmptyHypothesis` / `RougeError::EmptyReference` on an empty collection.
/// - `RougeError::InvalidOrder` if `n == 0`.
pub fn rouge_n<H, R>(hypothesis: &[H], reference: &[R], n: usize, raw_results: bool, exclusive: bool) -> Result<Scores>
where
	H: AsRef<str>,
	R: AsRef<str>,
{
	check_inputs(hypothesis, reference)?;

	let mode = Mode::from_exclusive(exclusive);
	let evaluated_ngrams = word_ngrams(n, hypothesis, mode)?;
	let reference_ngrams = word_ngrams(n, reference, mode)?;
	let evaluated_count = evaluated_ngrams.len();
	let reference_count = reference_ngrams.len();
	let overlapping_count = evaluated_ngrams.intersection(&reference_ngrams).len();
	debug!("rouge-{n}: hyp={evaluated_count} ref={reference_count} overlap={overlapping_count}");

	if raw_results {
		Ok(Scores::raw(evaluated_count, reference_count, overlapping_count))
	} else {
		Ok(score_counts(evaluated_count, reference_count, overlapping_count))
	}
}

/// Summary-level ROUGE-L between hypothesis and reference sentences.
///
/// - `m`: distinct tokens over all reference sentences
/// - `n`: distinct tokens over all hypothesis sentences
/// - `llcs`: size of the union-LCS accumulated over every reference sentence
///
/// Precision is `llcs / n`, recall is `llcs / m`.
///
/// # Errors
/// Returns a validation error if either sentence collection is empty.
pub fn rouge_l_summary_level<H, R>(hypothesis: &[H], reference: &[R], raw_results: bool, exclusive: bool) -> Result<Scores>
where
	H: AsRef<str>,
	R: AsRef<str>,
{
	check_inputs(hypothesis, reference)?;

	let mode = Mode::from_exclusive(exclusive);
	let mut reference_tokens = Ngrams::new(mode);
	reference_tokens.batch_add(split_into_words(reference).into_iter().map(str::to_owned));
	let m = reference_tokens.len();

	let mut evaluated_tokens = Ngrams::new(mode);
	evaluated_tokens.batch_add(split_into_words(hypothesis).into_iter().map(str::to_owned));
	let n = evaluated_tokens.len();

	let llcs = union_lcs(hypothesis, reference)?.llcs();
	debug!("rouge-l: hyp={n} ref={m} overlap={llcs}");

	if raw_results {
		Ok(Scores::raw(n, m, llcs))
	} else {
		Ok(score_counts(n, m, llcs))
	}
}
