use std::collections::BTreeMap;
use std::sync::mpsc;
use std::thread;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RougeError};
use crate::metric::Metric;
use crate::score::Stat;
use crate::sentences::{split_sentences, word_count};

/// Number of chunks per CPU when averaging a corpus in parallel.
const CHUNK_FACTOR: usize = 8;

/// Default cap on the tokens of a single sentence.
pub const DEFAULT_MAX_SENTENCE_TOKENS: usize = 1000;

/// Selected stats of one metric, keyed by stat.
pub type StatMap = BTreeMap<Stat, f64>;

/// Per-metric stat maps averaged over a corpus.
pub type AverageScores = BTreeMap<Metric, StatMap>;

/// User-facing evaluator configuration.
///
/// Metric and stat names are kept as strings so that a configuration can be
/// read from any serde source and validated in one place by [`Rouge::new`].
///
/// # Defaults
/// - `metrics`: `rouge-1`, `rouge-2`, `rouge-l`
/// - `stats`: `r`, `p`, `f`
/// - `return_lengths`: `false`
/// - `raw_results`: `false`
/// - `exclusive`: `true`
/// - `max_sentence_tokens`: [`DEFAULT_MAX_SENTENCE_TOKENS`]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct RougeConfig {
	/// Metrics to compute, by name.
	pub metrics: Vec<String>,

	/// Stats to report in scored mode. Ignored when `raw_results` is set.
	pub stats: Vec<String>,

	/// Whether per-pair results also report the word count of each side.
	pub return_lengths: bool,

	/// Report `hyp`, `ref` and `overlap` counts instead of `p`, `r`, `f`.
	pub raw_results: bool,

	/// Insertion mode of the n-gram containers.
	pub exclusive: bool,

	/// Longest sentence accepted, in whitespace tokens. The LCS table of two
	/// sentences grows with the product of their lengths.
	pub max_sentence_tokens: usize,
}

impl Default for RougeConfig {
	fn default() -> Self {
		Self {
			metrics: Metric::ALL.iter().map(|m| m.name().to_owned()).collect(),
			stats: Stat::DEFAULT.iter().map(|s| s.as_str().to_owned()).collect(),
			return_lengths: false,
			raw_results: false,
			exclusive: true,
			max_sentence_tokens: DEFAULT_MAX_SENTENCE_TOKENS,
		}
	}
}

/// Word counts of one hypothesis/reference pair.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Lengths {
	pub hyp: usize,
	#[serde(rename = "ref")]
	pub reference: usize,
}

/// Scores of one hypothesis/reference pair.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PairScores {
	/// Selected stats for every configured metric.
	#[serde(flatten)]
	pub metrics: BTreeMap<Metric, StatMap>,

	/// Present only when `return_lengths` is configured.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub lengths: Option<Lengths>,
}

/// Result of [`Rouge::get_scores`].
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum ScoresOutput {
	/// One entry per hypothesis/reference pair, in input order.
	PerPair(Vec<PairScores>),
	/// Arithmetic mean of every stat over the corpus.
	Average(AverageScores),
}

/// Corpus-level ROUGE evaluator.
///
/// # Responsibilities
/// - Validate a `RougeConfig` into typed metrics and stats
/// - Split texts into sentences and score every pair with every metric
/// - Average scores over a corpus, fanning pairs out across threads
///
/// # Invariants
/// - `metrics` and `stats` only hold supported values
/// - In raw mode `stats` is exactly `hyp`, `ref`, `overlap`
#[derive(Clone, Debug)]
pub struct Rouge {
	config: RougeConfig,
	metrics: Vec<Metric>,
	stats: Vec<Stat>,
}

impl Default for Rouge {
	fn default() -> Self {
		Self {
			config: RougeConfig::default(),
			metrics: Metric::ALL.to_vec(),
			stats: Stat::DEFAULT.to_vec(),
		}
	}
}

impl Rouge {
	/// Creates an evaluator from a configuration.
	///
	/// # Errors
	/// - `RougeError::UnknownMetric` if a metric name is not supported.
	/// - `RougeError::UnknownStat` if a stat is not one of `p`, `r`, `f`
	///   (only checked when `raw_results` is not set).
	pub fn new(config: RougeConfig) -> Result<Self> {
		let metrics = config
			.metrics
			.iter()
			.map(|name| name.parse::<Metric>())
			.collect::<Result<Vec<_>>>()?;

		let stats = if config.raw_results {
			Stat::RAW.to_vec()
		} else {
			config
				.stats
				.iter()
				.map(|name| match name.parse::<Stat>() {
					Ok(stat) if !stat.is_raw() => Ok(stat),
					_ => Err(RougeError::UnknownStat(name.to_owned())),
				})
				.collect::<Result<Vec<_>>>()?
		};

		Ok(Self { config, metrics, stats })
	}

	/// Returns the configuration this evaluator was built from.
	pub fn config(&self) -> &RougeConfig {
		&self.config
	}

	pub fn metrics(&self) -> &[Metric] {
		&self.metrics
	}

	pub fn stats(&self) -> &[Stat] {
		&self.stats
	}

	/// Scores every hypothesis against the reference at the same index.
	///
	/// # Parameters
	/// - `hyps`, `refs`: raw texts, split into sentences on `'.'`.
	/// - `avg`: return the corpus average instead of per-pair scores.
	/// - `ignore_empty`: drop pairs where either text has no sentence.
	///
	/// # Errors
	/// - `RougeError::LengthMismatch` if the inputs differ in length.
	/// - A validation error if a kept pair has an empty side.
	pub fn get_scores<H, R>(&self, hyps: &[H], refs: &[R], avg: bool, ignore_empty: bool) -> Result<ScoresOutput>
	where
		H: AsRef<str>,
		R: AsRef<str>,
	{
		if hyps.len() != refs.len() {
			return Err(RougeError::LengthMismatch { hyps: hyps.len(), refs: refs.len() });
		}

		let mut pairs: Vec<(&str, &str)> = hyps.iter().map(AsRef::as_ref).zip(refs.iter().map(AsRef::as_ref)).collect();
		if ignore_empty {
			let total = pairs.len();
			pairs.retain(|(hyp, reference)| !split_sentences(hyp).is_empty() && !split_sentences(reference).is_empty());
			if pairs.len() < total {
				info!("ignoring {} empty pair(s) out of {}", total - pairs.len(), total);
			}
		}

		if avg {
			Ok(ScoresOutput::Average(self.average_scores(&pairs)?))
		} else {
			let scores = pairs
				.iter()
				.map(|(hyp, reference)| self.score_pair(hyp, reference))
				.collect::<Result<Vec<_>>>()?;
			Ok(ScoresOutput::PerPair(scores))
		}
	}

	/// Scores one hypothesis text against one reference text.
	///
	/// # Errors
	/// - A validation error if either text has no sentence.
	/// - `RougeError::SentenceTooLong` if a sentence exceeds
	///   `max_sentence_tokens`, before any metric runs.
	pub fn score_pair(&self, hyp: &str, reference: &str) -> Result<PairScores> {
		let hyp_sentences = split_sentences(hyp);
		let ref_sentences = split_sentences(reference);
		self.check_sentence_lengths(&hyp_sentences)?;
		self.check_sentence_lengths(&ref_sentences)?;

		let mut metrics = BTreeMap::new();
		for metric in &self.metrics {
			let scores = metric.score(&hyp_sentences, &ref_sentences, self.config.raw_results, self.config.exclusive)?;
			let selected: StatMap = self
				.stats
				.iter()
				.filter_map(|stat| scores.get(*stat).map(|value| (*stat, value)))
				.collect();
			metrics.insert(*metric, selected);
		}

		let lengths = self.config.return_lengths.then(|| Lengths {
			hyp: word_count(&hyp_sentences),
			reference: word_count(&ref_sentences),
		});

		Ok(PairScores { metrics, lengths })
	}

	fn check_sentence_lengths(&self, sentences: &[&str]) -> Result<()> {
		let max = self.config.max_sentence_tokens;
		for sentence in sentences {
			let tokens = sentence.split_whitespace().count();
			if tokens > max {
				return Err(RougeError::SentenceTooLong { tokens, max });
			}
		}
		Ok(())
	}

	/// Sums the selected stats of every pair of `chunk`.
	fn sum_chunk(&self, chunk: &[(&str, &str)]) -> Result<AverageScores> {
		let mut sums = self.zero_scores();
		for (hyp, reference) in chunk {
			let pair = self.score_pair(hyp, reference)?;
			for (metric, stats) in pair.metrics {
				let metric_sums = sums.entry(metric).or_default();
				for (stat, value) in stats {
					*metric_sums.entry(stat).or_insert(0.0) += value;
				}
			}
		}
		Ok(sums)
	}

	/// Every configured metric and stat, set to zero.
	fn zero_scores(&self) -> AverageScores {
		self.metrics
			.iter()
			.map(|metric| (*metric, self.stats.iter().map(|stat| (*stat, 0.0)).collect()))
			.collect()
	}

	/// Averages the selected stats over `pairs`.
	///
	/// # Behavior
	/// - Splits pairs into chunks (based on CPU cores * factor).
	/// - Scores each chunk on its own scoped thread.
	/// - Merges the partial sums in chunk order, so results do not depend
	///   on thread scheduling.
	/// - An empty corpus averages to zero for every stat.
	fn average_scores(&self, pairs: &[(&str, &str)]) -> Result<AverageScores> {
		let mut totals = self.zero_scores();
		if pairs.is_empty() {
			return Ok(totals);
		}

		let chunks = num_cpus::get() * CHUNK_FACTOR;
		let chunk_size = pairs.len().div_ceil(chunks);
		debug!("averaging {} pair(s) in chunks of {}", pairs.len(), chunk_size);

		let mut partials: Vec<Option<Result<AverageScores>>> = Vec::new();
		thread::scope(|scope| {
			let (tx, rx) = mpsc::channel();
			for (index, chunk) in pairs.chunks(chunk_size).enumerate() {
				let tx = tx.clone();
				scope.spawn(move || {
					// The receiver outlives every worker of the scope
					let _ = tx.send((index, self.sum_chunk(chunk)));
				});
				partials.push(None);
			}
			drop(tx);

			for (index, partial) in rx.iter() {
				partials[index] = Some(partial);
			}
		});

		for partial in partials.into_iter().flatten() {
			for (metric, stats) in partial? {
				let metric_totals = totals.entry(metric).or_default();
				for (stat, value) in stats {
					*metric_totals.entry(stat).or_insert(0.0) += value;
				}
			}
		}

		let count = pairs.len() as f64;
		for stats in totals.values_mut() {
			for value in stats.values_mut() {
				*value /= count;
			}
		}
		Ok(totals)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn raw_config() -> RougeConfig {
		RougeConfig { raw_results: true, ..RougeConfig::default() }
	}

	#[test]
	fn test_default_config_is_valid() {
		let rouge = Rouge::new(RougeConfig::default()).unwrap();
		assert_eq!(rouge.metrics(), Metric::ALL);
		assert_eq!(rouge.stats(), Stat::DEFAULT);
		assert_eq!(rouge.metrics(), Rouge::default().metrics());
		assert!(rouge.config().exclusive);
	}

	#[test]
	fn test_unknown_metric_is_rejected() {
		let config = RougeConfig { metrics: vec!["rouge-1".into(), "rouge-w".into()], ..RougeConfig::default() };
		assert_eq!(Rouge::new(config).unwrap_err(), RougeError::UnknownMetric("rouge-w".into()));
	}

	#[test]
	fn test_unknown_stat_is_rejected() {
		let config = RougeConfig { stats: vec!["p".into(), "x".into()], ..RougeConfig::default() };
		assert_eq!(Rouge::new(config).unwrap_err(), RougeError::UnknownStat("x".into()));

		let config = RougeConfig { stats: vec!["overlap".into()], ..RougeConfig::default() };
		assert_eq!(Rouge::new(config).unwrap_err(), RougeError::UnknownStat("overlap".into()));
	}

	#[test]
	fn test_raw_results_override_stats() {
		let config = RougeConfig { stats: vec!["bogus".into()], ..raw_config() };
		let rouge = Rouge::new(config).unwrap();
		assert_eq!(rouge.stats(), Stat::RAW);
	}

	#[test]
	fn test_score_pair_selects_stats() {
		let config = RougeConfig { metrics: vec!["rouge-1".into()], stats: vec!["f".into()], ..RougeConfig::default() };
		let rouge = Rouge::new(config).unwrap();
		let pair = rouge.score_pair("a b c", "a b d").unwrap();

		let stats = &pair.metrics[&Metric::Rouge1];
		assert_eq!(stats.len(), 1);
		assert!((stats[&Stat::F] - 0.6667).abs() < 0.001);
		assert!(pair.lengths.is_none());
	}

	#[test]
	fn test_score_pair_lengths() {
		let config = RougeConfig { return_lengths: true, ..RougeConfig::default() };
		let rouge = Rouge::new(config).unwrap();
		let pair = rouge.score_pair("the cat sat. on the mat", "a cat").unwrap();
		assert_eq!(pair.lengths, Some(Lengths { hyp: 6, reference: 2 }));
	}

	#[test]
	fn test_score_pair_empty_text() {
		let rouge = Rouge::default();
		assert_eq!(rouge.score_pair(" . ", "a b").unwrap_err(), RougeError::EmptyHypothesis);
		assert_eq!(rouge.score_pair("a b", "").unwrap_err(), RougeError::EmptyReference);
	}

	#[test]
	fn test_long_sentence_is_rejected() {
		let config = RougeConfig { max_sentence_tokens: 4, ..RougeConfig::default() };
		let rouge = Rouge::new(config).unwrap();

		assert!(rouge.score_pair("a b c d", "a b. c d e").is_ok());
		assert_eq!(
			rouge.score_pair("a b c d e", "a b").unwrap_err(),
			RougeError::SentenceTooLong { tokens: 5, max: 4 }
		);
		assert_eq!(
			rouge.score_pair("a b", "a. b c d e f").unwrap_err(),
			RougeError::SentenceTooLong { tokens: 5, max: 4 }
		);
	}

	#[test]
	fn test_default_cap_rejects_huge_sentences() {
		// 40k x 40k tokens would need a table of several GB
		let text = vec!["word"; 40_000].join(" ");
		let err = Rouge::default().get_scores(&[text.as_str()], &[text.as_str()], false, false).unwrap_err();
		assert_eq!(err, RougeError::SentenceTooLong { tokens: 40_000, max: DEFAULT_MAX_SENTENCE_TOKENS });

		let err = Rouge::default().get_scores(&[text.as_str()], &[text.as_str()], true, false).unwrap_err();
		assert!(matches!(err, RougeError::SentenceTooLong { .. }));
	}

	#[test]
	fn test_get_scores_per_pair() {
		let rouge = Rouge::new(raw_config()).unwrap();
		let output = rouge.get_scores(&["a b c", "x y"], &["a b d", "x y"], false, false).unwrap();
		let ScoresOutput::PerPair(pairs) = output else {
			panic!("expected per-pair scores");
		};
		assert_eq!(pairs.len(), 2);
		assert_eq!(pairs[0].metrics[&Metric::Rouge1][&Stat::Overlap], 2.0);
		assert_eq!(pairs[1].metrics[&Metric::RougeL][&Stat::Overlap], 2.0);
	}

	#[test]
	fn test_get_scores_average() {
		let rouge = Rouge::new(raw_config()).unwrap();
		let output = rouge.get_scores(&["a b c", "x y"], &["a b d", "z"], true, false).unwrap();
		let ScoresOutput::Average(average) = output else {
			panic!("expected average scores");
		};
		let rouge_1 = &average[&Metric::Rouge1];
		assert!((rouge_1[&Stat::Hyp] - 2.5).abs() < 1e-9);
		assert!((rouge_1[&Stat::Ref] - 2.0).abs() < 1e-9);
		assert!((rouge_1[&Stat::Overlap] - 1.0).abs() < 1e-9);
	}

	#[test]
	fn test_average_matches_mean_of_pairs() {
		let rouge = Rouge::default();
		let hyps: Vec<String> = (0..50).map(|i| format!("the cat {} sat on mat {}", i % 3, i % 5)).collect();
		let refs: Vec<String> = (0..50).map(|i| format!("a cat {} sat. on the mat {}", i % 4, i % 2)).collect();

		let ScoresOutput::PerPair(pairs) = rouge.get_scores(&hyps, &refs, false, false).unwrap() else {
			panic!("expected per-pair scores");
		};
		let ScoresOutput::Average(average) = rouge.get_scores(&hyps, &refs, true, false).unwrap() else {
			panic!("expected average scores");
		};

		for metric in Metric::ALL {
			for stat in Stat::DEFAULT {
				let mean = pairs.iter().map(|pair| pair.metrics[&metric][&stat]).sum::<f64>() / pairs.len() as f64;
				assert!((average[&metric][&stat] - mean).abs() < 1e-9);
			}
		}
	}

	#[test]
	fn test_length_mismatch() {
		let rouge = Rouge::default();
		let err = rouge.get_scores(&["a"], &["a", "b"], false, false).unwrap_err();
		assert_eq!(err, RougeError::LengthMismatch { hyps: 1, refs: 2 });
	}

	#[test]
	fn test_ignore_empty() {
		let rouge = Rouge::default();
		let hyps = ["a b", "", "c d"];
		let refs = ["a b", "x", "..."];

		assert!(rouge.get_scores(&hyps, &refs, false, false).unwrap_err().is_validation());

		let ScoresOutput::PerPair(pairs) = rouge.get_scores(&hyps, &refs, false, true).unwrap() else {
			panic!("expected per-pair scores");
		};
		assert_eq!(pairs.len(), 1);
	}

	#[test]
	fn test_empty_corpus_average_is_zero() {
		let rouge = Rouge::default();
		let empty: [&str; 0] = [];
		let ScoresOutput::Average(average) = rouge.get_scores(&empty, &empty, true, false).unwrap() else {
			panic!("expected average scores");
		};
		assert_eq!(average.len(), 3);
		assert!(average.values().flat_map(|stats| stats.values()).all(|value| *value == 0.0));
	}

	#[test]
	fn test_average_propagates_errors() {
		let rouge = Rouge::default();
		let err = rouge.get_scores(&["a", "b", ""], &["a", "b", "c"], true, false).unwrap_err();
		assert_eq!(err, RougeError::EmptyHypothesis);
	}
}
