use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RougeError;

/// Smoothing term of the F1 denominator, keeps `0 / 0` out of the formula.
pub const F1_EPSILON: f64 = 1e-8;

/// Name of a single value in a score mapping.
///
/// `P`, `R` and `F` are produced in scored mode; `Hyp`, `Ref` and `Overlap`
/// in raw mode.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Stat {
	P,
	R,
	F,
	Hyp,
	Ref,
	Overlap,
}

impl Stat {
	/// Stats reported by default in scored mode.
	pub const DEFAULT: [Stat; 3] = [Stat::R, Stat::P, Stat::F];

	/// Stats reported in raw mode.
	pub const RAW: [Stat; 3] = [Stat::Hyp, Stat::Ref, Stat::Overlap];

	pub fn as_str(&self) -> &'static str {
		match self {
			Stat::P => "p",
			Stat::R => "r",
			Stat::F => "f",
			Stat::Hyp => "hyp",
			Stat::Ref => "ref",
			Stat::Overlap => "overlap",
		}
	}

	/// Whether the stat belongs to the raw-count shape.
	pub fn is_raw(&self) -> bool {
		matches!(self, Stat::Hyp | Stat::Ref | Stat::Overlap)
	}
}

impl fmt::Display for Stat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Stat {
	type Err = RougeError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"p" => Ok(Stat::P),
			"r" => Ok(Stat::R),
			"f" => Ok(Stat::F),
			"hyp" => Ok(Stat::Hyp),
			"ref" => Ok(Stat::Ref),
			"overlap" => Ok(Stat::Overlap),
			_ => Err(RougeError::UnknownStat(s.to_owned())),
		}
	}
}

/// Result of one metric on one hypothesis/reference pair.
///
/// Exactly one shape is produced per call, chosen by the raw flag.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(untagged)]
pub enum Scores {
	Prf {
		#[serde(rename = "p")]
		precision: f64,
		#[serde(rename = "r")]
		recall: f64,
		#[serde(rename = "f")]
		f1: f64,
	},
	Raw {
		hyp: usize,
		#[serde(rename = "ref")]
		reference: usize,
		overlap: usize,
	},
}

impl Scores {
	/// Wraps the three counts without computing any ratio.
	pub fn raw(hyp: usize, reference: usize, overlap: usize) -> Self {
		Scores::Raw { hyp, reference, overlap }
	}

	/// Returns the value of `stat`, or `None` if it belongs to the other shape.
	pub fn get(&self, stat: Stat) -> Option<f64> {
		match (self, stat) {
			(Scores::Prf { precision, .. }, Stat::P) => Some(*precision),
			(Scores::Prf { recall, .. }, Stat::R) => Some(*recall),
			(Scores::Prf { f1, .. }, Stat::F) => Some(*f1),
			(Scores::Raw { hyp, .. }, Stat::Hyp) => Some(*hyp as f64),
			(Scores::Raw { reference, .. }, Stat::Ref) => Some(*reference as f64),
			(Scores::Raw { overlap, .. }, Stat::Overlap) => Some(*overlap as f64),
			_ => None,
		}
	}

	/// Stats available in this shape.
	pub fn stats(&self) -> [Stat; 3] {
		match self {
			Scores::Prf { .. } => [Stat::P, Stat::R, Stat::F],
			Scores::Raw { .. } => Stat::RAW,
		}
	}

	/// Converts to a `stat name -> value` mapping.
	pub fn to_map(&self) -> BTreeMap<String, f64> {
		self.stats()
			.iter()
			.filter_map(|stat| self.get(*stat).map(|value| (stat.as_str().to_owned(), value)))
			.collect()
	}
}

/// Computes precision, recall and F1 from overlap counts.
///
/// - `precision = overlap / evaluated` (0 when `evaluated == 0`)
/// - `recall = overlap / reference` (0 when `reference == 0`)
/// - `f1 = 2 * p * r / (p + r + F1_EPSILON)`
///
/// The result is always finite.
pub fn score_counts(evaluated_count: usize, reference_count: usize, overlapping_count: usize) -> Scores {
	let precision = if evaluated_count == 0 {
		0.0
	} else {
		overlapping_count as f64 / evaluated_count as f64
	};

	let recall = if reference_count == 0 {
		0.0
	} else {
		overlapping_count as f64 / reference_count as f64
	};

	let f1 = 2.0 * ((precision * recall) / (precision + recall + F1_EPSILON));
	Scores::Prf { precision, recall, f1 }
}
