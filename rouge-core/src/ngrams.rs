use std::collections::HashMap;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// Insertion mode of an [`Ngrams`] container.
///
/// # Variants
/// - `Exclusive`: every insert clamps the count to 1 (set semantics).
/// - `Inclusive`: every insert increments the count (multiset semantics).
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
	Exclusive,
	Inclusive,
}

impl Mode {
	/// Maps the boolean `exclusive` flag used throughout the scoring API.
	pub fn from_exclusive(exclusive: bool) -> Self {
		if exclusive { Mode::Exclusive } else { Mode::Inclusive }
	}
}

/// A collection of n-gram keys with occurrence counts.
///
/// The mode is chosen once at construction and never changes.
///
/// # Responsibilities
/// - Record occurrences according to the mode
/// - Report the number of distinct keys (`len`)
/// - Build intersections and unions without touching the operands
///
/// # Invariants
/// - Every stored count is >= 1
/// - Under `Mode::Exclusive` every stored count is exactly 1
///
/// Counts are kept private: every consumer reads the distinct-key
/// cardinality, never the multiplicities.
#[derive(Clone, Debug)]
pub struct Ngrams<K> {
	/// Insertion mode, fixed for the lifetime of the container.
	mode: Mode,

	/// Mapping from key to occurrence count
	counts: HashMap<K, usize>,
}

impl<K: Eq + Hash + Clone> Ngrams<K> {
	/// Creates an empty container with the given mode.
	pub fn new(mode: Mode) -> Self {
		Self { mode, counts: HashMap::new() }
	}

	/// Creates an empty exclusive container.
	pub fn exclusive() -> Self {
		Self::new(Mode::Exclusive)
	}

	/// Creates an empty inclusive container.
	pub fn inclusive() -> Self {
		Self::new(Mode::Inclusive)
	}

	/// Returns the insertion mode.
	pub fn mode(&self) -> Mode {
		self.mode
	}

	/// Records one occurrence of `key`.
	///
	/// - `Exclusive`: the count is set to 1.
	/// - `Inclusive`: the count is incremented (starting from 0).
	pub fn add(&mut self, key: K) {
		match self.mode {
			Mode::Exclusive => {
				self.counts.insert(key, 1);
			}
			Mode::Inclusive => {
				*self.counts.entry(key).or_insert(0) += 1;
			}
		}
	}

	/// Adds every key of `keys`, in order.
	pub fn batch_add<I: IntoIterator<Item = K>>(&mut self, keys: I) {
		for key in keys {
			self.add(key);
		}
	}

	/// Number of distinct keys, whatever the mode.
	pub fn len(&self) -> usize {
		self.counts.len()
	}

	pub fn is_empty(&self) -> bool {
		self.counts.is_empty()
	}

	pub fn contains(&self, key: &K) -> bool {
		self.counts.contains_key(key)
	}

	/// Iterates over the distinct keys, in no particular order.
	pub fn keys(&self) -> impl Iterator<Item = &K> {
		self.counts.keys()
	}

	/// Returns a new container holding every key present in both `self` and `other`.
	///
	/// The result has the mode of `self`; each common key is inserted once
	/// through [`Ngrams::add`], so the original counts are not carried over.
	pub fn intersection(&self, other: &Self) -> Self {
		let mut intersection = Self::new(self.mode);
		for key in self.counts.keys() {
			if other.counts.contains_key(key) {
				intersection.add(key.clone());
			}
		}
		intersection
	}

	/// Returns a new container holding every key of `self` and of all `others`.
	///
	/// The result has the mode of `self`; keys are inserted through
	/// [`Ngrams::add`], once per container they appear in.
	pub fn union<'a, I>(&self, others: I) -> Self
	where
		I: IntoIterator<Item = &'a Self>,
		K: 'a,
	{
		let mut union = Self::new(self.mode);
		union.batch_add(self.counts.keys().cloned());
		for other in others {
			union.batch_add(other.counts.keys().cloned());
		}
		union
	}
}

impl<K: Eq + Hash + Clone> Extend<K> for Ngrams<K> {
	fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
		self.batch_add(iter);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn keys(ngrams: &Ngrams<String>) -> Vec<String> {
		let mut keys: Vec<String> = ngrams.keys().cloned().collect();
		keys.sort();
		keys
	}

	#[test]
	fn test_exclusive_add_is_idempotent() {
		let mut once = Ngrams::exclusive();
		once.add("a b".to_string());

		let mut twice = Ngrams::exclusive();
		twice.add("a b".to_string());
		twice.add("a b".to_string());

		assert_eq!(once.len(), 1);
		assert_eq!(twice.len(), once.len());
	}

	#[test]
	fn test_inclusive_len_counts_distinct_keys() {
		let mut ngrams = Ngrams::inclusive();
		ngrams.batch_add(["a", "a", "b", "a"].map(String::from));
		assert_eq!(ngrams.len(), 2);
	}

	#[test]
	fn test_intersection() {
		let mut left = Ngrams::exclusive();
		left.batch_add(["a", "b", "c"].map(String::from));
		let mut right = Ngrams::exclusive();
		right.batch_add(["a", "b", "d"].map(String::from));

		let common = left.intersection(&right);
		assert_eq!(keys(&common), vec!["a", "b"]);
		assert_eq!(common.len(), 2);
	}

	#[test]
	fn test_intersection_keeps_mode_of_self() {
		let left: Ngrams<String> = Ngrams::inclusive();
		let right = Ngrams::exclusive();
		assert_eq!(left.intersection(&right).mode(), Mode::Inclusive);
		assert_eq!(right.intersection(&left).mode(), Mode::Exclusive);
	}

	#[test]
	fn test_intersection_ignores_multiplicity() {
		let mut left = Ngrams::inclusive();
		left.batch_add(["a", "a", "a", "b"].map(String::from));
		let mut right = Ngrams::inclusive();
		right.batch_add(["a", "c"].map(String::from));

		assert_eq!(left.intersection(&right).len(), 1);
	}

	#[test]
	fn test_union_does_not_mutate_operands() {
		let mut first = Ngrams::exclusive();
		first.batch_add(["a", "b"].map(String::from));
		let mut second = Ngrams::exclusive();
		second.batch_add(["b", "c"].map(String::from));
		let mut third = Ngrams::exclusive();
		third.add("d".to_string());

		let union = first.union([&second, &third]);
		assert_eq!(keys(&union), vec!["a", "b", "c", "d"]);
		assert_eq!(first.len(), 2);
		assert_eq!(second.len(), 2);
		assert_eq!(third.len(), 1);
	}

	#[test]
	fn test_union_with_nothing_copies_keys() {
		let mut ngrams = Ngrams::exclusive();
		ngrams.batch_add(["x", "y"].map(String::from));
		let copy = ngrams.union(std::iter::empty());
		assert_eq!(keys(&copy), keys(&ngrams));
	}

	#[test]
	fn test_generic_key_type() {
		let mut ngrams: Ngrams<usize> = Ngrams::exclusive();
		ngrams.extend([1, 2, 2, 3]);
		assert_eq!(ngrams.len(), 3);
		assert!(ngrams.contains(&2));
		assert!(!ngrams.contains(&4));
	}

	#[test]
	fn test_mode_from_exclusive() {
		assert_eq!(Mode::from_exclusive(true), Mode::Exclusive);
		assert_eq!(Mode::from_exclusive(false), Mode::Inclusive);
	}
}
