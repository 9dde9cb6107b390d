use crate::error::{Result, RougeError};
use crate::ngrams::{Mode, Ngrams};

/// Dynamic-programming table of longest common subsequence lengths.
///
/// Cell `(i, j)` holds the LCS length of the first `i` items of `x` and the
/// first `j` items of `y`.
///
/// # Invariants
/// - Row 0 and column 0 are all zeros
/// - Values are non-decreasing along every row and every column
/// - Stored row-major in a flat vector of `(|x| + 1) * (|y| + 1)` cells
#[derive(Clone, Debug)]
pub struct LcsTable {
	rows: usize,
	cols: usize,
	cells: Vec<usize>,
}

impl LcsTable {
	/// Fills the table for `x` and `y`.
	///
	/// `t[i][j] = t[i-1][j-1] + 1` when `x[i-1] == y[j-1]`,
	/// otherwise `max(t[i-1][j], t[i][j-1])`.
	pub fn build<T: PartialEq>(x: &[T], y: &[T]) -> Self {
		let rows = x.len() + 1;
		let cols = y.len() + 1;
		let mut table = Self { rows, cols, cells: vec![0; rows * cols] };

		for i in 1..rows {
			for j in 1..cols {
				let value = if x[i - 1] == y[j - 1] {
					table.cells[(i - 1) * cols + j - 1] + 1
				} else {
					table.cells[(i - 1) * cols + j].max(table.cells[i * cols + j - 1])
				};
				table.cells[i * cols + j] = value;
			}
		}
		table
	}

	/// Value of cell `(i, j)`.
	///
	/// # Panics
	/// Panics if `i > |x|` or `j > |y|`.
	pub fn get(&self, i: usize, j: usize) -> usize {
		assert!(i < self.rows && j < self.cols, "cell ({i}, {j}) out of bounds");
		self.cells[i * self.cols + j]
	}

	/// Number of rows, `|x| + 1`.
	pub fn rows(&self) -> usize {
		self.rows
	}

	/// Number of columns, `|y| + 1`.
	pub fn cols(&self) -> usize {
		self.cols
	}

	/// LCS length of the full sequences (bottom-right cell).
	pub fn length(&self) -> usize {
		self.cells[self.cells.len() - 1]
	}

	/// Walks back from the bottom-right cell and collects one LCS.
	///
	/// `x` and `y` must be the sequences the table was built from.
	///
	/// # Behavior
	/// - On a match, takes the item and moves diagonally.
	/// - Otherwise moves up when `t[i-1][j] > t[i][j-1]`, left on ties.
	/// - Items are collected in backtrack order, then reversed.
	fn backtrack<'a, T: PartialEq>(&self, x: &'a [T], y: &[T]) -> Vec<&'a T> {
		debug_assert_eq!((self.rows, self.cols), (x.len() + 1, y.len() + 1));

		let mut subsequence = Vec::with_capacity(self.length());
		let (mut i, mut j) = (x.len(), y.len());
		while i > 0 && j > 0 {
			if x[i - 1] == y[j - 1] {
				subsequence.push(&x[i - 1]);
				i -= 1;
				j -= 1;
			} else if self.cells[(i - 1) * self.cols + j] > self.cells[i * self.cols + j - 1] {
				i -= 1;
			} else {
				j -= 1;
			}
		}
		subsequence.reverse();
		subsequence
	}
}

fn check_not_empty<T>(x: &[T], y: &[T]) -> Result<()> {
	if x.is_empty() || y.is_empty() {
		return Err(RougeError::EmptySequence);
	}
	Ok(())
}

/// Length of the longest common subsequence of `x` and `y`.
///
/// # Errors
/// Returns `RougeError::EmptySequence` if either sequence is empty.
pub fn lcs_length<T: PartialEq>(x: &[T], y: &[T]) -> Result<usize> {
	check_not_empty(x, y)?;
	Ok(LcsTable::build(x, y).length())
}

/// Reconstructs one longest common subsequence of `x` and `y`.
///
/// The items are borrowed from `x` and returned in document order.
/// The result length always equals [`lcs_length`].
///
/// # Errors
/// Returns `RougeError::EmptySequence` if either sequence is empty.
pub fn reconstruct<'a, T: PartialEq>(x: &'a [T], y: &[T]) -> Result<Vec<&'a T>> {
	check_not_empty(x, y)?;
	let table = LcsTable::build(x, y);
	Ok(table.backtrack(x, y))
}

/// Reconstructs one LCS of two token sequences as unigram entries.
pub fn reconstruct_ngrams<T: AsRef<str> + PartialEq>(x: &[T], y: &[T], mode: Mode) -> Result<Ngrams<String>> {
	let mut ngrams = Ngrams::new(mode);
	ngrams.batch_add(reconstruct(x, y)?.into_iter().map(|token| AsRef::<str>::as_ref(token).to_owned()));
	Ok(ngrams)
}
