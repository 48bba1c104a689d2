use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Transition table of a single named database.
///
/// Maps an ordered pair of words to the ordered sequence of words observed
/// to follow that pair in the training corpus. Successors are stored with
/// repetition: a word observed more often after a pair occupies more slots
/// in its sequence, and is proportionally more likely to be drawn during
/// generation.
///
/// ## Invariants
/// - A key exists iff at least one accepted training triple produced it
/// - Every successor sequence is non-empty
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct TransitionStore {
	transitions: HashMap<(String, String), Vec<String>>,
}

impl TransitionStore {
	/// Creates an empty transition table.
	pub fn new() -> Self {
		Self { transitions: HashMap::new() }
	}

	/// Appends `successor` to the sequence for `key`, creating the sequence
	/// if the pair was never seen before. Pure append, cannot fail.
	pub fn put(&mut self, key: (String, String), successor: String) {
		self.transitions.entry(key).or_default().push(successor);
	}

	/// Returns true iff no word pair has been recorded.
	pub fn is_empty(&self) -> bool {
		self.transitions.is_empty()
	}

	/// Number of distinct word pairs in the table.
	pub fn key_count(&self) -> usize {
		self.transitions.len()
	}

	/// Iterates over all recorded word pairs.
	///
	/// This is the sampling universe for generation: every yielded pair has
	/// at least one successor.
	pub fn keys(&self) -> impl Iterator<Item = &(String, String)> {
		self.transitions.keys()
	}

	/// Returns the successor sequence for an exact pair.
	///
	/// Absence is explicit: an unknown pair yields `None`, never an empty
	/// slice, so callers can distinguish a dead end from a present entry.
	pub fn successors_for(&self, key: &(String, String)) -> Option<&[String]> {
		self.transitions.get(key).map(Vec::as_slice)
	}

	/// Merges another table into this one.
	///
	/// Successor sequences of matching pairs are concatenated, so merging
	/// preserves observation multiplicity. Intended for combining partial
	/// tables built in parallel during bulk ingestion.
	pub fn merge(&mut self, other: Self) {
		for (key, successors) in other.transitions {
			self.transitions.entry(key).or_default().extend(successors);
		}
	}

	/// Removes every recorded transition.
	pub fn clear(&mut self) {
		self.transitions.clear();
	}
}
