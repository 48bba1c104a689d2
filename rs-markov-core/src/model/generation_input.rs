/// Strategy used to steer the starting word pair of a generated sentence.
///
/// # Variants
/// - `None`: no steering, the starting pair is drawn at random.
/// - `Word(String)`: bias the start toward a pair containing this word.
/// - `List(Vec<String>)`: candidates tried in order; the first one found
///   in the database wins, the rest are ignored.
#[derive(Debug, Clone, PartialEq)]
pub enum Seed {
	None,
	Word(String),
	List(Vec<String>),
}

impl Seed {
	/// Normalizes the seed into an ordered candidate list.
	///
	/// `None` yields an empty list, which skips seed resolution entirely.
	pub(crate) fn candidates(&self) -> Vec<&str> {
		match self {
			Seed::None => Vec::new(),
			Seed::Word(word) => vec![word.as_str()],
			Seed::List(words) => words.iter().map(String::as_str).collect(),
		}
	}
}

/// Input parameters for generating a sentence from a named database.
///
/// # Responsibilities
/// - Track generation parameters (`max_words`, `max_attempts`, `verbose`, `seed`)
/// - Name the target database
///
/// # Invariants
/// - `max_words` and `max_attempts` are strictly positive; a zero is
///   clamped to 1 during generation, so a zero budget can never be
///   reported as an exhausted retry loop.
pub struct GenerationInput {
	/// Maximum amount of words the chain walk may emit. The actual sentence
	/// is usually shorter: it is cut at the last word carrying terminal
	/// punctuation.
	pub max_words: usize,

	/// Number of full generation attempts before giving up.
	pub max_attempts: usize,

	/// Name of the database to generate from.
	pub database: String,

	/// Whether failed attempts should be reported through the logger.
	pub verbose: bool,

	/// Seed steering for the starting word pair.
	pub seed: Seed,
}

impl GenerationInput {
	/// Creates an input with the default generation budget.
	///
	/// # Visibility
	/// - `pub(crate)` to prevent construction outside the crate; use
	///   `Engine::make_generation_input`.
	pub(crate) fn new(database: &str) -> Self {
		Self {
			max_words: 20,
			max_attempts: 100,
			database: database.to_owned(),
			verbose: false,
			seed: Seed::None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_seed_candidates() {
		assert!(Seed::None.candidates().is_empty());
		assert_eq!(Seed::Word("cat".to_owned()).candidates(), vec!["cat"]);
		assert_eq!(
			Seed::List(vec!["cat".to_owned(), "dog".to_owned()]).candidates(),
			vec!["cat", "dog"]
		);
	}

	#[test]
	fn test_defaults() {
		let input = GenerationInput::new("default");
		assert_eq!(input.max_words, 20);
		assert_eq!(input.max_attempts, 100);
		assert_eq!(input.database, "default");
		assert!(!input.verbose);
		assert_eq!(input.seed, Seed::None);
	}
}
