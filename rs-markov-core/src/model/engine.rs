use std::collections::HashMap;
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::error::{MarkovError, MarkovResult};
use crate::io::read_file;
use super::generation_input::GenerationInput;
use super::generator;
use super::ingestor;
use super::monitor::{LivenessMonitor, WorkerSpec};
use super::transition_store::TransitionStore;

/// Name of the database used when the caller does not pick one.
pub const DEFAULT_DATABASE: &str = "default";

/// Composition root of the Markov engine.
///
/// # Responsibilities
/// - Own the named transition databases (exclusively; no store is ever
///   handed out to callers)
/// - Expose ingestion, generation, clearing and persistence
/// - Own the liveness monitor's lifecycle
///
/// # Concurrency
/// Single-writer-then-many-readers per database: ingest fully before
/// generating. Mutating operations take `&mut self`, which enforces that
/// discipline at the type level. Separate `Engine` instances are fully
/// independent.
pub struct Engine {
	databases: HashMap<String, TransitionStore>,
	monitor: LivenessMonitor,
}

impl Engine {
	/// Creates an engine holding a single empty default database.
	pub fn new() -> Self {
		let mut databases = HashMap::new();
		databases.insert(DEFAULT_DATABASE.to_owned(), TransitionStore::new());
		Self {
			databases,
			monitor: LivenessMonitor::new(),
		}
	}

	/// Returns the list of existing database names.
	pub fn database_names(&self) -> Vec<String> {
		self.databases.keys().cloned().collect()
	}

	/// Returns true if the named database is missing or has no transitions.
	pub fn is_empty(&self, database: &str) -> bool {
		self.databases.get(database).is_none_or(TransitionStore::is_empty)
	}

	/// Creates a new `GenerationInput` targeting the default database.
	pub fn make_generation_input(&self) -> GenerationInput {
		GenerationInput::new(DEFAULT_DATABASE)
	}

	/// Ingests raw text into the named database.
	///
	/// # Parameters
	/// - `text`: The corpus, tokenized on whitespace.
	/// - `database`: Target database; created on first reference.
	/// - `overwrite`: Discard the database's prior state first. Other
	///   databases are untouched either way.
	pub fn ingest(&mut self, text: &str, database: &str, overwrite: bool) {
		if overwrite {
			if let Some(store) = self.databases.get_mut(database) {
				store.clear();
			}
		}
		let store = self.store_entry(database);
		ingestor::ingest(store, text);
	}

	/// Reads a whole text file into the named database.
	///
	/// # Behavior
	/// - Splits the file into whitespace tokens.
	/// - Partitions the tokens into chunks (based on CPU cores * factor)
	///   with a two-token overlap, so the produced triples are exactly the
	///   ones single-threaded ingestion would produce.
	/// - Spawns threads to build partial tables for each chunk, then merges
	///   them sequentially.
	///
	/// # Errors
	/// Returns an error if the file cannot be read.
	///
	/// # Notes
	/// - Uses MPSC channels to collect partial tables from threads.
	pub fn read_file<P: AsRef<Path>>(
		&mut self,
		path: P,
		database: &str,
		overwrite: bool,
	) -> MarkovResult<()> {
		let contents = read_file(path)?;
		let tokens: Vec<String> = contents.split_whitespace().map(str::to_owned).collect();

		if overwrite {
			if let Some(store) = self.databases.get_mut(database) {
				store.clear();
			}
		}
		let store = self.store_entry(database);

		let cpus = num_cpus::get();
		let factor = 8;
		let chunks = cpus * factor;
		let chunk_size = ((tokens.len() + chunks - 1) / chunks).max(1);

		let (tx, rx) = mpsc::channel();
		let mut start = 0;
		while start < tokens.len() {
			// Two extra tokens so triples spanning the cut are not lost
			let end = (start + chunk_size + 2).min(tokens.len());
			let chunk: Vec<String> = tokens[start..end].to_vec();
			let tx = tx.clone();

			thread::spawn(move || {
				let mut partial = TransitionStore::new();
				ingestor::ingest_tokens(&mut partial, &chunk);
				tx.send(partial).expect("Failed to send from thread");
			});
			start += chunk_size;
		}
		drop(tx);

		for partial in rx.iter() {
			store.merge(partial);
		}

		Ok(())
	}

	/// Generates a sentence from the named database.
	///
	/// # Errors
	/// - `EmptyDatabase` if the target database is missing or empty.
	/// - `GenerationFailed` if every attempt failed; see the input's
	///   `max_attempts`.
	pub fn generate(&self, input: &GenerationInput) -> MarkovResult<String> {
		let store = self
			.databases
			.get(&input.database)
			.filter(|store| !store.is_empty())
			.ok_or_else(|| MarkovError::EmptyDatabase {
				database: input.database.clone(),
			})?;
		generator::generate(store, input)
	}

	/// Clears one database, or everything.
	///
	/// # Parameters
	/// - `database`: `Some(name)` removes that database; `None` resets the
	///   engine to a single empty default database.
	///
	/// # Errors
	/// Returns `UnknownDatabase` when the named database was never created.
	pub fn clear(&mut self, database: Option<&str>) -> MarkovResult<()> {
		match database {
			None => {
				self.databases.clear();
				self.databases
					.insert(DEFAULT_DATABASE.to_owned(), TransitionStore::new());
				Ok(())
			}
			Some(name) => match self.databases.remove(name) {
				Some(_) => Ok(()),
				None => Err(MarkovError::UnknownDatabase {
					database: name.to_owned(),
				}),
			},
		}
	}

	/// Serializes one database to a compact binary file.
	///
	/// # Errors
	/// Returns `UnknownDatabase` for a name that was never created, or an
	/// I/O or encoding error.
	pub fn save_database<P: AsRef<Path>>(&self, path: P, database: &str) -> MarkovResult<()> {
		let store = self
			.databases
			.get(database)
			.ok_or_else(|| MarkovError::UnknownDatabase {
				database: database.to_owned(),
			})?;
		let bytes = postcard::to_stdvec(store)?;
		std::fs::write(path, bytes)?;
		Ok(())
	}

	/// Loads a database from a binary file, replacing any existing store
	/// under that name.
	///
	/// # Errors
	/// Returns an I/O or decoding error.
	pub fn load_database<P: AsRef<Path>>(&mut self, path: P, database: &str) -> MarkovResult<()> {
		let bytes = std::fs::read(path)?;
		let store: TransitionStore = postcard::from_bytes(&bytes)?;
		self.databases.insert(database.to_owned(), store);
		Ok(())
	}

	/// Starts the liveness monitor supervising `spec`.
	///
	/// The interval is injected so tests can run at millisecond scale.
	/// Starting while already running is a no-op.
	pub fn start_monitor(&mut self, interval: Duration, spec: WorkerSpec) -> MarkovResult<()> {
		self.monitor.start(interval, spec)
	}

	/// Signals the monitor to stop; it terminates after the sleep interval
	/// in flight elapses.
	pub fn stop_monitor(&mut self) {
		self.monitor.stop();
	}

	/// Returns true while the monitor is running.
	pub fn monitor_is_running(&self) -> bool {
		self.monitor.is_running()
	}

	/// Returns the store for `database`, creating it on first reference.
	fn store_entry(&mut self, database: &str) -> &mut TransitionStore {
		if !self.databases.contains_key(database) {
			log::info!("creating new database '{database}'");
		}
		self.databases.entry(database.to_owned()).or_default()
	}
}

impl Default for Engine {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use super::super::generation_input::Seed;

	const CORPUS: &str = "The cat sat. The cat ran. The dog sat.";

	#[test]
	fn test_new_engine_has_empty_default() {
		let engine = Engine::new();
		assert_eq!(engine.database_names(), vec![DEFAULT_DATABASE.to_owned()]);
		assert!(engine.is_empty(DEFAULT_DATABASE));
	}

	#[test]
	fn test_ingest_creates_database_on_first_reference() {
		let mut engine = Engine::new();
		engine.ingest(CORPUS, "poems", false);

		assert!(!engine.is_empty("poems"));
		assert!(engine.is_empty(DEFAULT_DATABASE));

		let mut names = engine.database_names();
		names.sort();
		assert_eq!(names, vec![DEFAULT_DATABASE.to_owned(), "poems".to_owned()]);
	}

	#[test]
	fn test_overwrite_discards_prior_state_for_that_database_only() {
		let mut engine = Engine::new();
		engine.ingest(CORPUS, "a", false);
		engine.ingest(CORPUS, "b", false);

		engine.ingest("An owl flew by. An owl flew off.", "a", true);

		let mut input = engine.make_generation_input();
		input.database = "a".to_owned();
		input.max_words = 5;
		input.seed = Seed::Word("cat".to_owned());
		// The old corpus is gone from "a": no sentence can mention the cat
		let sentence = engine.generate(&input).unwrap();
		assert!(!sentence.to_lowercase().contains("cat"), "stale data in: {sentence}");

		// "b" is untouched
		assert!(!engine.is_empty("b"));
		input.database = "b".to_owned();
		input.seed = Seed::None;
		assert!(engine.generate(&input).is_ok());
	}

	#[test]
	fn test_generate_on_untouched_database_is_empty_database_error() {
		let engine = Engine::new();
		let input = engine.make_generation_input();

		let err = engine.generate(&input).unwrap_err();
		assert!(err.is_empty_database(), "unexpected error: {err}");

		let mut input = engine.make_generation_input();
		input.database = "never-created".to_owned();
		let err = engine.generate(&input).unwrap_err();
		assert!(err.is_empty_database(), "unexpected error: {err}");
	}

	#[test]
	fn test_generate_satisfies_sentence_invariants() {
		let mut engine = Engine::new();
		engine.ingest(CORPUS, DEFAULT_DATABASE, false);

		let mut input = engine.make_generation_input();
		input.max_words = 5;
		input.seed = Seed::Word("dog".to_owned());

		let sentence = engine.generate(&input).unwrap();
		let last = sentence.chars().last().unwrap();
		assert!(matches!(last, '.' | '!' | '?'), "unterminated: {sentence}");
		assert!(sentence.chars().next().unwrap().is_uppercase());
	}

	#[test]
	fn test_clear_unknown_database_is_reported() {
		let mut engine = Engine::new();
		let err = engine.clear(Some("ghost")).unwrap_err();
		assert!(err.is_unknown_database());
	}

	#[test]
	fn test_clear_all_resets_to_single_default() {
		let mut engine = Engine::new();
		engine.ingest(CORPUS, "a", false);
		engine.ingest(CORPUS, DEFAULT_DATABASE, false);

		engine.clear(None).unwrap();
		assert_eq!(engine.database_names(), vec![DEFAULT_DATABASE.to_owned()]);
		assert!(engine.is_empty(DEFAULT_DATABASE));
	}

	#[test]
	fn test_clear_single_database() {
		let mut engine = Engine::new();
		engine.ingest(CORPUS, "a", false);
		engine.ingest(CORPUS, "b", false);

		engine.clear(Some("a")).unwrap();
		assert!(engine.is_empty("a"));
		assert!(!engine.is_empty("b"));
	}

	#[test]
	fn test_read_file_matches_direct_ingestion() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("corpus.txt");
		std::fs::write(&path, CORPUS).unwrap();

		let mut from_file = Engine::new();
		from_file.read_file(&path, DEFAULT_DATABASE, false).unwrap();

		let mut direct = Engine::new();
		direct.ingest(CORPUS, DEFAULT_DATABASE, false);

		// Same corpus, same generation behavior
		let mut input = from_file.make_generation_input();
		input.max_words = 5;
		assert!(from_file.generate(&input).is_ok());
		assert!(!from_file.is_empty(DEFAULT_DATABASE));
		assert!(!direct.is_empty(DEFAULT_DATABASE));
	}

	#[test]
	fn test_read_file_preserves_triple_multiset() {
		// A corpus large enough to span many chunks: the chunked build must
		// produce exactly the triples single-threaded ingestion produces.
		let sentences = [
			"The fox ran through the field.",
			"A crow watched from the tall tree.",
			"The dog chased the quick cat.",
			"Every owl slept through the day.",
			"Some cats never trust the fox.",
		];
		let mut corpus = String::new();
		for i in 0..2000 {
			corpus.push_str(sentences[i % sentences.len()]);
			corpus.push(' ');
		}

		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("corpus.txt");
		std::fs::write(&path, &corpus).unwrap();

		let mut from_file = Engine::new();
		from_file.read_file(&path, DEFAULT_DATABASE, false).unwrap();

		let mut direct = Engine::new();
		direct.ingest(&corpus, DEFAULT_DATABASE, false);

		let file_store = &from_file.databases[DEFAULT_DATABASE];
		let direct_store = &direct.databases[DEFAULT_DATABASE];
		assert_eq!(file_store.key_count(), direct_store.key_count());

		// Partial tables arrive in arbitrary order, so successor lists are
		// compared as multisets
		for key in direct_store.keys() {
			let mut expected = direct_store.successors_for(key).unwrap().to_vec();
			let mut actual = file_store.successors_for(key).unwrap().to_vec();
			expected.sort();
			actual.sort();
			assert_eq!(actual, expected, "successor mismatch for {key:?}");
		}
	}

	#[test]
	fn test_save_and_load_database() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("default.bin");

		let mut engine = Engine::new();
		engine.ingest(CORPUS, DEFAULT_DATABASE, false);
		engine.save_database(&path, DEFAULT_DATABASE).unwrap();

		let mut restored = Engine::new();
		restored.load_database(&path, "restored").unwrap();
		assert!(!restored.is_empty("restored"));

		let mut input = restored.make_generation_input();
		input.database = "restored".to_owned();
		input.max_words = 5;
		assert!(restored.generate(&input).is_ok());
	}

	#[test]
	fn test_save_unknown_database_is_reported() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("nope.bin");

		let engine = Engine::new();
		let err = engine.save_database(&path, "ghost").unwrap_err();
		assert!(err.is_unknown_database());
	}
}
