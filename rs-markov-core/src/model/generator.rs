use rand::prelude::{IndexedRandom, SliceRandom};

use crate::error::{MarkovError, MarkovResult};
use super::generation_input::GenerationInput;
use super::transition_store::TransitionStore;

/// Why a single generation attempt was abandoned.
///
/// These are expected, retryable conditions. They drive the bounded retry
/// loop and never escape to the caller; genuinely invalid state (an empty
/// database) is rejected before the first attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
enum AttemptFailure {
	/// The chain walk reached a word pair with no recorded successors.
	DeadEnd,
	/// No word with usable terminal punctuation was found, so the trimmed
	/// sentence joined to an empty string.
	EmptySentence,
}

/// Generates one sentence from `store`, retrying up to `max_attempts` times.
///
/// # Parameters
/// - `store`: A non-empty transition table (checked by the engine).
/// - `input`: Word budget, attempt budget, seed steering and verbosity.
///
/// # Returns
/// - `Ok(String)`: A sentence starting with a capital and ending in `.`,
///   `!` or `?`.
/// - `Err(GenerationFailed)`: Every attempt hit a dead end or produced an
///   unterminated sentence.
///
/// # Behavior
/// - Each attempt reshuffles the key list, so reusing the same seed still
///   produces varied output.
/// - Seed candidates are consumed: once a candidate has matched a key (or
///   all candidates have been discarded), later attempts fall back to a
///   random starting pair. A seed whose only walks dead-end can therefore
///   not starve the whole attempt budget.
/// - Failed attempts are counted, optionally logged, and retried.
/// - Both budgets are strictly positive: a zero `max_words` or
///   `max_attempts` is clamped to 1, so a zero budget can never be
///   reported as an exhausted retry loop.
pub(crate) fn generate(store: &TransitionStore, input: &GenerationInput) -> MarkovResult<String> {
	let max_words = input.max_words.max(1);
	let max_attempts = input.max_attempts.max(1);

	let mut keys: Vec<&(String, String)> = store.keys().collect();
	let mut candidates = input.seed.candidates();

	for attempt in 1..=max_attempts {
		match attempt_sentence(store, &mut keys, &mut candidates, max_words) {
			Ok(sentence) => return Ok(sentence),
			Err(failure) => {
				if input.verbose {
					log::info!(
						"ran into a bit of an error while generating text ({failure:?}); will make {} more attempts",
						max_attempts - attempt
					);
				}
			}
		}
	}

	Err(MarkovError::GenerationFailed { attempts: max_attempts })
}

/// Runs one full generation attempt: pick a start, walk the chain,
/// capitalize, trim to a sentence boundary and join.
fn attempt_sentence(
	store: &TransitionStore,
	keys: &mut [&(String, String)],
	candidates: &mut Vec<&str>,
	max_words: usize,
) -> Result<String, AttemptFailure> {
	let mut rng = rand::rng();

	// Shuffle so the same pair is not found every time
	keys.shuffle(&mut rng);

	// Random fallback pair, used when no seed candidate matches a key
	let fallback = match keys.choose(&mut rng) {
		Some(pair) => (*pair).clone(),
		None => return Err(AttemptFailure::DeadEnd),
	};
	let (mut w1, mut w2) = resolve_seed(keys, candidates, fallback);

	// Walk the chain: each drawn successor advances the pair by one word.
	// Successor sequences keep repetition, so more frequent continuations
	// are proportionally more likely to be drawn here.
	let mut words: Vec<String> = Vec::with_capacity(max_words + 1);
	for _ in 0..max_words {
		words.push(w1.clone());
		let key = (w1, w2);
		let w3 = match store.successors_for(&key) {
			Some(successors) => match successors.choose(&mut rng) {
				Some(w3) => w3.clone(),
				None => return Err(AttemptFailure::DeadEnd),
			},
			None => return Err(AttemptFailure::DeadEnd),
		};
		(w1, w2) = (key.1, w3);
	}
	words.push(w2);

	capitalize_words(&mut words);
	trim_to_boundary(&mut words);

	let sentence = words.join(" ");
	if sentence.is_empty() {
		return Err(AttemptFailure::EmptySentence);
	}
	Ok(sentence)
}

/// Scans the shuffled keys for the first pair matching a seed candidate.
///
/// A candidate matches a key when it equals either word of the pair, or
/// when the candidate split on whitespace equals the pair exactly. The
/// first matching candidate wins and clears the whole candidate list;
/// candidates matching nothing are discarded in order. With no candidates
/// left the random fallback is kept.
fn resolve_seed(
	keys: &[&(String, String)],
	candidates: &mut Vec<&str>,
	fallback: (String, String),
) -> (String, String) {
	while let Some(candidate) = candidates.first().copied() {
		let split: Vec<&str> = candidate.split_whitespace().collect();
		for key in keys {
			let (first, second) = (key.0.as_str(), key.1.as_str());
			if candidate == first
				|| candidate == second
				|| (split.len() == 2 && split[0] == first && split[1] == second)
			{
				candidates.clear();
				return (key.0.clone(), key.1.clone());
			}
		}
		candidates.remove(0);
	}
	fallback
}

/// Capitalizes the first word, every word following a word that contains a
/// full stop anywhere, and the standalone pronoun "i".
fn capitalize_words(words: &mut [String]) {
	for i in 0..words.len() {
		if i == 0 || words[i - 1].contains('.') || words[i] == "i" {
			words[i] = capitalize(&words[i]);
		}
	}
}

/// Uppercases the first character and lowercases the rest.
fn capitalize(word: &str) -> String {
	let mut chars = word.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
		None => String::new(),
	}
}

/// Truncates `words` right after the last word carrying usable terminal
/// punctuation.
///
/// Scanning backward (never considering the first word), a word ending in
/// `.`, `!` or `?` is kept as the sentence end. A word ending in `,`, `;`
/// or `:` has that final character rewritten to `.` and becomes the end.
/// If no such word exists the sequence is emptied, which the caller treats
/// as a failed attempt.
fn trim_to_boundary(words: &mut Vec<String>) {
	let mut end = 0;
	for i in (1..words.len()).rev() {
		match words[i].chars().last() {
			Some('.' | '!' | '?') => end = i + 1,
			Some(',' | ';' | ':') => {
				// Rewrite the last character only
				words[i].pop();
				words[i].push('.');
				end = i + 1;
			}
			_ => (),
		}
		if end > 0 {
			break;
		}
	}
	words.truncate(end);
}
