use super::transition_store::TransitionStore;

/// Punctuation that may remain attached to a word token.
///
/// Keeping terminal punctuation glued to its word is what later lets the
/// generator detect sentence boundaries.
const PUNCTUATION: [char; 7] = ['.', ',', ';', ':', '!', '?', '\''];

/// Tokenizes `text` on whitespace and records every accepted sliding triple
/// into `store`.
///
/// No normalization is applied: casing and trailing punctuation are part of
/// token identity.
pub(crate) fn ingest(store: &mut TransitionStore, text: &str) {
	let tokens: Vec<String> = text.split_whitespace().map(str::to_owned).collect();
	ingest_tokens(store, &tokens);
}

/// Slides a three-token window over `tokens` and records accepted triples.
///
/// A triple `(w1, w2, w3)` is accepted only if all three tokens pass the
/// alphabetic-or-punctuation filter; rejected triples are dropped whole.
/// Fewer than three tokens is a no-op, not an error.
pub(crate) fn ingest_tokens(store: &mut TransitionStore, tokens: &[String]) {
	if tokens.len() < 3 {
		// Not enough words, no triples to record
		return;
	}

	for triple in tokens.windows(3) {
		let (w1, w2, w3) = (&triple[0], &triple[1], &triple[2]);
		if is_alpha_punct(w1) && is_alpha_punct(w2) && is_alpha_punct(w3) {
			store.put((w1.clone(), w2.clone()), w3.clone());
		}
	}
}

/// Returns true if the token, after stripping allowed punctuation, is
/// non-empty and consists solely of alphabetic characters.
///
/// Tokens that are pure punctuation, contain digits, or contain other
/// symbols are rejected.
fn is_alpha_punct(token: &str) -> bool {
	let stripped: String = token.chars().filter(|c| !PUNCTUATION.contains(c)).collect();
	!stripped.is_empty() && stripped.chars().all(char::is_alphabetic)
}
