//! Error types for rs-markov.
//!
//! Structural errors (empty or unknown database) surface immediately;
//! per-attempt generation failures are absorbed by the bounded retry loop
//! and only escalate as `GenerationFailed` once the attempt budget is spent.

use thiserror::Error;

/// Top-level error type for the Markov engine.
#[derive(Debug, Error)]
pub enum MarkovError {
	/// Generation was requested against a database with no transitions.
	#[error("No data is available yet in database '{database}'. Did you read any data yet?")]
	EmptyDatabase {
		database: String,
	},

	/// A database name was cleared or read that was never created.
	#[error("There is no database named '{database}'")]
	UnknownDatabase {
		database: String,
	},

	/// Every generation attempt failed to produce a non-empty sentence.
	#[error("Made {attempts} attempts to generate text, but all failed")]
	GenerationFailed {
		attempts: usize,
	},

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Failed to encode or decode a stored database: {0}")]
	Codec(#[from] postcard::Error),
}

impl MarkovError {
	/// Returns true if this is an empty-database error.
	#[must_use]
	pub const fn is_empty_database(&self) -> bool {
		matches!(self, Self::EmptyDatabase { .. })
	}

	/// Returns true if this is an unknown-database error.
	#[must_use]
	pub const fn is_unknown_database(&self) -> bool {
		matches!(self, Self::UnknownDatabase { .. })
	}

	/// Returns true if this error reports an exhausted generation budget.
	#[must_use]
	pub const fn is_generation_failed(&self) -> bool {
		matches!(self, Self::GenerationFailed { .. })
	}
}

/// Result type alias for Markov engine operations.
pub type MarkovResult<T> = Result<T, MarkovError>;
