//! Top-level module for the Markov text generation system.
//!
//! This crate provides a second-order word-level Markov generator, including:
//! - Per-database transition tables (`TransitionStore`)
//! - Corpus ingestion with token filtering (internal)
//! - Sentence generation with bounded retries (internal)
//! - Generation configuration (`GenerationInput`)
//! - A supervised background worker monitor (`LivenessMonitor`)
//! - A high-level composition root (`Engine`)

/// High-level interface owning the named databases and the monitor.
///
/// Exposes ingestion, generation, persistence and monitor lifecycle.
/// All access to the transition tables goes through this type.
pub mod engine;

/// Generation configuration structure and seed strategies.
///
/// Stores generation parameters such as the word budget, retry limit,
/// target database and seed steering. Constructed through
/// `Engine::make_generation_input`.
pub mod generation_input;

/// Background liveness monitor for supervised worker threads.
///
/// Periodically checks a designated worker and respawns it when dead.
pub mod monitor;

/// Transition table over ordered word pairs.
///
/// Maps a `(w1, w2)` pair to the repetition-preserving sequence of words
/// observed to follow it; repetition is the weighting mechanism.
pub mod transition_store;

/// Internal sentence generation algorithm.
///
/// Seed resolution, chain walking, capitalization and boundary trimming.
/// This module is not exposed publicly.
mod generator;

/// Internal corpus ingestion.
///
/// Tokenizes raw text and populates a `TransitionStore` via sliding triples.
/// This module is not exposed publicly.
mod ingestor;
