//! Second-order Markov-chain text generation library.
//!
//! This crate provides a word-level Markov text generation system including:
//! - Per-database transition tables over ordered word pairs
//! - Corpus ingestion with token filtering
//! - Bounded-retry sentence generation with optional seed steering
//! - A background liveness monitor for supervised worker threads
//!
//! Only the high-level API is exposed publicly. Low-level components
//! are kept internal to ensure consistency and prevent misuse.

/// Core transition model, engine and generation logic.
///
/// This module exposes the high-level engine interface while keeping
/// internal ingestion machinery private.
pub mod model;

/// Strongly typed error taxonomy for the whole crate.
pub mod error;

/// I/O utilities (file loading, corpus listing).
pub mod io;
