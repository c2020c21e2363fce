//! # relata-embeddings
//!
//! Turns query text into vectors comparable with the stored section embeddings.
//! An HTTP provider talks to an Ollama-compatible `/api/embed` endpoint; a hashing
//! provider gives deterministic offline vectors. No provider at all is a valid
//! configuration: vector search is then reported as unavailable.

pub mod cache;
pub mod engine;
pub mod providers;

pub use cache::QueryCache;
pub use engine::EmbeddingEngine;
pub use providers::{create_provider, HashingProvider, HttpProvider};
