//! Focusdeck quote service library.
//!
//! Exposes the quote HTTP service for use in tests and embedding. The
//! service fronts an OpenAI-compatible text-completion upstream and serves
//! `POST /api/quote` with a `{"quote"}` / `{"error"}` JSON envelope.

pub mod config;
pub mod service;
