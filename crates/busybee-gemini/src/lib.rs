//! # Busy Bee Gemini
//!
//! Analysis provider backed by the Google Generative Language API.
//!
//! Each analysis kind has a fixed prompt and a fixed response schema; the
//! model is asked for JSON only and the answer is parsed straight into the
//! core record types.

pub mod client;
pub mod prompts;
pub mod schema;

pub use client::GeminiClient;
