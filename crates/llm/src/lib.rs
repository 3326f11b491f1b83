//! Gemini text-generation adapter.
//!
//! Implements the [`annotation::LabelModel`] trait over Gemini's
//! `generateContent` REST endpoint.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** HTTP transport, request formatting, response parsing,
//! and credential handling live here. The [`annotation`] crate sees only
//! [`annotation::LabelModel`] and [`annotation::GenerationError`].
//!
//! ## Failure mapping
//!
//! | Condition | [`annotation::GenerationError`] variant |
//! |-----------|------------------------------------------|
//! | connection, TLS, or body read failure | `Transport` |
//! | non-2xx status (429 quota, 5xx) | `Status` |
//! | body is not the expected JSON | `MalformedResponse` |
//! | blocked prompt or candidate without text | `EmptyResponse` |
//!
//! This crate makes one attempt per call; the retry loop belongs to
//! [`annotation::LabelGenerator`].

mod client;
mod credentials;
mod wire;

pub use client::{GeminiClient, GeminiSettings, GeminiSetupError, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use credentials::{ApiKey, API_KEY_ENV_VAR};
