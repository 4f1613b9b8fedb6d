//! Image-to-text extraction for receipt photos.
//!
//! Wraps the Gemini `generateContent` API: the image is sent inline as
//! base64 with a fixed transcription prompt, and transient failures are
//! retried with exponential backoff.

pub mod client;
pub mod error;
pub mod protocol;

pub use client::{mime_for_path, OcrClient};
pub use error::{OcrError, Result};
