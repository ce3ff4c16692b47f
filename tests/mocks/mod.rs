//! Mock infrastructure for testing external services
//!
//! - Gemini `generateContent` (the model provider)

#![allow(dead_code)]

pub mod gemini;

pub use gemini::*;
