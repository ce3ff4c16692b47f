//! Integration tests for the CodeMaster relay
//!
//! These tests drive the real router against a mock Gemini server, and the
//! chat front end's store against a live relay.

mod conversation;
mod health;
