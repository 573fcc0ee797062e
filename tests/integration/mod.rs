//! Integration tests for the relay.
//!
//! - `relay_test`: `/api/anthropic` against a recording fake provider
//! - `ask_test`: `/ask`, `/health` and the JSON 404 fallback
//! - `anthropic_test`: the real Anthropic provider against a mock upstream

pub mod relay_test;
