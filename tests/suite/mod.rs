//! Integration test suite modules

mod gemini;
mod orchestrator;
mod session;
mod turnstile;
