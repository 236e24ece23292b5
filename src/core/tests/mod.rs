//! Core module tests
//!
//! - Config store parsing and serialisation
//! - Keybinding extraction
//! - Two-way comparison
//! - Fine-tune state machine
