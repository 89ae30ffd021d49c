//! Common utilities for the thicket selector engine.
//!
//! This crate provides shared infrastructure used by the other crates:
//! - **Warning System** - deduplicated colored terminal output

pub mod warning;
