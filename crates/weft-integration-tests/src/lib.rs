//! Integration test crate for the weft emulator.
//!
//! This crate has no library code. It only contains tests that exercise
//! chunk upload and ledger queries across the workspace crates against an
//! in-memory database.
//!
//! ```sh
//! cargo test -p weft-integration-tests
//! ```
