//! Integration test crate for the Quizzy backend.
//!
//! This crate has no library code — it only contains integration tests
//! that exercise end-to-end accounting flows across multiple workspace
//! crates.
//!
//! Run all integration tests:
//! ```sh
//! cargo test -p quizzy-integration-tests
//! ```
