//! Integration test crate for the Vault marketplace core.
//!
//! No library code lives here; the tests/ directory exercises
//! end-to-end flows across multiple workspace crates.
//!
//! Run all integration tests:
//! ```sh
//! cargo test -p vault-integration-tests
//! ```
