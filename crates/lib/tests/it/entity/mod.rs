//! Entity integration tests
//!
//! Creation of detached templates, the copy-on-write mutation protocol, and
//! navigation from a bound entity through its store.

mod creation_tests;
mod mutation_tests;
