//! Integration tests for the classdb core.
//!
//! Exercises the loader, session cache, CRUD patch discipline, and relation
//! resolution against the in-memory reference store.

mod common;
mod crud_tests;
mod loader_tests;
mod relation_tests;
