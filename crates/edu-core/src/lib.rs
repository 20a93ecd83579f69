//! Core types and trait definitions for the educational catalog service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement the traits in [`store`]; the API layer depends
//! on those traits, never on a concrete backend.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod catalog;
pub mod error;
pub mod filter;
pub mod page;
pub mod question;
pub mod store;
pub mod validate;

pub use error::{Error, Result};
