//! Implementation of the `#[derive(Record)]` macro.
//!
//! Generates field accessors, query registry descriptors and field path
//! constants from struct annotations.

mod attrs;
mod derive;

pub use derive::record_derive_impl;
