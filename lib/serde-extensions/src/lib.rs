//! Layer partial serde documents over existing values.
//!
//! ```
//! use serde_extensions::Overwrite;
//!
//! #[derive(Overwrite)]
//! struct Options {
//!     language: String,
//!     root: String,
//! }
//! ```
extern crate self as serde_extensions;

pub use serde_extensions_derive::*;

pub trait Overwrite {
    fn overwrite<'de, D>(&mut self, d: D) -> Result<(), D::Error>
    where
        D: serde::Deserializer<'de>;
}
