//! # pxfmt
//!
//! printf-style string formatting over three character-unit types: narrow
//! (`u8`, C-locale byte semantics), wide (`u32`, one Unicode scalar per
//! unit), and [`Utf8Unit`] (UTF-8 code units), with uniform semantics across
//! all three.
//!
//! The contract layer ([`format`], [`append_format`]) measures the required
//! output size, allocates exactly that much, writes, and trims to the actual
//! write count. It never fails observably: any formatting failure degrades
//! to an empty result. [`try_format`] is the explicit-error entry point.
//!
//! No `unsafe` code is permitted at the crate level.

#![deny(unsafe_code)]

pub mod args;
pub mod convert;
pub mod engine;
pub mod error;
pub mod fmt;
pub mod locale;
pub mod unit;

pub use args::FormatArg;
pub use error::FormatError;
pub use fmt::{append_format, format, try_format};
pub use unit::{CharUnit, Utf8Unit};
