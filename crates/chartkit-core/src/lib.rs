#![forbid(unsafe_code)]

//! Chart specification model (headless).
//!
//! Design goals:
//! - a small, immutable input model (`ChartSpec`) that callers build in code or load from JSON
//! - purely positional color assignment so repeated renders are byte-identical
//! - lenient coercion of row values; no error paths for well-typed input

pub mod error;
pub mod geom;
pub mod palette;
pub mod spec;

pub use error::{Error, Result};
pub use palette::DEFAULT_PALETTE;
pub use spec::{ChartSpec, ChartType, FieldValue, Row};
