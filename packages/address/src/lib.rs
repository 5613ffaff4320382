#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Address standardization engine.
//!
//! Turns a raw address cell into a canonical written form:
//!
//! 1. [`clean`] strips markup and stray punctuation
//! 2. [`abbreviations`] expands directionals and street types
//! 3. [`parser`] splits the text into street/city/state/ZIP
//! 4. [`standardize`] normalizes explicit state, city, and ZIP cells
//! 5. [`title_case`] fixes capitalization
//! 6. [`row`] ties the steps together and builds a [`maps`] link
//!
//! Everything here is a pure function of its input. There is no I/O and
//! no shared mutable state, so rows can be processed in any order.

pub mod abbreviations;
pub mod clean;
pub mod maps;
pub mod parser;
pub mod row;
pub mod standardize;
pub mod states;
pub mod title_case;

pub use addrstd_address_models::{AddressComponents, RowInput, RowResult, StandardizeOptions};
pub use row::process_row;
