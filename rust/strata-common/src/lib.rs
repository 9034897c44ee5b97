//! Core definitions (error taxonomy and argument verification), relied upon by all
//! strata-* crates.

pub mod error;
pub mod result;

pub use error::{Error, ErrorKind};
pub use result::Result;
