//! Input/output helpers.
//!
//! - dataset JSON writes (`writer`)
//! - dataset JSON reads (`reader`)
//! - chart view CSV export (`export`)

pub mod export;
pub mod reader;
pub mod writer;

pub use export::*;
pub use reader::*;
pub use writer::*;
