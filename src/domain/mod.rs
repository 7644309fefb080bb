//! Domain types used throughout the generator and the viewers.
//!
//! This module defines:
//!
//! - persisted shapes (`TimeSeriesPoint`, `Event`, `TurbineFile`, `Metadata`)
//! - generation configuration (`EventPattern`, `DateWindow`, `GenerationConfig`)
//! - view selections (`Granularity`, `RangePreset`, `DateRange`)

pub mod types;

pub use types::*;
