//! Consumer-side aggregation: calendar buckets, range slicing, event filtering
//! and assembled chart views.

pub mod bucket;
pub mod filter;
pub mod series;
pub mod view;

pub use bucket::{BucketKey, bucket_key, display_date};
pub use filter::{EventFilter, EventSplit, filter_events};
pub use series::{aggregate, slice_range};
pub use view::{ChartView, SeriesSummary, ViewRequest, build_view};
