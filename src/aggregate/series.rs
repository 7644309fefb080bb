//! Down-sampling of daily series into calendar buckets.

use std::collections::BTreeMap;

use crate::aggregate::bucket::{BucketKey, bucket_key, display_date};
use crate::domain::{DateRange, Granularity, TimeSeriesPoint, round_probability};

/// Points whose date lies in `range` (inclusive on both ends).
pub fn slice_range(series: &[TimeSeriesPoint], range: DateRange) -> Vec<TimeSeriesPoint> {
    series
        .iter()
        .filter(|p| range.contains(p.date))
        .copied()
        .collect()
}

/// Average a series per calendar bucket.
///
/// `Granularity::Day` returns the input unchanged. Otherwise there is one
/// output point per non-empty bucket, valued at the bucket mean rounded to 4
/// decimals and dated at the bucket's display anchor, sorted by date.
pub fn aggregate(series: &[TimeSeriesPoint], granularity: Granularity) -> Vec<TimeSeriesPoint> {
    if granularity == Granularity::Day || series.is_empty() {
        return series.to_vec();
    }

    let mut buckets: BTreeMap<BucketKey, (f64, usize)> = BTreeMap::new();
    for point in series {
        let Some(key) = bucket_key(point.date, granularity) else {
            continue;
        };
        let entry = buckets.entry(key).or_insert((0.0, 0));
        entry.0 += point.probability;
        entry.1 += 1;
    }

    let mut out: Vec<TimeSeriesPoint> = buckets
        .into_iter()
        .filter_map(|(key, (sum, count))| {
            let Some(date) = display_date(key, granularity) else {
                log::warn!("no display date for bucket {key:?} at {granularity:?}");
                return None;
            };
            Some(TimeSeriesPoint::new(date, round_probability(sum / count as f64)))
        })
        .collect();

    out.sort_by_key(|p| p.date);
    out
}
