//! Synthetic fault-probability generation.
//!
//! - per-series synthesis with pattern injection (`series`)
//! - injectable randomness (`random`)
//! - per-turbine assembly (`generate_turbine`)

pub mod random;
pub mod series;

pub use random::{RandomSource, source_from_seed};
pub use series::{PatternHit, SeriesOutput, pattern_hit, phase_offset, synthesize};

use crate::domain::{ComponentSeriesMap, Event, GenerationConfig, TurbineFile, component_key};
use crate::error::AppError;

/// Every component series of one turbine plus the events they produced.
#[derive(Debug, Clone)]
pub struct TurbineOutput {
    pub file: TurbineFile,
    pub events: Vec<Event>,
}

/// Synthesize all configured components for one turbine.
///
/// Each component gets its own seed offset drawn from `0..max_seed_offset`.
pub fn generate_turbine<R: RandomSource + ?Sized>(
    config: &GenerationConfig,
    turbine_id: u32,
    rng: &mut R,
) -> Result<TurbineOutput, AppError> {
    let mut components = ComponentSeriesMap::new();
    let mut events = Vec::new();

    for component in &config.components {
        let seed_offset = rng.next_below(config.max_seed_offset);
        let out = synthesize(config, component, turbine_id, seed_offset, rng)?;
        log::debug!(
            "turbine {turbine_id} {component}: seed_offset={seed_offset} points={} events={}",
            out.series.len(),
            out.events.len()
        );
        components.insert(component_key(component), out.series);
        events.extend(out.events);
    }

    Ok(TurbineOutput {
        file: TurbineFile {
            turbine_id,
            components,
        },
        events,
    })
}
