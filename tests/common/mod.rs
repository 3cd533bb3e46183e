use chrono::{TimeZone, Utc};
use line_votes::data::{DatasetContext, SynthConfig, generate_levels};
use line_votes::domain::{Point, TimeKind};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Hourly fill (+0.4/day, 90d), hold (240d), drain (-0.25/day, 100d) series.
pub fn reservoir_points(seed: u64) -> Vec<Point> {
    let start = Utc.with_ymd_and_hms(2023, 3, 1, 0, 0, 0).unwrap();
    let config = SynthConfig::reservoir(start);
    let mut rng = StdRng::seed_from_u64(seed);
    generate_levels(&config, &mut rng).unwrap()
}

#[allow(dead_code)]
pub fn reservoir_context(seed: u64) -> DatasetContext {
    DatasetContext::new(reservoir_points(seed), TimeKind::EpochMillis).unwrap()
}
