//! Builds the elevation profile of a route, filling elevation gaps.

use crate::geom;

use super::profile::ElevationProfile;
use super::Route;

/// Elevation profile of `route`, sampled with at most `max_step_length`
/// meters between samples (`1 + ceil(length / max_step_length)` samples,
/// evenly spaced).
///
/// Positions whose edge carries no elevation data sample as `NaN` and are
/// filled afterwards: leading and trailing gaps copy the nearest valid
/// sample, interior gaps interpolate linearly between their valid
/// neighbors by index distance. A route without any elevation data yields
/// an all-zero profile.
///
/// # Panics
///
/// Panics unless `max_step_length > 0`.
pub fn elevation_profile(route: &Route, max_step_length: f64) -> ElevationProfile {
    assert!(
        max_step_length > 0.0,
        "max_step_length must be positive, got {max_step_length}"
    );

    let length = route.length();
    let sample_count = 1 + (length / max_step_length).ceil() as usize;
    let step = length / (sample_count - 1) as f64;

    let mut samples: Vec<f32> = (0..sample_count)
        .map(|i| route.elevation_at(i as f64 * step) as f32)
        .collect();
    fill_gaps(&mut samples);

    ElevationProfile::new(length, samples)
}

/// Replaces every `NaN` in `samples` in three passes: leading `NaN`s copy
/// the first valid value, trailing `NaN`s the last valid value, interior
/// `NaN`s interpolate between the nearest valid neighbor on each side.
/// An all-`NaN` array becomes all zeros.
fn fill_gaps(samples: &mut [f32]) {
    let Some(first_valid) = samples.iter().position(|sample| !sample.is_nan()) else {
        samples.fill(0.0);
        return;
    };
    let first_value = samples[first_valid];
    samples[..first_valid].fill(first_value);

    let last_valid = samples
        .iter()
        .rposition(|sample| !sample.is_nan())
        .unwrap_or(first_valid);
    let last_value = samples[last_valid];
    samples[last_valid..].fill(last_value);

    for index in first_valid + 1..last_valid {
        if samples[index].is_nan() {
            let below = (first_valid..index).rev().find(|&i| !samples[i].is_nan());
            let above = (index + 1..=last_valid).find(|&i| !samples[i].is_nan());
            if let (Some(below), Some(above)) = (below, above) {
                let t = (index - below) as f64 / (above - below) as f64;
                samples[index] =
                    geom::interpolate(samples[below].into(), samples[above].into(), t) as f32;
            }
        }
    }
}
