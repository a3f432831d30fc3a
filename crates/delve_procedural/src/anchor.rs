//! # Anchor Placement
//!
//! Every irregular map is carved around two anchors: the world origin and an
//! endpoint dropped at a random polar position inside a distance annulus.
//!
//! Rounding the polar point to a tile can push it slightly in or out of the
//! annulus, so placement re-draws until the rounded tile itself satisfies the
//! distance bound.

use std::f64::consts::TAU;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::grid::Coordinate;

/// Re-draws allowed before falling back to an on-axis tile.
const MAX_PLACEMENT_ATTEMPTS: u32 = 64;

/// The two reference points a map is carved around.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnchorPair {
    /// Start of the map. Always the world origin.
    pub origin: Coordinate,
    /// End of the map.
    pub endpoint: Coordinate,
}

impl AnchorPair {
    /// Anchors the map at the origin with the given endpoint.
    #[inline]
    #[must_use]
    pub const fn new(endpoint: Coordinate) -> Self {
        Self {
            origin: Coordinate::ORIGIN,
            endpoint,
        }
    }

    /// Places a fresh endpoint and anchors it against the origin.
    pub fn place<R: Rng + ?Sized>(min_distance: f64, max_distance: f64, rng: &mut R) -> Self {
        Self::new(place_endpoint(min_distance, max_distance, rng))
    }

    /// Distance between the two anchors.
    #[inline]
    #[must_use]
    pub fn span(&self) -> f64 {
        self.origin.distance_to(self.endpoint)
    }

    /// Both anchors, origin first.
    #[inline]
    #[must_use]
    pub const fn as_array(&self) -> [Coordinate; 2] {
        [self.origin, self.endpoint]
    }
}

/// Picks an endpoint at a uniform random distance in
/// `[min_distance, max_distance]` and a uniform random angle in `[0, 2π)`.
///
/// The returned tile always lies inside the annulus. That needs the annulus
/// to hold a whole tile: it must be at least one tile wide or have an integer
/// `min_distance`. [`MapConfig::validate`] enforces the width.
///
/// # Panics
///
/// Debug builds panic if `min_distance > max_distance`, or if the annulus is
/// narrower than a tile and `min_distance` is not an integer.
///
/// [`MapConfig::validate`]: crate::config::MapConfig::validate
pub fn place_endpoint<R: Rng + ?Sized>(min_distance: f64, max_distance: f64, rng: &mut R) -> Coordinate {
    debug_assert!(
        min_distance <= max_distance,
        "min_distance {min_distance} > max_distance {max_distance}"
    );
    debug_assert!(
        max_distance - min_distance >= 1.0 || min_distance.fract() == 0.0,
        "annulus [{min_distance}, {max_distance}] holds no whole tile"
    );

    let mut angle = 0.0;
    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let distance = if max_distance > min_distance {
            rng.gen_range(min_distance..max_distance)
        } else {
            min_distance
        };
        angle = rng.gen_range(0.0..TAU);

        let candidate = polar_to_tile(distance, angle);
        let actual = Coordinate::ORIGIN.distance_to(candidate);
        if actual >= min_distance && actual <= max_distance {
            return candidate;
        }
    }

    // ceil(min_distance) is still inside the annulus here.
    axis_fallback(min_distance, angle)
}

/// Rounds a polar point to the nearest tile.
#[inline]
fn polar_to_tile(distance: f64, angle: f64) -> Coordinate {
    Coordinate::new(
        (distance * angle.cos()).round() as i32,
        (distance * angle.sin()).round() as i32,
    )
}

/// On-axis tile at `ceil(min_distance)` along the axis nearest to `angle`.
fn axis_fallback(min_distance: f64, angle: f64) -> Coordinate {
    let reach = min_distance.max(0.0).ceil() as i32;
    let quadrant = ((angle / TAU * 4.0).round() as i32).rem_euclid(4);
    match quadrant {
        0 => Coordinate::new(reach, 0),
        1 => Coordinate::new(0, reach),
        2 => Coordinate::new(-reach, 0),
        _ => Coordinate::new(0, -reach),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::WorldSeed;

    #[test]
    fn test_endpoint_within_annulus() {
        let mut rng = WorldSeed::new(42).rng();
        for _ in 0..1_000 {
            let endpoint = place_endpoint(40.0, 60.0, &mut rng);
            let distance = Coordinate::ORIGIN.distance_to(endpoint);
            assert!((40.0..=60.0).contains(&distance), "{endpoint} at {distance}");
        }
    }

    #[test]
    fn test_placement_is_deterministic() {
        let a = AnchorPair::place(40.0, 60.0, &mut WorldSeed::new(5).rng());
        let b = AnchorPair::place(40.0, 60.0, &mut WorldSeed::new(5).rng());
        assert_eq!(a, b);
        assert_eq!(a.origin, Coordinate::ORIGIN);
    }

    #[test]
    fn test_exact_distance_annulus() {
        // A one-tile-wide annulus still lands inside.
        let mut rng = WorldSeed::new(8).rng();
        for _ in 0..200 {
            let endpoint = place_endpoint(10.0, 11.0, &mut rng);
            let distance = Coordinate::ORIGIN.distance_to(endpoint);
            assert!((10.0..=11.0).contains(&distance), "{endpoint} at {distance}");
        }
    }

    #[test]
    fn test_axis_fallback_quadrants() {
        assert_eq!(axis_fallback(4.2, 0.1), Coordinate::new(5, 0));
        assert_eq!(axis_fallback(4.2, TAU / 4.0), Coordinate::new(0, 5));
        assert_eq!(axis_fallback(4.2, TAU / 2.0), Coordinate::new(-5, 0));
        assert_eq!(axis_fallback(4.2, TAU * 0.75), Coordinate::new(0, -5));
        assert_eq!(axis_fallback(4.2, TAU * 0.99), Coordinate::new(5, 0));
    }

    #[test]
    fn test_integer_circle_lands_on_circle() {
        let mut rng = WorldSeed::new(13).rng();
        for _ in 0..50 {
            let endpoint = place_endpoint(10.0, 10.0, &mut rng);
            assert_eq!(Coordinate::ORIGIN.distance_to(endpoint), 10.0, "{endpoint}");
        }
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "holds no whole tile")]
    fn test_sub_tile_annulus_panics_in_debug() {
        let _ = place_endpoint(10.5, 10.5, &mut WorldSeed::new(1).rng());
    }

    #[test]
    fn test_zero_distance_is_origin() {
        let endpoint = place_endpoint(0.0, 0.0, &mut WorldSeed::new(1).rng());
        assert_eq!(endpoint, Coordinate::ORIGIN);
    }
}
