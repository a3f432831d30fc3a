//! # Layout Builder
//!
//! Runs the whole pure pipeline for one map:
//!
//! 1. **Plan** - draw the random inputs (endpoint, then noise offset)
//! 2. **Bounds** - size the region around both anchors
//! 3. **Sample** - evaluate noise over the region
//! 4. **Classify** - carve the zone or threshold the rectangle
//! 5. **Prune** - fill small components (irregular mode only)
//!
//! Planning and building are split so a plan can be stored and replayed:
//! the same seed and the same plan always build the same layout. A replayed
//! plan is checked against the config before anything is sized from it.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::anchor::{place_endpoint, AnchorPair};
use crate::classify::{carve_zone_contains, classify_anchored, classify_uniform};
use crate::config::{GenerationMode, MapConfig, OFFSET_RANGE};
use crate::error::{ConfigError, ConfigResult};
use crate::grid::{Bounds, CellGrid, Coordinate};
use crate::noise::{NoiseField, SimplexNoise, WorldSeed};
use crate::prune::{prune_where, PruneStats};

/// The random inputs of one generation pass.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationPlan {
    /// Endpoint anchor. `None` for rectangular maps.
    pub endpoint: Option<Coordinate>,
    /// Noise-space offset added to both axes.
    pub offset: f64,
}

impl GenerationPlan {
    /// Checks that this plan can be built under `config`.
    ///
    /// Irregular plans need an endpoint inside the distance annulus,
    /// rectangular plans must not carry one, and the offset must be finite.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::PlanModeMismatch`] or
    /// [`ConfigError::EndpointOutOfRange`] for a bad endpoint and
    /// [`ConfigError::OutOfRange`] for a non-finite offset.
    pub fn validate(&self, config: &MapConfig) -> ConfigResult<()> {
        match (config.mode, self.endpoint) {
            (GenerationMode::Irregular, None) => {
                return Err(ConfigError::PlanModeMismatch {
                    expected: "irregular plans need an endpoint",
                });
            }
            (GenerationMode::Irregular, Some(endpoint)) => {
                let distance = Coordinate::ORIGIN.distance_to(endpoint);
                if distance < config.min_distance || distance > config.max_distance {
                    return Err(ConfigError::EndpointOutOfRange {
                        endpoint,
                        distance,
                        min: config.min_distance,
                        max: config.max_distance,
                    });
                }
            }
            (GenerationMode::Rectangular { .. }, Some(_)) => {
                return Err(ConfigError::PlanModeMismatch {
                    expected: "rectangular plans carry no endpoint",
                });
            }
            (GenerationMode::Rectangular { .. }, None) => {}
        }

        if self.offset.is_finite() {
            Ok(())
        } else {
            Err(ConfigError::OutOfRange {
                name: "offset",
                value: self.offset,
                expected: "finite",
            })
        }
    }
}

/// A fully built map, not yet committed anywhere.
#[derive(Clone, Debug, PartialEq)]
pub struct MapLayout {
    /// Region the grid covers.
    pub bounds: Bounds,
    /// Final tile statuses.
    pub grid: CellGrid,
    /// Anchors for irregular maps.
    pub anchors: Option<AnchorPair>,
    /// Plan this layout was built from.
    pub plan: GenerationPlan,
    /// Prune results for irregular maps.
    pub prune: Option<PruneStats>,
}

/// Builds layouts for one validated config and noise seed.
#[derive(Clone, Debug)]
pub struct LayoutBuilder {
    config: MapConfig,
    noise: SimplexNoise,
}

impl LayoutBuilder {
    /// Validates `config` and prepares the noise source.
    ///
    /// # Errors
    ///
    /// Returns the first violated precondition of `config`.
    pub fn new(config: MapConfig, noise_seed: WorldSeed) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            noise: SimplexNoise::new(noise_seed),
        })
    }

    /// The config this builder was created with.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Draws a fresh plan. The endpoint is drawn before the offset.
    pub fn plan<R: Rng + ?Sized>(&self, rng: &mut R) -> GenerationPlan {
        let endpoint = match self.config.mode {
            GenerationMode::Irregular => Some(place_endpoint(
                self.config.min_distance,
                self.config.max_distance,
                rng,
            )),
            GenerationMode::Rectangular { .. } => None,
        };
        let offset = f64::from(rng.gen_range(OFFSET_RANGE));
        GenerationPlan { endpoint, offset }
    }

    /// Validates `plan` against the config and builds its layout.
    ///
    /// # Errors
    ///
    /// Returns the error from [`GenerationPlan::validate`].
    pub fn build(&self, plan: &GenerationPlan) -> ConfigResult<MapLayout> {
        plan.validate(&self.config)?;
        Ok(self.assemble(plan))
    }

    /// Plans and builds in one step.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> MapLayout {
        let plan = self.plan(rng);
        debug_assert!(plan.validate(&self.config).is_ok(), "drawn plan {plan:?} is invalid");
        self.assemble(&plan)
    }

    fn assemble(&self, plan: &GenerationPlan) -> MapLayout {
        match self.config.mode {
            GenerationMode::Irregular => self.build_irregular(plan),
            GenerationMode::Rectangular { origin, width, height } => {
                self.build_rectangular(plan, Bounds::new(origin, width, height))
            }
        }
    }

    fn sample(&self, bounds: Bounds, offset: f64) -> NoiseField {
        let field = NoiseField::sample_layered(
            &self.noise,
            offset,
            self.config.scale,
            bounds.width as usize,
            bounds.height as usize,
            self.config.octaves,
        );
        debug!(cells = field.values().len(), offset, "noise field sampled");
        field
    }

    fn build_irregular(&self, plan: &GenerationPlan) -> MapLayout {
        let config = &self.config;
        let anchors = AnchorPair::new(plan.endpoint.unwrap_or(Coordinate::ORIGIN));
        let bounds = Bounds::around_anchors(anchors.origin, anchors.endpoint, config.radius, config.border);
        debug!(
            endpoint = %anchors.endpoint,
            min = %bounds.min,
            max = %bounds.max(),
            "sized region around anchors"
        );

        let field = self.sample(bounds, plan.offset);
        let mut grid = classify_anchored(&field, bounds, &anchors, config.radius, config.empty_probability);
        // Tiles outside both carve zones stay solid.
        let stats = prune_where(&mut grid, config.prune_status, config.cave_size_threshold, |coord| {
            carve_zone_contains(&anchors, config.radius, coord)
        });

        MapLayout {
            bounds,
            grid,
            anchors: Some(anchors),
            plan: *plan,
            prune: Some(stats),
        }
    }

    fn build_rectangular(&self, plan: &GenerationPlan, bounds: Bounds) -> MapLayout {
        let field = self.sample(bounds, plan.offset);
        let grid = classify_uniform(&field, bounds, self.config.empty_probability);

        MapLayout {
            bounds,
            grid,
            anchors: None,
            plan: GenerationPlan {
                endpoint: None,
                offset: plan.offset,
            },
            prune: None,
        }
    }
}
