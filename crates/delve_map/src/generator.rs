//! # Map Generator
//!
//! Drives one tile surface through the map lifecycle.
//!
//! ## State Machine
//!
//! ```text
//! Uninitialized ──initialize──► Idle ──generate──► Generating ──► Ready
//!                                ▲                                 │
//!                                └────────── Clearing ◄──clear─────┘
//! ```
//!
//! `generate_map` from `Ready` replaces the current map, and `clear_map` from
//! `Idle` is allowed. Everything else is refused with
//! [`MapError::InvalidState`].
//!
//! ## Commit
//!
//! A map is built completely in memory first. Only then is the surface
//! cleared and every present tile written, row-major. A caller never sees a
//! half-pruned map.

use std::fmt;
use std::sync::Arc;

use delve_procedural::{
    Bounds, Coordinate, GenerationPlan, LayoutBuilder, MapConfig, MapLayout, PruneStats, WorldSeed,
};
use parking_lot::Mutex;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::assets::{load_registry, AssetLoader, FeatureRegistry, MapFeature};
use crate::error::{MapError, MapResult};
use crate::surface::{SurfaceHost, TileSurface};

/// Tag of the surface maps are painted on.
pub const GROUND_SURFACE_TAG: &str = "groundTile";

/// Seed stream feeding the noise permutation table.
const NOISE_STREAM: u64 = 1;
/// Seed stream feeding endpoint and offset draws.
const PLACEMENT_STREAM: u64 = 2;

/// Lifecycle state of a [`MapGenerator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MapState {
    /// Surface and assets not resolved yet.
    Uninitialized,
    /// Ready to generate, nothing on the surface.
    Idle,
    /// Building and committing a map.
    Generating,
    /// A map is on the surface.
    Ready,
    /// Removing the current map.
    Clearing,
}

impl fmt::Display for MapState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Uninitialized => "uninitialized",
            Self::Idle => "idle",
            Self::Generating => "generating",
            Self::Ready => "ready",
            Self::Clearing => "clearing",
        })
    }
}

/// Feature tile placed on an anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct AnchorSlot {
    /// Which feature goes here.
    pub feature: MapFeature,
    /// Where it goes.
    pub coord: Coordinate,
}

/// Summary of one committed map.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GenerationReport {
    /// Tiles written to the surface.
    pub cells_written: usize,
    /// Plan the map was built from. Pass it to
    /// [`MapGenerator::regenerate`] to rebuild the same map.
    pub plan: GenerationPlan,
    /// Region the map covers.
    pub bounds: Bounds,
    /// Entrance and exit positions. Empty for rectangular maps.
    pub anchors: Vec<AnchorSlot>,
    /// Pruning results. `None` for rectangular maps.
    pub prune: Option<PruneStats>,
}

/// Orchestrates map generation onto a tile surface.
pub struct MapGenerator<S: TileSurface> {
    seed: WorldSeed,
    builder: LayoutBuilder,
    rng: ChaCha8Rng,
    state: MapState,
    surface: Option<S>,
    layout: Option<MapLayout>,
}

impl<S: TileSurface> MapGenerator<S> {
    /// Creates an uninitialized generator.
    ///
    /// # Errors
    ///
    /// [`MapError::PreconditionViolation`] if `config` is invalid.
    pub fn new(config: MapConfig, seed: WorldSeed) -> MapResult<Self> {
        let builder = LayoutBuilder::new(config, seed.derive(NOISE_STREAM))?;
        Ok(Self {
            seed,
            builder,
            rng: seed.derive(PLACEMENT_STREAM).rng(),
            state: MapState::Uninitialized,
            surface: None,
            layout: None,
        })
    }

    /// Current lifecycle state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> MapState {
        self.state
    }

    /// Seed this generator was created with.
    #[inline]
    #[must_use]
    pub const fn seed(&self) -> WorldSeed {
        self.seed
    }

    /// Active configuration.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &MapConfig {
        self.builder.config()
    }

    /// Layout currently on the surface.
    #[inline]
    #[must_use]
    pub const fn layout(&self) -> Option<&MapLayout> {
        self.layout.as_ref()
    }

    /// Locates the ground surface and loads every feature asset.
    ///
    /// # Errors
    ///
    /// - [`MapError::InvalidState`] unless the generator is uninitialized
    /// - [`MapError::MissingCollaborator`] if no surface is tagged
    ///   [`GROUND_SURFACE_TAG`]
    /// - [`MapError::AssetLoadFailure`] or [`MapError::Cancelled`] from loading
    ///
    /// The generator stays uninitialized on error and can be retried.
    pub async fn initialize<H, L>(
        &mut self,
        host: &H,
        loader: &L,
        cancel: &CancellationToken,
    ) -> MapResult<FeatureRegistry>
    where
        H: SurfaceHost<Surface = S>,
        L: AssetLoader,
    {
        self.expect_state("initialize", &[MapState::Uninitialized])?;

        let Some(surface) = host.find_surface(GROUND_SURFACE_TAG) else {
            error!(tag = GROUND_SURFACE_TAG, "tile surface not found");
            return Err(MapError::MissingCollaborator {
                tag: GROUND_SURFACE_TAG.to_owned(),
            });
        };

        let registry = match load_registry(loader, cancel).await {
            Ok(registry) => registry,
            Err(err) => {
                error!(%err, "map initialization failed");
                return Err(err);
            }
        };

        self.surface = Some(surface);
        self.state = MapState::Idle;
        info!(seed = self.seed.value(), "map generator initialized");
        Ok(registry)
    }

    /// Draws a fresh plan, builds it and commits it to the surface.
    ///
    /// # Errors
    ///
    /// [`MapError::InvalidState`] unless the generator is idle or ready.
    pub fn generate_map(&mut self, registry: &FeatureRegistry) -> MapResult<GenerationReport> {
        self.expect_state("generate a map", &[MapState::Idle, MapState::Ready])?;
        let plan = self.builder.plan(&mut self.rng);
        if let Some(endpoint) = plan.endpoint {
            debug!(%endpoint, offset = plan.offset, "plan drawn");
        }
        self.commit("generate a map", &plan, registry)
    }

    /// Rebuilds the map for a recorded plan without consuming randomness.
    ///
    /// # Errors
    ///
    /// [`MapError::InvalidState`] unless the generator is idle or ready, and
    /// [`MapError::PreconditionViolation`] if `plan` does not fit the config.
    /// The surface is untouched on error.
    pub fn regenerate(&mut self, plan: &GenerationPlan, registry: &FeatureRegistry) -> MapResult<GenerationReport> {
        self.expect_state("regenerate a map", &[MapState::Idle, MapState::Ready])?;
        if let Err(err) = plan.validate(self.builder.config()) {
            warn!(%err, "rejected generation plan");
            return Err(err.into());
        }
        self.commit("regenerate a map", plan, registry)
    }

    /// Removes the current map from the surface.
    ///
    /// # Errors
    ///
    /// [`MapError::InvalidState`] unless the generator is idle or ready.
    pub fn clear_map(&mut self) -> MapResult<()> {
        self.expect_state("clear the map", &[MapState::Idle, MapState::Ready])?;
        let Some(surface) = self.surface.as_mut() else {
            return Err(MapError::InvalidState {
                operation: "clear the map",
                state: self.state,
            });
        };

        self.state = MapState::Clearing;
        surface.clear_all();
        self.layout = None;

        self.state = MapState::Idle;
        info!("map cleared");
        Ok(())
    }

    fn commit(
        &mut self,
        operation: &'static str,
        plan: &GenerationPlan,
        registry: &FeatureRegistry,
    ) -> MapResult<GenerationReport> {
        let previous = self.state;
        self.state = MapState::Generating;

        let layout = match self.builder.build(plan) {
            Ok(layout) => layout,
            Err(err) => {
                self.state = previous;
                return Err(err.into());
            }
        };
        let Some(surface) = self.surface.as_mut() else {
            self.state = previous;
            return Err(MapError::InvalidState {
                operation,
                state: previous,
            });
        };

        surface.clear_all();
        let mut cells_written = 0usize;
        for coord in layout.grid.present_cells() {
            surface.set_cell(coord, registry.ground());
            cells_written += 1;
        }

        let anchors = layout.anchors.map_or_else(Vec::new, |pair| {
            vec![
                AnchorSlot {
                    feature: MapFeature::Entrance,
                    coord: pair.origin,
                },
                AnchorSlot {
                    feature: MapFeature::Exit,
                    coord: pair.endpoint,
                },
            ]
        });

        let report = GenerationReport {
            cells_written,
            plan: layout.plan,
            bounds: layout.bounds,
            anchors,
            prune: layout.prune,
        };

        info!(
            cells = cells_written,
            width = layout.bounds.width,
            height = layout.bounds.height,
            "map generated"
        );
        self.layout = Some(layout);
        self.state = MapState::Ready;
        Ok(report)
    }

    fn expect_state(&self, operation: &'static str, allowed: &[MapState]) -> MapResult<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(MapError::InvalidState {
                operation,
                state: self.state,
            })
        }
    }
}

impl<S: TileSurface> fmt::Debug for MapGenerator<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapGenerator")
            .field("seed", &self.seed)
            .field("state", &self.state)
            .field("config", self.builder.config())
            .finish_non_exhaustive()
    }
}

/// Shared handle to an initialized generator.
///
/// Calls never wait: if another caller holds the generator the call fails
/// with [`MapError::InvalidState`], reporting the generator as `Generating`.
pub struct SharedMapGenerator<S: TileSurface> {
    inner: Arc<Mutex<MapGenerator<S>>>,
}

impl<S: TileSurface> Clone for SharedMapGenerator<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: TileSurface> SharedMapGenerator<S> {
    /// Wraps a generator.
    #[must_use]
    pub fn new(generator: MapGenerator<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(generator)),
        }
    }

    /// Runs `f` with exclusive access to the generator.
    ///
    /// # Errors
    ///
    /// [`MapError::InvalidState`] if another caller holds the generator.
    pub fn with<R>(&self, operation: &'static str, f: impl FnOnce(&mut MapGenerator<S>) -> R) -> MapResult<R> {
        let Some(mut generator) = self.inner.try_lock() else {
            debug!(operation, "generator busy");
            return Err(MapError::InvalidState {
                operation,
                state: MapState::Generating,
            });
        };
        Ok(f(&mut *generator))
    }

    /// See [`MapGenerator::generate_map`].
    ///
    /// # Errors
    ///
    /// Busy, or any error of [`MapGenerator::generate_map`].
    pub fn generate_map(&self, registry: &FeatureRegistry) -> MapResult<GenerationReport> {
        self.with("generate a map", |generator| generator.generate_map(registry))?
    }

    /// See [`MapGenerator::regenerate`].
    ///
    /// # Errors
    ///
    /// Busy, or any error of [`MapGenerator::regenerate`].
    pub fn regenerate(&self, plan: &GenerationPlan, registry: &FeatureRegistry) -> MapResult<GenerationReport> {
        self.with("regenerate a map", |generator| generator.regenerate(plan, registry))?
    }

    /// See [`MapGenerator::clear_map`].
    ///
    /// # Errors
    ///
    /// Busy, or any error of [`MapGenerator::clear_map`].
    pub fn clear_map(&self) -> MapResult<()> {
        self.with("clear the map", MapGenerator::clear_map)?
    }

    /// Current state, or `None` while another caller holds the generator.
    #[must_use]
    pub fn state(&self) -> Option<MapState> {
        self.inner.try_lock().map(|generator| generator.state())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{FeatureRegistry, StaticAssetLoader};
    use crate::surface::{MemorySurface, MemorySurfaceHost};

    fn small_config() -> MapConfig {
        MapConfig {
            min_distance: 8.0,
            max_distance: 12.0,
            radius: 6.0,
            cave_size_threshold: 4,
            ..MapConfig::default()
        }
    }

    async fn ready_generator(seed: u64) -> (MapGenerator<MemorySurface>, FeatureRegistry, MemorySurface) {
        let surface = MemorySurface::new();
        let host = MemorySurfaceHost::new().with_surface(GROUND_SURFACE_TAG, surface.clone());
        let mut generator = MapGenerator::new(small_config(), WorldSeed::new(seed)).unwrap();
        let registry = generator
            .initialize(&host, &StaticAssetLoader::standard(), &CancellationToken::new())
            .await
            .unwrap();
        (generator, registry, surface)
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = MapConfig {
            empty_probability: -0.5,
            ..MapConfig::default()
        };
        let err = MapGenerator::<MemorySurface>::new(config, WorldSeed::new(1)).unwrap_err();
        assert!(matches!(err, MapError::PreconditionViolation(_)));
    }

    #[test]
    fn test_uninitialized_refuses_work() {
        let mut generator = MapGenerator::<MemorySurface>::new(small_config(), WorldSeed::new(1)).unwrap();
        assert_eq!(generator.state(), MapState::Uninitialized);
        assert!(matches!(
            generator.clear_map(),
            Err(MapError::InvalidState {
                state: MapState::Uninitialized,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_generate_writes_present_cells() {
        let (mut generator, registry, surface) = ready_generator(11).await;
        let report = generator.generate_map(&registry).unwrap();

        assert_eq!(generator.state(), MapState::Ready);
        assert_eq!(surface.len(), report.cells_written);
        let layout = generator.layout().unwrap();
        assert_eq!(report.cells_written, layout.grid.present_cells().count());
        assert_eq!(report.anchors.len(), 2);
        assert_eq!(report.anchors[0].feature, MapFeature::Entrance);
        assert_eq!(report.anchors[0].coord, Coordinate::ORIGIN);
        assert_eq!(Some(report.anchors[1].coord), report.plan.endpoint);
    }

    #[tokio::test]
    async fn test_clear_then_regenerate_same_plan() {
        let (mut generator, registry, surface) = ready_generator(12).await;
        let report = generator.generate_map(&registry).unwrap();
        let first = surface.occupied();

        generator.clear_map().unwrap();
        assert_eq!(generator.state(), MapState::Idle);
        assert!(surface.is_empty());
        assert!(generator.layout().is_none());

        let replay = generator.regenerate(&report.plan, &registry).unwrap();
        assert_eq!(replay, report);
        assert_eq!(surface.occupied(), first);
    }

    #[tokio::test]
    async fn test_regenerate_rejects_plan_outside_annulus() {
        let (mut generator, registry, surface) = ready_generator(16).await;
        let report = generator.generate_map(&registry).unwrap();
        let painted = surface.occupied();

        let far = GenerationPlan {
            endpoint: Some(Coordinate::new(900, 0)),
            ..report.plan
        };
        let err = generator.regenerate(&far, &registry).unwrap_err();
        assert!(matches!(err, MapError::PreconditionViolation(_)));

        assert_eq!(generator.state(), MapState::Ready);
        assert_eq!(surface.occupied(), painted);
        assert_eq!(generator.layout().unwrap().plan, report.plan);
    }

    #[tokio::test]
    async fn test_generate_from_ready_replaces_map() {
        let (mut generator, registry, surface) = ready_generator(13).await;
        generator.generate_map(&registry).unwrap();
        let second = generator.generate_map(&registry).unwrap();

        assert_eq!(surface.len(), second.cells_written);
        for coord in surface.occupied() {
            assert!(second.bounds.contains(coord), "{coord} left over from the first map");
        }
    }

    #[tokio::test]
    async fn test_initialize_twice_refused() {
        let (mut generator, _, surface) = ready_generator(14).await;
        let host = MemorySurfaceHost::new().with_surface(GROUND_SURFACE_TAG, surface);
        let err = generator
            .initialize(&host, &StaticAssetLoader::standard(), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, MapError::InvalidState { state: MapState::Idle, .. }));
    }

    #[tokio::test]
    async fn test_shared_generator_refuses_reentry() {
        let (generator, registry, _) = ready_generator(15).await;
        let shared = SharedMapGenerator::new(generator);
        let other = shared.clone();

        let nested = shared
            .with("inspect", |_| other.generate_map(&registry))
            .unwrap();
        assert!(matches!(
            nested,
            Err(MapError::InvalidState {
                state: MapState::Generating,
                ..
            })
        ));

        other.generate_map(&registry).unwrap();
        assert_eq!(shared.state(), Some(MapState::Ready));
        shared.clear_map().unwrap();
        assert_eq!(other.state(), Some(MapState::Idle));
    }
}
