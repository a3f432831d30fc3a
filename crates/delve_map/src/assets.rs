//! # Feature Assets
//!
//! Named tile assets the generator paints with, and the loader seam that
//! resolves them.
//!
//! Loading is the only asynchronous step in the whole system. It happens once
//! during [`MapGenerator::initialize`](crate::MapGenerator::initialize) and can
//! be cancelled with a [`CancellationToken`].

use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{MapError, MapResult};

/// Asset painted on every present tile.
pub const GROUND_TILE_ASSET: &str = "GroundRuleTile";
/// Asset marking the origin anchor.
pub const ENTRANCE_ASSET: &str = "Entrance";
/// Asset marking the endpoint anchor.
pub const EXIT_ASSET: &str = "Exit";

/// Opaque handle to a loaded asset. Cheap to clone.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AssetHandle {
    name: Arc<str>,
}

impl AssetHandle {
    /// Creates a handle for a named asset.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self { name: name.into() }
    }

    /// Asset name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for AssetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Errors reported by an [`AssetLoader`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    /// No asset with this name exists.
    #[error("asset `{name}` not found")]
    NotFound {
        /// Requested name.
        name: String,
    },

    /// The asset exists but could not be produced.
    #[error("asset `{name}` unavailable: {reason}")]
    Unavailable {
        /// Requested name.
        name: String,
        /// Backend specific reason.
        reason: String,
    },
}

/// Resolves asset names to handles.
pub trait AssetLoader: Send + Sync {
    /// Loads the asset called `name`.
    fn load_by_name(&self, name: &str) -> impl Future<Output = Result<AssetHandle, AssetError>> + Send;
}

/// Special tiles placed on the anchors of an irregular map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapFeature {
    /// Start of the map, at the origin anchor.
    Entrance,
    /// End of the map, at the endpoint anchor.
    Exit,
}

impl MapFeature {
    /// Every feature, in load order.
    pub const ALL: [Self; 2] = [Self::Entrance, Self::Exit];

    /// Name of the asset backing this feature.
    #[inline]
    #[must_use]
    pub const fn asset_name(self) -> &'static str {
        match self {
            Self::Entrance => ENTRANCE_ASSET,
            Self::Exit => EXIT_ASSET,
        }
    }
}

/// Handles for the ground tile and every feature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeatureRegistry {
    ground: AssetHandle,
    entrance: AssetHandle,
    exit: AssetHandle,
}

impl FeatureRegistry {
    /// Builds a registry from already loaded handles.
    #[must_use]
    pub const fn new(ground: AssetHandle, entrance: AssetHandle, exit: AssetHandle) -> Self {
        Self { ground, entrance, exit }
    }

    /// Handle painted on present tiles.
    #[inline]
    #[must_use]
    pub const fn ground(&self) -> &AssetHandle {
        &self.ground
    }

    /// Handle for a feature.
    #[inline]
    #[must_use]
    pub const fn feature(&self, feature: MapFeature) -> &AssetHandle {
        match feature {
            MapFeature::Entrance => &self.entrance,
            MapFeature::Exit => &self.exit,
        }
    }
}

/// In-memory loader over a fixed set of names, with optional latency.
#[derive(Clone, Debug, Default)]
pub struct StaticAssetLoader {
    known: HashSet<String>,
    latency: Option<Duration>,
}

impl StaticAssetLoader {
    /// Loader that knows the given names.
    #[must_use]
    pub fn with_assets<I, N>(names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        Self {
            known: names.into_iter().map(Into::into).collect(),
            latency: None,
        }
    }

    /// Loader that knows the ground tile and both features.
    #[must_use]
    pub fn standard() -> Self {
        Self::with_assets([GROUND_TILE_ASSET, ENTRANCE_ASSET, EXIT_ASSET])
    }

    /// Delays every load by `latency`.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Forgets `name`, so loading it fails.
    #[must_use]
    pub fn without(mut self, name: &str) -> Self {
        self.known.remove(name);
        self
    }
}

impl AssetLoader for StaticAssetLoader {
    fn load_by_name(&self, name: &str) -> impl Future<Output = Result<AssetHandle, AssetError>> + Send {
        let latency = self.latency;
        let found = self.known.contains(name);
        let name = name.to_owned();

        async move {
            if let Some(latency) = latency {
                tokio::time::sleep(latency).await;
            }
            if found {
                Ok(AssetHandle::new(name))
            } else {
                Err(AssetError::NotFound { name })
            }
        }
    }
}

/// Loads the ground tile and every feature asset.
///
/// # Errors
///
/// [`MapError::Cancelled`] if `cancel` fires first, otherwise
/// [`MapError::AssetLoadFailure`] for the first asset that fails.
pub async fn load_registry<L: AssetLoader>(loader: &L, cancel: &CancellationToken) -> MapResult<FeatureRegistry> {
    let ground = load_one(loader, GROUND_TILE_ASSET, cancel).await?;
    let entrance = load_one(loader, MapFeature::Entrance.asset_name(), cancel).await?;
    let exit = load_one(loader, MapFeature::Exit.asset_name(), cancel).await?;
    Ok(FeatureRegistry::new(ground, entrance, exit))
}

async fn load_one<L: AssetLoader>(loader: &L, name: &str, cancel: &CancellationToken) -> MapResult<AssetHandle> {
    let handle = tokio::select! {
        biased;

        () = cancel.cancelled() => return Err(MapError::Cancelled),

        result = loader.load_by_name(name) => result.map_err(|source| MapError::AssetLoadFailure {
            name: name.to_owned(),
            source,
        })?,
    };
    debug!(asset = name, "asset loaded");
    Ok(handle)
}
