//! Image metadata model and the catalog-backed provider

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Ground bounding box in the CRS's projected units (meters)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundBounds {
    pub lower_left_x: f64,
    pub lower_left_y: f64,
    pub upper_right_x: f64,
    pub upper_right_y: f64,
}

impl GroundBounds {
    /// Ground extent along x in meters
    pub fn width_m(&self) -> f64 {
        self.upper_right_x - self.lower_left_x
    }

    /// Ground extent along y in meters
    pub fn height_m(&self) -> f64 {
        self.upper_right_y - self.lower_left_y
    }

    /// Upper-right must lie strictly above and to the right of lower-left
    pub fn is_valid(&self) -> bool {
        self.width_m() > 0.0 && self.height_m() > 0.0
    }
}

/// Camera capture orientation in degrees, as recorded by the platform.
/// Pitch of -90 points straight down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraOrientation {
    pub pitch_deg: f64,
    pub roll_deg: f64,
}

/// Metadata for one catalogued image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageMetadata {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Number of raster bands
    pub count: u32,
    /// Pixel data type name, e.g. "uint8"
    pub dtype: String,
    /// Coordinate reference system identifier, when georeferenced
    #[serde(default)]
    pub crs: Option<String>,
    /// Ground bounding box, when georeferenced
    #[serde(default)]
    pub bounds: Option<GroundBounds>,
    /// Capture orientation, when the platform recorded one
    #[serde(default)]
    pub camera: Option<CameraOrientation>,
}

impl ImageMetadata {
    /// Checks the structural invariants of a catalog entry
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::Catalog(format!(
                "image dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if let Some(bounds) = &self.bounds {
            if !bounds.is_valid() {
                return Err(Error::Catalog(
                    "ground bounds must have positive extent".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Whether the image carries a usable georeference
    pub fn is_georeferenced(&self) -> bool {
        self.crs.is_some() && self.bounds.is_some()
    }
}

/// Capability for looking up image metadata by identifier
pub trait MetadataProvider: Send + Sync {
    /// Returns the metadata for an image, or `ImageNotFound`
    fn metadata(&self, image_id: &str) -> Result<ImageMetadata>;
}

/// Metadata provider backed by a JSON catalog loaded once at startup.
///
/// The map is never mutated after loading, so concurrent lookups need no
/// further synchronization.
pub struct CatalogProvider {
    entries: DashMap<String, ImageMetadata>,
}

impl CatalogProvider {
    /// Loads and validates a catalog file mapping image identifiers to
    /// metadata records.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let parsed: HashMap<String, ImageMetadata> = serde_json::from_str(&raw)?;
        Self::from_entries(parsed)
    }

    /// Builds a provider from in-memory entries, validating each
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, ImageMetadata)>,
    {
        let map = DashMap::new();
        for (image_id, metadata) in entries {
            metadata
                .validate()
                .map_err(|e| Error::Catalog(format!("{}: {}", image_id, e)))?;
            map.insert(image_id, metadata);
        }
        Ok(Self { entries: map })
    }

    /// Number of catalogued images
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl MetadataProvider for CatalogProvider {
    fn metadata(&self, image_id: &str) -> Result<ImageMetadata> {
        self.entries
            .get(image_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| Error::ImageNotFound(image_id.to_string()))
    }
}
