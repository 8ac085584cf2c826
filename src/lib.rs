//! terraplan-area - the area calculation engine behind the resource planner
//!
//! Turns pixel polygons drawn on georeferenced aerial imagery into
//! real-world area measurements, corrected for oblique capture. The same
//! deterministic geometry runs here and in the interactive client, so the
//! hover feedback a user sees matches the authoritative number the server
//! returns.
//!
//! # Examples
//!
//! ## Measuring a drawn polygon
//!
//! ```
//! use std::sync::Arc;
//! use terraplan_area::{
//!     AreaService, CatalogProvider, FixtureDetector, GroundBounds, ImageMetadata, PixelPoint,
//! };
//!
//! let catalog = CatalogProvider::from_entries([(
//!     "site.tif".to_string(),
//!     ImageMetadata {
//!         width: 100,
//!         height: 100,
//!         count: 3,
//!         dtype: "uint8".to_string(),
//!         crs: Some("EPSG:32632".to_string()),
//!         bounds: Some(GroundBounds {
//!             lower_left_x: 0.0,
//!             lower_left_y: 0.0,
//!             upper_right_x: 50.0,
//!             upper_right_y: 50.0,
//!         }),
//!         camera: None,
//!     },
//! )])?;
//!
//! let service = AreaService::new(Arc::new(catalog), Arc::new(FixtureDetector::new()));
//!
//! let square = vec![
//!     PixelPoint::new(0.0, 0.0),
//!     PixelPoint::new(20.0, 0.0),
//!     PixelPoint::new(20.0, 20.0),
//!     PixelPoint::new(0.0, 20.0),
//! ];
//! let measurement = service.measure_polygon("site.tif", square)?;
//!
//! assert_eq!(measurement.calculated_area.pixel_area, 400.0);
//! assert_eq!(measurement.calculated_area.apparent_area_m2, 100.0);
//! # Ok::<(), terraplan_area::Error>(())
//! ```

pub mod angles;
pub mod api;
pub mod correction;
pub mod detector;
pub mod error;
pub mod geometry;
pub mod georef;
pub mod metadata;
pub mod service;
pub mod types;

pub use correction::AreaResult;
pub use detector::{AutoDetector, FixtureDetector};
pub use error::{Error, Result};
pub use georef::Georeference;
pub use metadata::{
    CameraOrientation, CatalogProvider, GroundBounds, ImageMetadata, MetadataProvider,
};
pub use service::{AreaService, BatchTotals, Measurement};
pub use types::{PixelPoint, Polygon};
