//! Catalog module: the `Track` model, catalog sources and display helpers.
//!
//! Tracks are read-only values owned by a `Catalog`. The player only ever
//! holds clones handed to it by the runtime.

mod catalog;
mod display;
mod manifest;
mod model;
mod scan;

pub use catalog::{Catalog, CatalogError};
pub use display::{display_from_fields, format_time};
pub use manifest::ManifestCatalog;
pub use model::Track;
pub use scan::DirectoryCatalog;
