//! K2C9 - Sky position queries against the K2 Campaign 9 footprint
//!
//! This library answers two questions about sky positions given as free-form
//! text: does each position fall inside the K2 Campaign 9 observed region,
//! and what does the footprint look like around them.
//!
//! # Example
//!
//! ```
//! use k2c9::query::QueryService;
//! use k2c9::render::RenderConfig;
//!
//! let service = QueryService::with_builtin(RenderConfig::default()).unwrap();
//! let text = service
//!     .in_region(Some("270.0 -28.0,18:04:00 -30:00:00"), Some("csv"))
//!     .unwrap();
//! assert_eq!(
//!     text,
//!     "position,in_region\r\n270.0 -28.0,yes\r\n18:04:00 -30:00:00,no\r\n"
//! );
//! ```
//!
//! # Modules
//!
//! - [`coord`] parses one position string into a [`Position`]
//! - [`batch`] splits a comma-separated query and resolves it all-or-nothing
//! - [`footprint`] holds the polygon geometry and the [`Footprint`] trait
//! - [`membership`] evaluates positions against a footprint
//! - [`format`] produces the plain and CSV text responses
//! - [`render`] draws footprint maps as PNG or JPEG
//! - [`query`] ties the above into [`QueryService`]
//! - [`config`] and [`logging`] provide the ambient setup for binaries

pub mod batch;
pub mod config;
pub mod coord;
pub mod error;
pub mod footprint;
pub mod format;
pub mod logging;
pub mod membership;
pub mod query;
pub mod render;

pub use coord::{parse_position, CoordError, Position};
pub use error::QueryError;
pub use footprint::{Footprint, FootprintError, FootprintGeometry};
pub use query::{QueryService, VisibilityReport};
