//! The nali library: find IPv4 addresses in text and annotate them with
//! offline geolocation.
//!
//! # Examples
//!
//! Annotating a line without a database still marks the address:
//!
//! ```
//! use nali::{AppConfig, Annotator, Extractor, GeoLocator};
//!
//! let mut annotator = Annotator::new(Extractor::new()?, GeoLocator::unavailable());
//! let line = annotator.annotate("ping 8.8.8.8", &AppConfig { color: false });
//! assert_eq!(line, "ping 8.8.8.8 <>");
//! # Ok::<(), nali::Error>(())
//! ```

pub mod annotate;
pub mod command;
pub mod encoding;
pub mod error;
pub mod extractor;
pub mod geoip;
pub mod input;
pub mod mmdb;
pub mod search_path;

pub use crate::annotate::{AppConfig, Annotator};
pub use crate::command::{Command, Mode};
pub use crate::error::{Error, Result};
pub use crate::extractor::Extractor;
pub use crate::geoip::{Descriptor, GeoLocator};
pub use crate::mmdb::{DatabaseInfo, GeoDatabase, MaxMindDatabase};
pub use crate::search_path::SearchPath;
