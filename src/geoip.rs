use std::fmt;
use std::net::Ipv4Addr;

use crate::error::{Error, Result};
use crate::mmdb::{GeoDatabase, MaxMindDatabase};
use crate::search_path::SearchPath;

/// Language of the names returned by lookups (MaxMind simplified Chinese).
pub const DEFAULT_LOCALE: &str = "zh-CN";

/// The joined, trimmed location fields for one address. Possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Descriptor(String);

impl Descriptor {
    /// Join `fields` with single spaces and trim surrounding spaces.
    ///
    /// Empty fields still contribute their separator, so a missing middle
    /// field shows up as a double space.
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Self {
        let joined = fields
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(" ");
        Descriptor(joined.trim_matches(' ').to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolves addresses to descriptors against an optional database.
///
/// A locator without a database answers every lookup with an empty
/// descriptor, which is how a missing database file looks while annotating.
#[derive(Debug)]
pub struct GeoLocator {
    db: Option<Box<dyn GeoDatabase>>,
}

impl GeoLocator {
    pub fn new(db: Box<dyn GeoDatabase>) -> Self {
        Self { db: Some(db) }
    }

    /// A locator that never finds anything.
    pub fn unavailable() -> Self {
        Self { db: None }
    }

    /// Open the MaxMind database chosen by `search_path`.
    pub fn open(search_path: &SearchPath) -> Result<Self> {
        let db = MaxMindDatabase::open(search_path.resolve())?;
        Ok(Self::new(Box::new(db)))
    }

    /// Open the database, falling back to an empty locator on failure.
    pub fn open_or_unavailable(search_path: &SearchPath) -> Self {
        match Self::open(search_path) {
            Ok(locator) => locator,
            Err(err) => {
                tracing::debug!(error = %err, "database unavailable, lookups will be empty");
                Self::unavailable()
            }
        }
    }

    pub fn database(&self) -> Option<&dyn GeoDatabase> {
        self.db.as_deref()
    }

    /// Query the database for `addr`, surfacing every failure.
    pub fn try_lookup(&self, addr: &str) -> Result<Descriptor> {
        let ip: Ipv4Addr = addr.parse().map_err(|_| Error::InvalidAddress {
            ip: addr.to_string(),
        })?;
        let Some(db) = self.db.as_deref() else {
            return Ok(Descriptor::default());
        };
        let fields = db.find(ip, DEFAULT_LOCALE)?;
        Ok(Descriptor::from_fields(&fields))
    }

    /// Describe `addr`; any failure yields an empty descriptor.
    pub fn lookup(&self, addr: &str) -> Descriptor {
        self.try_lookup(addr).unwrap_or_else(|err| {
            tracing::debug!(addr, error = %err, "lookup failed");
            Descriptor::default()
        })
    }
}
