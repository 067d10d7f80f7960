use camino::{Utf8Path, Utf8PathBuf};

/// File name of the city database when resolved relative to the working directory.
pub const CITY_DB_FILENAME: &str = "GeoLite2-City.mmdb";

/// Ordered list of candidate database files.
///
/// Resolution picks the first candidate that exists. When none exist the
/// last candidate is returned anyway so that opening it produces the error
/// the caller reports.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchPath {
    candidates: Vec<Utf8PathBuf>,
}

impl Default for SearchPath {
    fn default() -> Self {
        #[cfg(windows)]
        let candidates = vec![
            Utf8PathBuf::from(r"C:\ProgramData\GeoIP\GeoLite2-City.mmdb"),
            Utf8PathBuf::from(r"C:\GeoIP\GeoLite2-City.mmdb"),
            Utf8PathBuf::from(CITY_DB_FILENAME),
        ];

        #[cfg(not(windows))]
        let candidates = vec![
            Utf8PathBuf::from("/usr/share/GeoIP/GeoLite2-City.mmdb"),
            Utf8PathBuf::from("/var/lib/GeoIP/GeoLite2-City.mmdb"),
            Utf8PathBuf::from(CITY_DB_FILENAME),
        ];

        Self { candidates }
    }
}

impl SearchPath {
    /// Build a search path from user-supplied candidates.
    ///
    /// An empty list falls back to the platform defaults.
    pub fn new(candidates: Vec<Utf8PathBuf>) -> Self {
        if candidates.is_empty() {
            Self::default()
        } else {
            Self { candidates }
        }
    }

    pub fn candidates(&self) -> &[Utf8PathBuf] {
        &self.candidates
    }

    /// Pick the database file to open.
    pub fn resolve(&self) -> &Utf8Path {
        for candidate in &self.candidates {
            if candidate.exists() {
                tracing::debug!(path = %candidate, "found database candidate");
                return candidate;
            }
            tracing::trace!(path = %candidate, "database candidate missing");
        }

        // `new` never stores an empty list
        let last = self
            .candidates
            .last()
            .map(Utf8PathBuf::as_path)
            .unwrap_or_else(|| Utf8Path::new(CITY_DB_FILENAME));
        tracing::debug!(path = %last, "no database candidate exists, trying last");
        last
    }
}
