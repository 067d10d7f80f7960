use rustc_hash::FxHashMap;

use crate::extractor::Extractor;
use crate::geoip::{Descriptor, GeoLocator};

/// ANSI escape opening a colored descriptor (cyan).
pub const COLOR_START: &str = "\x1b[0;0;36m";
/// ANSI escape resetting the terminal attributes.
pub const COLOR_RESET: &str = "\x1b[0m";

// Upper bound on memoised descriptors for one run.
const CACHE_LIMIT: usize = 100_000;

/// Run-wide settings fixed once the command line is parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub color: bool,
}

/// Render the replacement text for `addr`: the address followed by its
/// decoration.
pub fn decorate(addr: &str, descriptor: &Descriptor, config: &AppConfig) -> String {
    if config.color {
        format!("{addr} {COLOR_START}[{descriptor}]{COLOR_RESET}")
    } else {
        format!("{addr} <{descriptor}>")
    }
}

/// Rewrites lines so the first address found carries its location.
#[derive(Debug)]
pub struct Annotator {
    extractor: Extractor,
    locator: GeoLocator,
    cache: FxHashMap<String, Descriptor>,
}

impl Annotator {
    pub fn new(extractor: Extractor, locator: GeoLocator) -> Self {
        Self {
            extractor,
            locator,
            cache: FxHashMap::with_capacity_and_hasher(1024, Default::default()),
        }
    }

    /// Annotate one line.
    ///
    /// Only the first match is looked up, but every occurrence of that
    /// exact text in the line is replaced, including occurrences inside
    /// longer tokens. Lines without a match come back unchanged.
    pub fn annotate(&mut self, line: &str, config: &AppConfig) -> String {
        let Some(addr) = self.extractor.extract(line) else {
            return line.to_string();
        };
        let descriptor = self.describe(addr);
        line.replace(addr, &decorate(addr, &descriptor, config))
    }

    fn describe(&mut self, addr: &str) -> Descriptor {
        if let Some(cached) = self.cache.get(addr) {
            return cached.clone();
        }
        let descriptor = self.locator.lookup(addr);
        if self.cache.len() < CACHE_LIMIT {
            self.cache.insert(addr.to_string(), descriptor.clone());
        }
        descriptor
    }
}
