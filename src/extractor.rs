use std::ops::Range;

use regex_automata::meta::Regex;
use regex_automata::MatchKind;
use regex_syntax::hir::Hir;

use crate::error::Result;

/// Dotted-quad pattern. Octets are not anchored on word boundaries, so a
/// quad embedded in a longer run of digits still matches.
static IPV4_PATTERN: &str =
    r"((25[0-5]|(2[0-4]|1?[0-9])?[0-9])\.){3}(25[0-5]|(2[0-4]|1?[0-9])?[0-9])";

/// A searcher for the first IPv4 dotted quad in a line of text.
///
/// Matches are purely syntactic. Nothing is parsed or range-checked after
/// the regex accepts a span, so `1.2.3.4567` yields `1.2.3.45` and octets
/// with leading zeros are kept as written.
#[derive(Clone, Debug)]
pub struct Extractor {
    regex: Regex,
}

impl Extractor {
    /// Compile the IPv4 pattern with leftmost-first semantics.
    pub fn new() -> Result<Extractor> {
        let hir: Hir = regex_syntax::Parser::new().parse(IPV4_PATTERN)?;
        let regex = Regex::builder()
            .configure(
                Regex::config()
                    .auto_prefilter(true)
                    .match_kind(MatchKind::LeftmostFirst),
            )
            .build_from_hir(&hir)?;
        Ok(Extractor { regex })
    }

    /// Return the byte range of the leftmost match in `line`, if any.
    #[inline]
    pub fn find(&self, line: &str) -> Option<Range<usize>> {
        self.regex.find(line).map(|m| m.range())
    }

    /// Return the leftmost matched address in `line`, if any.
    #[inline]
    pub fn extract<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.find(line).map(|range| &line[range])
    }
}
