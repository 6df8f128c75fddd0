//! Detection of writers whose DELTA_BYTE_ARRAY pages can only be read sequentially.
//!
//! parquet-mr before 1.8.0 (PARQUET-246) wrote DELTA_BYTE_ARRAY pages whose first value
//! may be a prefix of the last value of the previous page.
use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use tracing::{info, warn};

use crate::encoding::Encoding;

const PARQUET_MR: &str = "parquet-mr";

// <application> version <version> (build <hash>), as parsed by parquet-mr
static CREATED_BY_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    RegexBuilder::new(r"^(.*?)\s+version\s*(?:([^(]*?)\s*(?:\(\s*build\s*([^)]*?)\s*\))?)?$")
        .case_insensitive(true)
        .build()
        .ok()
});

const FIXED_VERSION: SemanticVersion = SemanticVersion {
    major: 1,
    minor: 8,
    patch: 0,
    prerelease: false,
};

/// A `major.minor.patch` version. Pre-releases order before the release they precede;
/// build metadata is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SemanticVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub prerelease: bool,
}

impl SemanticVersion {
    /// Parses versions such as `1.8.0`, `1.8.0-SNAPSHOT`, `1.6.0rc3` or `1.8.0+abc`.
    pub fn parse(version: &str) -> Option<Self> {
        let version = version
            .split_once('+')
            .map_or(version, |(version, _build)| version);
        let mut parts = version.splitn(3, '.');
        let major = parts.next()?.parse().ok()?;
        let minor = parts.next()?.parse().ok()?;
        let rest = parts.next()?;

        let digits = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        let patch = rest[..digits].parse().ok()?;
        Some(Self {
            major,
            minor,
            patch,
            prerelease: digits < rest.len(),
        })
    }
}

impl PartialOrd for SemanticVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SemanticVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            // a pre-release is older than its release
            .then_with(|| other.prerelease.cmp(&self.prerelease))
    }
}

/// The application and version that wrote a file, as declared in its `created_by`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedVersion {
    pub application: String,
    pub version: Option<SemanticVersion>,
    pub build: Option<String>,
}

impl ParsedVersion {
    /// Parses `created_by` strings of the form `<application> version <version> (build <hash>)`.
    /// The application may contain spaces, `version` and `build` are case-insensitive and
    /// both the version and the build are optional.
    /// Returns `None` when the string has no application or no `version` keyword.
    pub fn parse(created_by: &str) -> Option<Self> {
        let captures = CREATED_BY_RE.as_ref()?.captures(created_by)?;
        let application = captures.get(1)?.as_str();
        if application.is_empty() {
            return None;
        }
        let non_empty = |index: usize| {
            captures
                .get(index)
                .map(|x| x.as_str())
                .filter(|x| !x.is_empty())
        };
        Some(Self {
            application: application.to_string(),
            version: non_empty(2).and_then(SemanticVersion::parse),
            build: non_empty(3).map(|x| x.to_string()),
        })
    }
}

/// Returns whether pages of `encoding` written by `created_by` must be read sequentially,
/// continuing from the last value of the previous page.
pub fn requires_sequential_reads(created_by: Option<&str>, encoding: Encoding) -> bool {
    if encoding != Encoding::DeltaByteArray {
        return false;
    }
    let created_by = match created_by {
        Some(created_by) => created_by,
        None => return true,
    };
    let parsed = match ParsedVersion::parse(created_by) {
        Some(parsed) => parsed,
        None => {
            warn!(
                created_by,
                "Cannot parse the writer version; assuming DELTA_BYTE_ARRAY pages must be read sequentially"
            );
            return true;
        }
    };
    if parsed.application != PARQUET_MR {
        return false;
    }
    match parsed.version {
        Some(version) if version >= FIXED_VERSION => false,
        Some(_) => {
            info!(
                created_by,
                "Writer predates PARQUET-246; DELTA_BYTE_ARRAY pages are read sequentially"
            );
            true
        }
        None => {
            warn!(
                created_by,
                "parquet-mr writer without a semantic version; DELTA_BYTE_ARRAY pages are read sequentially"
            );
            true
        }
    }
}
