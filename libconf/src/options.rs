//! Parser configuration.

use std::fmt;
use std::path::PathBuf;

/// A `major[.minor]` language version as written in a `@version` directive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Parse `"1"` or `"1.2"`. A missing minor component reads as 0.
    pub fn parse(text: &str) -> Option<Self> {
        let (major, minor) = match text.split_once('.') {
            Some((major, minor)) => (major, Some(minor)),
            None => (text, None),
        };
        let number = |s: &str| -> Option<u32> {
            if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            s.parse().ok()
        };
        Some(Self {
            major: number(major)?,
            minor: match minor {
                Some(minor) => number(minor)?,
                None => 0,
            },
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// The language version this parser implements.
pub const SUPPORTED_VERSION: Version = Version::new(1, 0);

/// How a `@version` directive is compared against the supported version.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VersionPolicy {
    /// The requested version must equal the supported one.
    #[default]
    Exact,
    /// Same major version, minor no newer than supported.
    SameMajor,
    /// Any well-formed version is accepted.
    Any,
}

impl VersionPolicy {
    pub fn accepts(self, requested: Version, supported: Version) -> bool {
        match self {
            VersionPolicy::Exact => requested == supported,
            VersionPolicy::SameMajor => {
                requested.major == supported.major && requested.minor <= supported.minor
            }
            VersionPolicy::Any => true,
        }
    }
}

/// Options controlling a parse.
#[derive(Clone, Debug)]
pub struct ParseOptions {
    /// Leader of the single-character line comment. `//` and `/* */` are
    /// always recognized.
    pub comment_char: char,
    pub supported_version: Version,
    pub version_policy: VersionPolicy,
    /// Directory that relative `@include` paths in text input resolve
    /// against. Files resolve against their own directory.
    pub base_dir: Option<PathBuf>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            comment_char: '#',
            supported_version: SUPPORTED_VERSION,
            version_policy: VersionPolicy::default(),
            base_dir: None,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_comment_char(mut self, comment_char: char) -> Self {
        self.comment_char = comment_char;
        self
    }

    pub fn with_supported_version(mut self, version: Version) -> Self {
        self.supported_version = version;
        self
    }

    pub fn with_version_policy(mut self, policy: VersionPolicy) -> Self {
        self.version_policy = policy;
        self
    }

    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }
}
