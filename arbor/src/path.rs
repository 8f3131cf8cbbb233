//! Derivation path grammar.
//!
//! ```text
//! path    := [root "/"] segment *("/" segment) [".pub"] | root [".pub"]
//! root    := "m" | "M"
//! segment := ["-"] digits ["'" | "p" | "h"]
//! ```
//!
//! `M` and the `.pub` suffix both ask for the public-only result; traversal
//! itself still uses private derivation wherever the starting node allows it.
//!
//! Negative segments are kept for compatibility with existing path strings:
//! the raw index is `(value + (hardened ? 2^31 : 0)) mod 2^32`, and whether the
//! step is hardened follows from that raw index, not from the marker. So
//! `m/0'/-1` derives hardened child `0xffffffff`.

use core::fmt;
use core::str::FromStr;

use crate::error::{Error, Result};

const HARDENED_OFFSET: i64 = 0x8000_0000;
const INDEX_SPACE: i64 = 0x1_0000_0000;
const PUBLIC_SUFFIX: &str = ".pub";

/// One segment of a derivation path, as written.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChildNumber {
    value: i64,
    hardened: bool,
}

impl ChildNumber {
    /// The offset for hardened indices (2^31).
    pub const HARDENED_OFFSET: u32 = 0x8000_0000;

    /// A segment with a user-supplied value and marker.
    ///
    /// Marked values must lie in `-2^31..2^31`, unmarked values in `-2^31..2^32`.
    pub fn new(value: i64, hardened: bool) -> Result<Self> {
        let upper = if hardened { HARDENED_OFFSET } else { INDEX_SPACE };
        if value < -HARDENED_OFFSET || value >= upper {
            return Err(Error::InvalidDerivationPath(format!(
                "index {value} out of range"
            )));
        }
        Ok(Self { value, hardened })
    }

    /// A plain segment for a raw 32-bit index.
    pub const fn from_index(index: u32) -> Self {
        Self {
            value: index as i64,
            hardened: false,
        }
    }

    /// A hardened segment `index'`, with `index < 2^31`.
    pub fn hardened(index: u32) -> Result<Self> {
        Self::new(i64::from(index), true)
    }

    /// The value as written, before the hardened offset is applied.
    pub const fn value(&self) -> i64 {
        self.value
    }

    /// Whether the segment carried a hardening marker.
    pub const fn has_marker(&self) -> bool {
        self.hardened
    }

    /// The raw 32-bit child index passed to CKD.
    pub const fn index(&self) -> u32 {
        let offset = if self.hardened { HARDENED_OFFSET } else { 0 };
        (self.value + offset).rem_euclid(INDEX_SPACE) as u32
    }

    /// Whether CKD will use hardened derivation for this segment.
    pub const fn is_hardened(&self) -> bool {
        self.index() >= Self::HARDENED_OFFSET
    }
}

impl From<u32> for ChildNumber {
    fn from(index: u32) -> Self {
        Self::from_index(index)
    }
}

impl fmt::Display for ChildNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hardened {
            write!(f, "{}'", self.value)
        } else {
            write!(f, "{}", self.value)
        }
    }
}

impl FromStr for ChildNumber {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidDerivationPath(format!("invalid segment '{s}'"));

        let (digits, hardened) = match s.strip_suffix(['\'', 'p', 'h']) {
            Some(rest) => (rest, true),
            None => (s, false),
        };
        let unsigned = digits.strip_prefix('-').unwrap_or(digits);
        if unsigned.is_empty() || !unsigned.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let value: i64 = digits.parse().map_err(|_| invalid())?;
        Self::new(value, hardened)
    }
}

/// Where a path starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Root {
    /// `m`: keep private material in the result.
    Private,
    /// `M`: strip private material from the result.
    Public,
    /// No root, derive from the receiving node.
    Relative,
}

/// A parsed derivation path such as `m/0'/1/2'/2/1000000000`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DerivationPath {
    root: Root,
    segments: Vec<ChildNumber>,
    public_suffix: bool,
}

impl DerivationPath {
    /// Build a path from segments.
    pub fn new(root: Root, segments: Vec<ChildNumber>) -> Self {
        Self {
            root,
            segments,
            public_suffix: false,
        }
    }

    /// Parse a path string.
    pub fn parse(path: &str) -> Result<Self> {
        let trimmed = path.trim();
        let (body, public_suffix) = match trimmed.strip_suffix(PUBLIC_SUFFIX) {
            Some(rest) => (rest, true),
            None => (trimmed, false),
        };

        if body.is_empty() {
            return Err(Error::InvalidDerivationPath("empty path".into()));
        }

        let mut parts = body.split('/').peekable();
        let root = match parts.peek() {
            Some(&"m") => Root::Private,
            Some(&"M") => Root::Public,
            _ => Root::Relative,
        };
        if root != Root::Relative {
            parts.next();
        }

        let segments = parts
            .map(ChildNumber::from_str)
            .collect::<Result<Vec<_>>>()?;

        if root == Root::Relative && segments.is_empty() {
            return Err(Error::InvalidDerivationPath(path.to_string()));
        }

        Ok(Self {
            root,
            segments,
            public_suffix,
        })
    }

    /// Path root.
    pub const fn root(&self) -> Root {
        self.root
    }

    /// Segments in traversal order.
    pub fn segments(&self) -> &[ChildNumber] {
        &self.segments
    }

    /// Whether the caller asked for a public-only result (`M` root or `.pub`).
    pub fn wants_public(&self) -> bool {
        self.root == Root::Public || self.public_suffix
    }

    /// Append a segment.
    pub fn child(&self, segment: ChildNumber) -> Self {
        let mut next = self.clone();
        next.segments.push(segment);
        next
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root {
            Root::Private => write!(f, "m")?,
            Root::Public => write!(f, "M")?,
            Root::Relative => {}
        }
        let mut first = self.root == Root::Relative;
        for segment in &self.segments {
            if !first {
                write!(f, "/")?;
            }
            write!(f, "{segment}")?;
            first = false;
        }
        if self.public_suffix {
            write!(f, "{PUBLIC_SUFFIX}")?;
        }
        Ok(())
    }
}

impl FromStr for DerivationPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bip32_path() {
        let path = DerivationPath::parse("m/0'/1/2'/2/1000000000").unwrap();
        assert_eq!(path.root(), Root::Private);
        let indices: Vec<u32> = path.segments().iter().map(ChildNumber::index).collect();
        assert_eq!(
            indices,
            vec![0x8000_0000, 1, 0x8000_0002, 2, 1_000_000_000]
        );
        assert!(!path.wants_public());
    }

    #[test]
    fn test_hardening_markers() {
        for marker in ["'", "p", "h"] {
            let segment: ChildNumber = format!("44{marker}").parse().unwrap();
            assert_eq!(segment.index(), 0x8000_002c);
            assert!(segment.is_hardened());
        }
    }

    #[test]
    fn test_public_forms() {
        assert!(DerivationPath::parse("M/0'/1").unwrap().wants_public());
        let suffixed = DerivationPath::parse("m/0p.pub").unwrap();
        assert!(suffixed.wants_public());
        assert_eq!(suffixed.root(), Root::Private);
        assert_eq!(suffixed.segments()[0].index(), 0x8000_0000);
    }

    #[test]
    fn test_relative_path() {
        let path = DerivationPath::parse("1/1/1").unwrap();
        assert_eq!(path.root(), Root::Relative);
        assert_eq!(path.segments().len(), 3);
        assert_eq!(path.to_string(), "1/1/1");
    }

    #[test]
    fn test_root_only() {
        let path = DerivationPath::parse("m").unwrap();
        assert!(path.segments().is_empty());
        assert!(DerivationPath::parse("M.pub").unwrap().wants_public());
    }

    #[test]
    fn test_negative_index_wraps() {
        let minus_one: ChildNumber = "-1".parse().unwrap();
        assert_eq!(minus_one.value(), -1);
        assert_eq!(minus_one.index(), 0xffff_ffff);
        assert!(minus_one.is_hardened());
        assert!(!minus_one.has_marker());

        let marked: ChildNumber = "-1'".parse().unwrap();
        assert_eq!(marked.index(), 0x7fff_ffff);
        assert!(!marked.is_hardened());
    }

    #[test]
    fn test_largest_hardened() {
        let segment: ChildNumber = "2147483647'".parse().unwrap();
        assert_eq!(segment.index(), 0xffff_ffff);
        assert!("2147483648'".parse::<ChildNumber>().is_err());
        assert_eq!("4294967295".parse::<ChildNumber>().unwrap().index(), 0xffff_ffff);
        assert!("4294967296".parse::<ChildNumber>().is_err());
    }

    #[test]
    fn test_invalid_paths() {
        for bad in ["", "m/", "m//1", "m/x", "m/1'/", "m/1''", "m/ 1", "/1", "m/-", ".pub", "m/+1"] {
            assert!(
                DerivationPath::parse(bad).is_err(),
                "expected '{bad}' to be rejected"
            );
        }
    }

    #[test]
    fn test_display_roundtrip() {
        for path in ["m/0'/1/2'/2/1000000000", "M/0'/1", "m/0'/1.pub", "0/-1", "m"] {
            assert_eq!(DerivationPath::parse(path).unwrap().to_string(), path);
        }
    }

    #[test]
    fn test_child() {
        let path = DerivationPath::parse("m/0'").unwrap();
        let extended = path.child(ChildNumber::from_index(5));
        assert_eq!(extended.to_string(), "m/0'/5");
        assert_eq!(ChildNumber::hardened(3).unwrap().index(), 0x8000_0003);
    }
}
