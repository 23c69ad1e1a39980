//! FourCC values and the fixed AVI header layout they are patched into.
//!
//! An AVI file written by the common XviD/DivX muxers stores the video codec
//! identifier twice near the start of the file: once in the stream header
//! (`strh.fccHandler`, conventionally lower-case) and once in the stream
//! format (`BITMAPINFOHEADER.biCompression`, conventionally upper-case).
//! Rewriting both to an equivalent identifier is enough for players that
//! refuse the original tag.

use std::fmt;

/// Width of a FourCC in bytes.
pub const FOURCC_LEN: usize = 4;

/// Byte offset of `strh.fccHandler`, read for validation and written lower-case.
pub const HANDLER_OFFSET: u64 = 112;

/// Byte offset of `biCompression`, written upper-case.
pub const COMPRESSION_OFFSET: u64 = 188;

/// A four-character code as raw bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FourCc([u8; FOURCC_LEN]);

impl FourCc {
    pub const fn from_bytes(bytes: [u8; FOURCC_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; FOURCC_LEN] {
        &self.0
    }

    pub fn to_lowercase(self) -> Self {
        Self(self.0.map(|b| b.to_ascii_lowercase()))
    }

    pub fn to_uppercase(self) -> Self {
        Self(self.0.map(|b| b.to_ascii_uppercase()))
    }

    pub fn eq_ignore_case(&self, other: &FourCc) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl fmt::Display for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            let c = if b.is_ascii_graphic() || b == b' ' {
                b as char
            } else {
                '?'
            };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FourCc({self})")
    }
}

/// Replacement for the common MPEG-4 ASP tags.
pub const GENERAL_REPLACEMENT: FourCc = FourCc::from_bytes(*b"FMP4");

/// The oldest DivX tag, which needs its own replacement.
pub const LEGACY_SOURCE: FourCc = FourCc::from_bytes(*b"div3");

/// Replacement for [`LEGACY_SOURCE`].
pub const LEGACY_REPLACEMENT: FourCc = FourCc::from_bytes(*b"MP43");

/// One accepted source identifier and what it is rewritten to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mapping {
    pub source: FourCc,
    pub replacement: FourCc,
}

/// Accepted identifiers, in lookup order.
pub static MAPPINGS: &[Mapping] = &[
    Mapping {
        source: FourCc::from_bytes(*b"xvid"),
        replacement: GENERAL_REPLACEMENT,
    },
    Mapping {
        source: FourCc::from_bytes(*b"divx"),
        replacement: GENERAL_REPLACEMENT,
    },
    Mapping {
        source: LEGACY_SOURCE,
        replacement: LEGACY_REPLACEMENT,
    },
];

/// Find the mapping for an observed identifier, ignoring case.
pub fn lookup(observed: FourCc) -> Option<&'static Mapping> {
    MAPPINGS.iter().find(|m| m.source.eq_ignore_case(&observed))
}

/// Replacement to write for `observed`.
///
/// Anything other than the legacy tag gets the general replacement, including
/// identifiers outside [`MAPPINGS`] when validation has been skipped.
pub fn replacement_for(observed: FourCc) -> FourCc {
    if observed.eq_ignore_case(&LEGACY_SOURCE) {
        LEGACY_REPLACEMENT
    } else {
        GENERAL_REPLACEMENT
    }
}
