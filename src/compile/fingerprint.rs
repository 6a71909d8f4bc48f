use xxhash_rust::xxh3::Xxh3;

use crate::compile::layout::{CompileWarning, Edge, EdgeKind, Layout, MemberNode, VersionBox};

const XXH3_SEED: u64 = 0x5b1d_2c0f_a7e3_9d41;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// 128-bit digest of a compiled layout.
///
/// Two layouts with equal fingerprints are, for practical purposes, identical; the CLI prints it
/// so repeated runs can be compared without diffing JSON.
pub struct LayoutFingerprint {
    pub hi: u64,
    pub lo: u64,
}

impl std::fmt::Display for LayoutFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}{:016x}", self.hi, self.lo)
    }
}

pub fn fingerprint_layout(layout: &Layout) -> LayoutFingerprint {
    let mut h = Xxh3::with_seed(XXH3_SEED);
    layout.canvas.width.digest(&mut h);
    layout.canvas.height.digest(&mut h);
    layout.versions.values().collect::<Vec<_>>().digest(&mut h);
    layout.members.iter().collect::<Vec<_>>().digest(&mut h);
    layout.edges.iter().collect::<Vec<_>>().digest(&mut h);
    layout.warnings.iter().collect::<Vec<_>>().digest(&mut h);

    let v = h.digest128();
    LayoutFingerprint {
        hi: (v >> 64) as u64,
        lo: v as u64,
    }
}

/// Order- and length-sensitive feed of a value into the hasher.
///
/// Numbers go in little-endian, floats by bit pattern; strings and sequences are length-prefixed
/// and options tagged, so adjacent fields cannot alias.
trait Digest {
    fn digest(&self, h: &mut Xxh3);
}

impl Digest for u32 {
    fn digest(&self, h: &mut Xxh3) {
        h.update(&self.to_le_bytes());
    }
}

impl Digest for u8 {
    fn digest(&self, h: &mut Xxh3) {
        h.update(&[*self]);
    }
}

impl Digest for bool {
    fn digest(&self, h: &mut Xxh3) {
        u8::from(*self).digest(h);
    }
}

impl Digest for f64 {
    fn digest(&self, h: &mut Xxh3) {
        h.update(&self.to_bits().to_le_bytes());
    }
}

impl Digest for str {
    fn digest(&self, h: &mut Xxh3) {
        (self.len() as u32).digest(h);
        h.update(self.as_bytes());
    }
}

impl Digest for String {
    fn digest(&self, h: &mut Xxh3) {
        self.as_str().digest(h);
    }
}

impl<T: Digest> Digest for Option<T> {
    fn digest(&self, h: &mut Xxh3) {
        match self {
            Some(v) => {
                1u8.digest(h);
                v.digest(h);
            }
            None => 0u8.digest(h),
        }
    }
}

impl<T: Digest + ?Sized> Digest for &T {
    fn digest(&self, h: &mut Xxh3) {
        (**self).digest(h);
    }
}

impl<T: Digest> Digest for Vec<T> {
    fn digest(&self, h: &mut Xxh3) {
        (self.len() as u32).digest(h);
        for item in self {
            item.digest(h);
        }
    }
}

impl Digest for VersionBox {
    fn digest(&self, h: &mut Xxh3) {
        self.id.digest(h);
        self.band_id.digest(h);
        self.band_name.digest(h);
        self.sublabel.digest(h);
        self.number.digest(h);
        for f in [
            self.start_year,
            self.end_year,
            self.x,
            self.y,
            self.width,
            self.height,
            self.beam_y,
        ] {
            f.digest(h);
        }
    }
}

impl Digest for MemberNode {
    fn digest(&self, h: &mut Xxh3) {
        self.id.digest(h);
        self.artist_id.digest(h);
        self.version_id.digest(h);
        self.band_id.digest(h);
        self.name.digest(h);
        self.role.digest(h);
        self.column.digest(h);
        for f in [self.x, self.y, self.beam_y, self.start_year, self.end_year] {
            f.digest(h);
        }
        self.is_replacement.digest(h);
        self.replaced_from.digest(h);
    }
}

impl Digest for Edge {
    fn digest(&self, h: &mut Xxh3) {
        let kind: u8 = match self.kind {
            EdgeKind::Continuity => 0,
            EdgeKind::Migration => 1,
        };
        kind.digest(h);
        self.artist_id.digest(h);
        self.from.digest(h);
        self.to.digest(h);
        for f in [self.x1, self.y1, self.x2, self.y2] {
            f.digest(h);
        }
        self.note.digest(h);
    }
}

impl Digest for CompileWarning {
    fn digest(&self, h: &mut Xxh3) {
        match self {
            Self::PlacementOverflow { version_id, steps } => {
                0u8.digest(h);
                version_id.digest(h);
                steps.digest(h);
            }
            Self::DuplicateMembership {
                band_id,
                artist_id,
                start_year,
            } => {
                1u8.digest(h);
                band_id.digest(h);
                artist_id.digest(h);
                start_year.digest(h);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/fingerprint.rs"]
mod tests;
