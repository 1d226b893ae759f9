//! Decomposition of complete hands into sets and a pair.
//!
//! Yaku and fu depend on how a hand is read, so the evaluator scores
//! every distinct reading and keeps the best.

use serde::Serialize;
use smallvec::SmallVec;

use super::shanten::Counts;
use crate::tiles::{Meld, MeldType, TileKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SetShape {
    Run,
    Triplet,
    Quad,
}

/// A run, triplet or quad, concealed or declared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Set {
    pub shape: SetShape,
    /// Lowest kind of the set.
    pub first: TileKind,
    pub open: bool,
}

impl Set {
    #[must_use]
    pub const fn new(shape: SetShape, first: TileKind, open: bool) -> Self {
        Self { shape, first, open }
    }

    #[must_use]
    pub fn from_meld(meld: &Meld) -> Self {
        let shape = match meld.meld_type {
            MeldType::Chi => SetShape::Run,
            MeldType::Pon => SetShape::Triplet,
            MeldType::Ankan | MeldType::Daiminkan | MeldType::Kakan => SetShape::Quad,
        };
        Self::new(shape, meld.base_kind(), meld.is_open())
    }

    #[must_use]
    pub fn is_run(&self) -> bool {
        self.shape == SetShape::Run
    }

    /// Triplet or quad.
    #[must_use]
    pub fn is_pon_like(&self) -> bool {
        self.shape != SetShape::Run
    }

    #[must_use]
    pub fn kinds(&self) -> SmallVec<[TileKind; 3]> {
        match self.shape {
            SetShape::Run => (0..3).filter_map(|d| self.first.offset_by(d)).collect(),
            _ => smallvec::smallvec![self.first],
        }
    }

    #[must_use]
    pub fn contains(&self, kind: TileKind) -> bool {
        self.kinds().contains(&kind)
    }

    /// Contains at least one terminal or honor.
    #[must_use]
    pub fn has_terminal_or_honor(&self) -> bool {
        self.kinds().iter().any(|k| k.is_terminal_or_honor())
    }

    #[must_use]
    pub fn has_terminal(&self) -> bool {
        self.kinds().iter().any(|k| k.is_terminal())
    }
}

/// One reading of the concealed part: a pair plus concealed sets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Division {
    pub pair: TileKind,
    pub sets: SmallVec<[Set; 4]>,
}

/// All distinct readings of a complete concealed part.
///
/// `counts` must hold exactly `3k + 2` tiles; a result is empty when the
/// tiles do not form `k` sets and a pair.
#[must_use]
pub fn divisions(counts: &Counts) -> Vec<Division> {
    let mut out: Vec<Division> = Vec::new();
    let mut c = *counts;
    for pair in TileKind::all() {
        if c[pair.index()] < 2 {
            continue;
        }
        c[pair.index()] -= 2;
        let mut path = SmallVec::new();
        extract(&mut c, 0, &mut path, &mut |sets| {
            let mut sets = sets.clone();
            sets.sort();
            let division = Division { pair, sets };
            if !out.contains(&division) {
                out.push(division);
            }
        });
        c[pair.index()] += 2;
    }
    out
}

fn extract<F>(c: &mut Counts, start: usize, path: &mut SmallVec<[Set; 4]>, emit: &mut F)
where
    F: FnMut(&SmallVec<[Set; 4]>),
{
    let mut i = start;
    while i < TileKind::COUNT && c[i] == 0 {
        i += 1;
    }
    if i == TileKind::COUNT {
        emit(path);
        return;
    }
    let Some(kind) = TileKind::from_index(i) else {
        return;
    };

    if c[i] >= 3 {
        c[i] -= 3;
        path.push(Set::new(SetShape::Triplet, kind, false));
        extract(c, i, path, emit);
        path.pop();
        c[i] += 3;
    }
    if i < 27 && i % 9 <= 6 && c[i + 1] > 0 && c[i + 2] > 0 {
        c[i] -= 1;
        c[i + 1] -= 1;
        c[i + 2] -= 1;
        path.push(Set::new(SetShape::Run, kind, false));
        extract(c, i, path, emit);
        path.pop();
        c[i] += 1;
        c[i + 1] += 1;
        c[i + 2] += 1;
    }
}
