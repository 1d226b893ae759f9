//! Shanten, agari detection and wait enumeration over kind counts.
//!
//! Shanten convention: `-1` is a complete hand, `0` is tenpai.

use crate::tiles::TileKind;

/// Kind histogram.
pub type Counts = [u8; TileKind::COUNT];

/// Shanten over all hand forms (regular, seven pairs, thirteen orphans).
///
/// `meld_count` is the number of declared melds; seven pairs and
/// thirteen orphans are only considered for a hand without melds.
#[must_use]
pub fn shanten(counts: &Counts, meld_count: usize) -> i8 {
    let regular = regular_shanten(counts, meld_count);
    if meld_count > 0 {
        return regular;
    }
    regular.min(chiitoi_shanten(counts)).min(kokushi_shanten(counts))
}

/// Shanten for four sets and a pair.
#[must_use]
pub fn regular_shanten(counts: &Counts, meld_count: usize) -> i8 {
    let mut c = *counts;
    let mut best = 8;
    search(&mut c, 0, meld_count as i8, 0, 0, &mut best);
    for i in 0..TileKind::COUNT {
        if c[i] >= 2 {
            c[i] -= 2;
            search(&mut c, 0, meld_count as i8, 0, 1, &mut best);
            c[i] += 2;
        }
    }
    best
}

fn search(c: &mut Counts, start: usize, sets: i8, partials: i8, pair: i8, best: &mut i8) {
    let mut i = start;
    while i < TileKind::COUNT && c[i] == 0 {
        i += 1;
    }
    if i == TileKind::COUNT {
        let partials = partials.min(4 - sets).max(0);
        let value = 8 - 2 * sets - partials - pair;
        if value < *best {
            *best = value;
        }
        return;
    }

    let in_run_suit = i < 27;
    let rank = i % 9;

    if c[i] >= 3 {
        c[i] -= 3;
        search(c, i, sets + 1, partials, pair, best);
        c[i] += 3;
    }
    if in_run_suit && rank <= 6 && c[i + 1] > 0 && c[i + 2] > 0 {
        c[i] -= 1;
        c[i + 1] -= 1;
        c[i + 2] -= 1;
        search(c, i, sets + 1, partials, pair, best);
        c[i] += 1;
        c[i + 1] += 1;
        c[i + 2] += 1;
    }
    if sets + partials < 4 {
        if c[i] >= 2 {
            c[i] -= 2;
            search(c, i, sets, partials + 1, pair, best);
            c[i] += 2;
        }
        if in_run_suit && rank <= 7 && c[i + 1] > 0 {
            c[i] -= 1;
            c[i + 1] -= 1;
            search(c, i, sets, partials + 1, pair, best);
            c[i] += 1;
            c[i + 1] += 1;
        }
        if in_run_suit && rank <= 6 && c[i + 2] > 0 {
            c[i] -= 1;
            c[i + 2] -= 1;
            search(c, i, sets, partials + 1, pair, best);
            c[i] += 1;
            c[i + 2] += 1;
        }
    }

    let saved = c[i];
    c[i] = 0;
    search(c, i + 1, sets, partials, pair, best);
    c[i] = saved;
}

#[must_use]
pub fn chiitoi_shanten(counts: &Counts) -> i8 {
    let pairs = counts.iter().filter(|&&n| n >= 2).count() as i8;
    let kinds = counts.iter().filter(|&&n| n > 0).count() as i8;
    6 - pairs + (7 - kinds).max(0)
}

#[must_use]
pub fn kokushi_shanten(counts: &Counts) -> i8 {
    let present = TileKind::TERMINALS_AND_HONORS
        .iter()
        .filter(|k| counts[k.index()] > 0)
        .count() as i8;
    let has_pair = TileKind::TERMINALS_AND_HONORS
        .iter()
        .any(|k| counts[k.index()] >= 2);
    13 - present - i8::from(has_pair)
}

/// Is the (14-tile equivalent) hand complete in any form?
#[must_use]
pub fn is_complete(counts: &Counts, meld_count: usize) -> bool {
    let total: usize = counts.iter().map(|&n| n as usize).sum();
    if total + 3 * meld_count != 14 {
        return false;
    }
    if meld_count == 0 && (is_chiitoi(counts) || is_kokushi(counts)) {
        return true;
    }
    is_regular_complete(counts)
}

#[must_use]
pub fn is_chiitoi(counts: &Counts) -> bool {
    counts.iter().filter(|&&n| n == 2).count() == 7
}

#[must_use]
pub fn is_kokushi(counts: &Counts) -> bool {
    let total: u8 = counts.iter().sum();
    total == 14
        && TileKind::TERMINALS_AND_HONORS.iter().all(|k| counts[k.index()] >= 1)
        && TileKind::TERMINALS_AND_HONORS
            .iter()
            .map(|k| counts[k.index()])
            .sum::<u8>()
            == 14
}

fn is_regular_complete(counts: &Counts) -> bool {
    let mut c = *counts;
    for i in 0..TileKind::COUNT {
        if c[i] >= 2 {
            c[i] -= 2;
            if strip_sets(&mut c.clone(), 0) {
                return true;
            }
            c[i] += 2;
        }
    }
    false
}

fn strip_sets(c: &mut Counts, start: usize) -> bool {
    let mut i = start;
    while i < TileKind::COUNT && c[i] == 0 {
        i += 1;
    }
    if i == TileKind::COUNT {
        return true;
    }
    if c[i] >= 3 {
        c[i] -= 3;
        if strip_sets(c, i) {
            return true;
        }
        c[i] += 3;
    }
    if i < 27 && i % 9 <= 6 && c[i + 1] > 0 && c[i + 2] > 0 {
        c[i] -= 1;
        c[i + 1] -= 1;
        c[i + 2] -= 1;
        if strip_sets(c, i) {
            return true;
        }
        c[i] += 1;
        c[i + 1] += 1;
        c[i + 2] += 1;
    }
    false
}

/// Kinds that complete a 13-tile-equivalent hand.
///
/// Kinds of which the hand already holds all four copies are excluded.
#[must_use]
pub fn waits(counts: &Counts, meld_count: usize) -> Vec<TileKind> {
    let mut c = *counts;
    TileKind::all()
        .filter(|k| {
            if c[k.index()] >= 4 {
                return false;
            }
            c[k.index()] += 1;
            let complete = is_complete(&c, meld_count);
            c[k.index()] -= 1;
            complete
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::{kind_counts, parse_kinds};

    fn counts(s: &str) -> Counts {
        kind_counts(parse_kinds(s).unwrap())
    }

    #[test]
    fn test_complete_hand_is_minus_one() {
        assert_eq!(shanten(&counts("123m456p789s11z222z"), 0), -1);
        assert!(is_complete(&counts("123m456p789s11z222z"), 0));
    }

    #[test]
    fn test_tenpai_shanpon() {
        let c = counts("123m456p789s1z1z2z2z");
        assert_eq!(shanten(&c, 0), 0);
        let w = waits(&c, 0);
        assert_eq!(w, parse_kinds("1z2z").unwrap());
    }

    #[test]
    fn test_ryanmen_wait() {
        let c = counts("23m456p789s111z55z");
        assert_eq!(waits(&c, 0), parse_kinds("14m").unwrap());
    }

    #[test]
    fn test_nine_sided_wait() {
        let c = counts("1112345678999m");
        assert_eq!(waits(&c, 0).len(), 9);
    }

    #[test]
    fn test_chiitoi_shanten() {
        let c = counts("1122m3344p5566s7z");
        assert_eq!(chiitoi_shanten(&c), 0);
        assert_eq!(waits(&c, 0), parse_kinds("7z").unwrap());
    }

    #[test]
    fn test_kokushi() {
        let c = counts("19m19p19s1234567z");
        assert_eq!(kokushi_shanten(&c), 0);
        assert_eq!(waits(&c, 0).len(), 13);
        let done = counts("19m19p19s12345677z");
        assert!(is_kokushi(&done));
        assert!(is_complete(&done, 0));
    }

    #[test]
    fn test_shanten_with_melds() {
        // two melds declared, seven tiles left
        let c = counts("23m45p11z");
        assert_eq!(shanten(&c, 2), 1);
        assert_eq!(shanten(&counts("23m11z"), 3), 0);
    }

    #[test]
    fn test_far_hand() {
        let c = counts("147m258p369s1234z");
        assert!(shanten(&c, 0) >= 5);
    }

    #[test]
    fn test_full_four_copies_not_a_wait() {
        // holds 4x 1z: tanki on 1z would be a fifth copy
        let c = counts("123m456p789s1111z");
        assert!(!waits(&c, 0).contains(&TileKind::EAST));
    }
}
