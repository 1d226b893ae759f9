//! Tile values and the two-character wire format.
//!
//! ## Wire Format
//!
//! A tile is written as a rank digit followed by a suit letter:
//! `m` (man), `p` (pin), `s` (sou), `z` (honor). Rank `0` is the red
//! five. Honor ranks 1-4 are the winds (East, South, West, North) and
//! 5-7 the dragons (white, green, red).
//!
//! Hand strings accept both grouped (`123m456p`) and per-tile
//! (`1z1z2z`) notation.
//!
//! ## Identity
//!
//! `TileKind` is the 34-way rank/suit value used for all rule checks.
//! `Tile` is a physical tile: a kind, a red flag and an id that is
//! unique within one tile set.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Tile suit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Suit {
    Man,
    Pin,
    Sou,
    Honor,
}

impl Suit {
    /// All suits in presentation order.
    pub const ALL: [Suit; 4] = [Suit::Man, Suit::Pin, Suit::Sou, Suit::Honor];

    /// Wire letter for this suit.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Suit::Man => 'm',
            Suit::Pin => 'p',
            Suit::Sou => 's',
            Suit::Honor => 'z',
        }
    }

    /// Parse a wire suit letter.
    #[must_use]
    pub const fn from_letter(c: char) -> Option<Suit> {
        match c {
            'm' => Some(Suit::Man),
            'p' => Some(Suit::Pin),
            's' => Some(Suit::Sou),
            'z' => Some(Suit::Honor),
            _ => None,
        }
    }

    /// Index of rank 1 of this suit.
    #[must_use]
    pub const fn offset(self) -> u8 {
        match self {
            Suit::Man => 0,
            Suit::Pin => 9,
            Suit::Sou => 18,
            Suit::Honor => 27,
        }
    }

    /// Highest rank of the suit.
    #[must_use]
    pub const fn max_rank(self) -> u8 {
        match self {
            Suit::Honor => 7,
            _ => 9,
        }
    }
}

/// Rank/suit value of a tile, ignoring red-ness and identity.
///
/// Indices: man 0-8, pin 9-17, sou 18-26, honors 27-33.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileKind(u8);

impl TileKind {
    /// Number of distinct tile kinds.
    pub const COUNT: usize = 34;

    pub const EAST: TileKind = TileKind(27);
    pub const SOUTH: TileKind = TileKind(28);
    pub const WEST: TileKind = TileKind(29);
    pub const NORTH: TileKind = TileKind(30);
    pub const WHITE: TileKind = TileKind(31);
    pub const GREEN: TileKind = TileKind(32);
    pub const RED: TileKind = TileKind(33);

    /// The thirteen terminal and honor kinds.
    pub const TERMINALS_AND_HONORS: [TileKind; 13] = [
        TileKind(0),
        TileKind(8),
        TileKind(9),
        TileKind(17),
        TileKind(18),
        TileKind(26),
        TileKind(27),
        TileKind(28),
        TileKind(29),
        TileKind(30),
        TileKind(31),
        TileKind(32),
        TileKind(33),
    ];

    /// Create a kind from suit and 1-based rank.
    #[must_use]
    pub const fn new(suit: Suit, rank: u8) -> Option<Self> {
        if rank == 0 || rank > suit.max_rank() {
            return None;
        }
        Some(Self(suit.offset() + rank - 1))
    }

    /// Create a kind from its 0..34 index.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::COUNT {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    /// All 34 kinds in index order.
    pub fn all() -> impl Iterator<Item = TileKind> {
        (0..Self::COUNT as u8).map(TileKind)
    }

    /// Index 0..34.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[must_use]
    pub const fn suit(self) -> Suit {
        match self.0 {
            0..=8 => Suit::Man,
            9..=17 => Suit::Pin,
            18..=26 => Suit::Sou,
            _ => Suit::Honor,
        }
    }

    /// 1-based rank within the suit.
    #[must_use]
    pub const fn rank(self) -> u8 {
        self.0 - self.suit().offset() + 1
    }

    #[must_use]
    pub const fn is_honor(self) -> bool {
        self.0 >= 27
    }

    #[must_use]
    pub const fn is_wind(self) -> bool {
        self.0 >= 27 && self.0 <= 30
    }

    #[must_use]
    pub const fn is_dragon(self) -> bool {
        self.0 >= 31
    }

    /// Number tile of rank 1 or 9.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !self.is_honor() && (self.rank() == 1 || self.rank() == 9)
    }

    /// Terminal or honor (yaochuu).
    #[must_use]
    pub const fn is_terminal_or_honor(self) -> bool {
        self.is_honor() || self.is_terminal()
    }

    /// Number tile of rank 2-8.
    #[must_use]
    pub const fn is_simple(self) -> bool {
        !self.is_terminal_or_honor()
    }

    /// Same-suit kind `delta` ranks away, for number suits only.
    #[must_use]
    pub fn offset_by(self, delta: i8) -> Option<TileKind> {
        if self.is_honor() {
            return None;
        }
        let rank = self.rank() as i8 + delta;
        if (1..=9).contains(&rank) {
            TileKind::new(self.suit(), rank as u8)
        } else {
            None
        }
    }

    /// The dora indicated by this kind.
    ///
    /// Number suits wrap 9→1. In three-player the man suit only holds 1
    /// and 9, so man indicators wrap 1↔9. Winds cycle E→S→W→N→E and
    /// dragons white→green→red→white.
    #[must_use]
    pub fn dora_successor(self, three_player: bool) -> TileKind {
        match self.suit() {
            Suit::Honor => {
                let rank = self.rank();
                let next = match rank {
                    1..=3 => rank + 1,
                    4 => 1,
                    5 | 6 => rank + 1,
                    _ => 5,
                };
                TileKind(Suit::Honor.offset() + next - 1)
            }
            Suit::Man if three_player => {
                if self.rank() == 1 {
                    TileKind(8)
                } else {
                    TileKind(0)
                }
            }
            suit => {
                let next = if self.rank() == 9 { 1 } else { self.rank() + 1 };
                TileKind(suit.offset() + next - 1)
            }
        }
    }

    /// Parse a single wire tile, returning the kind and red flag.
    pub fn parse(input: &str) -> EngineResult<(TileKind, bool)> {
        let mut chars = input.chars();
        let (Some(digit), Some(letter), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(EngineError::Parse {
                input: input.to_string(),
                message: "expected two characters".to_string(),
            });
        };
        kind_from_parts(input, digit, letter)
    }
}

fn kind_from_parts(input: &str, digit: char, letter: char) -> EngineResult<(TileKind, bool)> {
    let parse_err = |message: &str| EngineError::Parse {
        input: input.to_string(),
        message: message.to_string(),
    };
    let suit = Suit::from_letter(letter).ok_or_else(|| parse_err("unknown suit letter"))?;
    let rank = digit.to_digit(10).ok_or_else(|| parse_err("rank must be a digit"))? as u8;
    if rank == 0 {
        if suit == Suit::Honor {
            return Err(parse_err("honors have no red five"));
        }
        let kind = TileKind::new(suit, 5).ok_or_else(|| parse_err("invalid rank"))?;
        return Ok((kind, true));
    }
    let kind = TileKind::new(suit, rank).ok_or_else(|| parse_err("rank out of range"))?;
    Ok((kind, false))
}

impl std::fmt::Display for TileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.rank(), self.suit().letter())
    }
}

impl std::str::FromStr for TileKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TileKind::parse(s).map(|(kind, _)| kind)
    }
}

/// Parse a hand string into (kind, red) pairs in written order.
///
/// ```
/// use riichi_engine::tiles::{parse_hand, TileKind};
///
/// let tiles = parse_hand("123m0p1z1z").unwrap();
/// assert_eq!(tiles.len(), 6);
/// assert_eq!(tiles[3], ("5p".parse::<TileKind>().unwrap(), true));
/// ```
pub fn parse_hand(input: &str) -> EngineResult<Vec<(TileKind, bool)>> {
    let mut out = Vec::new();
    let mut pending: Vec<char> = Vec::new();
    for c in input.chars().filter(|c| !c.is_whitespace()) {
        if c.is_ascii_digit() {
            pending.push(c);
        } else {
            if pending.is_empty() {
                return Err(EngineError::Parse {
                    input: input.to_string(),
                    message: format!("suit '{}' without ranks", c),
                });
            }
            for digit in pending.drain(..) {
                out.push(kind_from_parts(input, digit, c)?);
            }
        }
    }
    if !pending.is_empty() {
        return Err(EngineError::Parse {
            input: input.to_string(),
            message: "trailing ranks without suit".to_string(),
        });
    }
    Ok(out)
}

/// Parse a hand string into kinds, dropping red flags.
pub fn parse_kinds(input: &str) -> EngineResult<Vec<TileKind>> {
    Ok(parse_hand(input)?.into_iter().map(|(k, _)| k).collect())
}

/// A physical tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    kind: TileKind,
    red: bool,
    id: u8,
}

impl Tile {
    /// Create a tile. Only fives may be red.
    #[must_use]
    pub fn new(kind: TileKind, red: bool, id: u8) -> Self {
        debug_assert!(!red || (!kind.is_honor() && kind.rank() == 5));
        Self { kind, red, id }
    }

    #[must_use]
    pub const fn kind(self) -> TileKind {
        self.kind
    }

    #[must_use]
    pub const fn suit(self) -> Suit {
        self.kind.suit()
    }

    #[must_use]
    pub const fn rank(self) -> u8 {
        self.kind.rank()
    }

    #[must_use]
    pub const fn is_red(self) -> bool {
        self.red
    }

    /// Identity token, unique within one tile set.
    #[must_use]
    pub const fn id(self) -> u8 {
        self.id
    }

    /// Does this tile match a parsed wire value (red-sensitive)?
    #[must_use]
    pub fn matches(self, kind: TileKind, red: bool) -> bool {
        self.kind == kind && self.red == red
    }

    /// Presentation sort key: suit, rank, red five after normal fives.
    #[must_use]
    pub fn sort_key(self) -> (u8, bool, u8) {
        (self.kind.0, self.red, self.id)
    }
}

impl std::fmt::Display for Tile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.red {
            write!(f, "0{}", self.suit().letter())
        } else {
            write!(f, "{}", self.kind)
        }
    }
}

/// Seat and round winds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Wind {
    East,
    South,
    West,
    North,
}

impl Wind {
    #[must_use]
    pub const fn from_index(index: usize) -> Wind {
        match index % 4 {
            0 => Wind::East,
            1 => Wind::South,
            2 => Wind::West,
            _ => Wind::North,
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn next(self) -> Wind {
        Wind::from_index(self.index() + 1)
    }

    /// The honor kind of this wind.
    #[must_use]
    pub const fn tile_kind(self) -> TileKind {
        TileKind(27 + self as u8)
    }
}

impl std::fmt::Display for Wind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Wind::East => "East",
            Wind::South => "South",
            Wind::West => "West",
            Wind::North => "North",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn k(s: &str) -> TileKind {
        s.parse().unwrap()
    }

    #[test]
    fn test_kind_indices() {
        assert_eq!(k("1m").index(), 0);
        assert_eq!(k("9p").index(), 17);
        assert_eq!(k("1s").index(), 18);
        assert_eq!(k("7z").index(), 33);
        assert_eq!(k("4z"), TileKind::NORTH);
    }

    #[test]
    fn test_parse_red_five() {
        let (kind, red) = TileKind::parse("0s").unwrap();
        assert_eq!(kind, k("5s"));
        assert!(red);
        assert!(TileKind::parse("0z").is_err());
        assert!(TileKind::parse("8z").is_err());
        assert!(TileKind::parse("5x").is_err());
        assert!(TileKind::parse("55m").is_err());
    }

    #[test]
    fn test_parse_hand_both_notations() {
        let grouped = parse_kinds("123m456p789s1122z").unwrap();
        let per_tile = parse_kinds("123m456p789s1z1z2z2z").unwrap();
        assert_eq!(grouped, per_tile);
        assert_eq!(grouped.len(), 13);
        assert!(parse_hand("123").is_err());
        assert!(parse_hand("m").is_err());
    }

    #[test]
    fn test_classification() {
        assert!(k("1m").is_terminal());
        assert!(k("9s").is_terminal_or_honor());
        assert!(k("5z").is_dragon());
        assert!(k("3z").is_wind());
        assert!(k("5p").is_simple());
        assert!(!k("1z").is_terminal());
    }

    #[test]
    fn test_offset_by() {
        assert_eq!(k("3m").offset_by(2), Some(k("5m")));
        assert_eq!(k("8p").offset_by(2), None);
        assert_eq!(k("1z").offset_by(1), None);
    }

    #[test]
    fn test_dora_successor_four_player() {
        assert_eq!(k("1m").dora_successor(false), k("2m"));
        assert_eq!(k("9p").dora_successor(false), k("1p"));
        assert_eq!(k("4z").dora_successor(false), k("1z"));
        assert_eq!(k("2z").dora_successor(false), k("3z"));
        assert_eq!(k("7z").dora_successor(false), k("5z"));
        assert_eq!(k("5z").dora_successor(false), k("6z"));
    }

    #[test]
    fn test_dora_successor_three_player_man_wraps() {
        assert_eq!(k("1m").dora_successor(true), k("9m"));
        assert_eq!(k("9m").dora_successor(true), k("1m"));
        assert_eq!(k("9s").dora_successor(true), k("1s"));
    }

    #[test]
    fn test_tile_display() {
        let red = Tile::new(k("5p"), true, 52);
        let plain = Tile::new(k("5p"), false, 53);
        assert_eq!(red.to_string(), "0p");
        assert_eq!(plain.to_string(), "5p");
        assert_ne!(red, plain);
        assert!(red.matches(k("5p"), true));
        assert!(!plain.matches(k("5p"), true));
    }

    #[test]
    fn test_wind_cycle() {
        assert_eq!(Wind::North.next(), Wind::East);
        assert_eq!(Wind::South.tile_kind(), k("2z"));
    }
}
