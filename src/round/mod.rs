//! Turn sequencing within a kyoku and settlement between kyoku.
//!
//! - [`TurnManager`]: current seat, turn counter, draws
//! - [`RoundManager`]: points, honba, kyotaku, rotation and match end

mod manager;
mod turn;

pub use manager::{AbortKind, RoundManager, RoundResult, Settlement, Standing, WinRecord};
pub use turn::{DrawOutcome, TurnManager};
