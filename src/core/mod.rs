//! Core engine types: players, configuration, RNG, actions, round state, events.
//!
//! These are the building blocks every other module shares. Variant
//! behaviour is selected through `RuleConfig` rather than by modifying
//! the core.

pub mod action;
pub mod config;
pub mod event;
pub mod player;
pub mod rng;
pub mod state;

pub use action::{ActionKind, ActionRecord, CallOption, SelfAction};
pub use config::{MatchLength, RuleConfig, Variant};
pub use event::{visible_to, Audience, Event, EventName};
pub use player::{PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
pub use state::RoundState;
