//! Calls on discards and kans.
//!
//! - [`ActionManager`]: who may call what, and executing the meld
//! - [`CallWindow`]: collecting the answers and resolving by priority

mod manager;
mod window;

pub use manager::{ActionManager, DoraTiming, MeldOutcome, MAX_KANS};
pub use window::{CallWindow, Resolution, Response, WindowKind};
