//! Last Hearth: defend the tavern from waves of monsters.
//!
//! The library holds the whole game core.  `compute` is a set of pure state
//! transitions over `entities::RunState`; `engine::WaveEngine` wraps them with
//! an RNG, an overlap provider and a save store so a frame loop only has to
//! feed it elapsed time and input.

pub mod compute;
pub mod config;
pub mod engine;
pub mod entities;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod storage;
pub mod upgrades;
