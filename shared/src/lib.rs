//! Door, look and movement logic shared by the game client and its tests.
//!
//! Everything here is engine-side logic with no renderer or physics backend attached.
//! Spatial queries and character collision go through the traits in [`physics`], and
//! door animation through [`tween::TweenService`].

pub mod config;
pub mod door;
pub mod interaction;
pub mod look;
pub mod movement;
pub mod physics;
pub mod player;
pub mod tween;

pub use config::*;
pub use door::*;
pub use interaction::*;
pub use look::*;
pub use movement::*;
pub use physics::*;
pub use player::*;
pub use tween::*;
