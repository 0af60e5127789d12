//! UI module

pub mod pause_menu;
pub mod styles;

pub use pause_menu::PauseMenuPlugin;
