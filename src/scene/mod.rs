//! Game scenes: main menu and match play, plus the countdown timer

pub mod countdown;
pub mod game;
pub mod menu;

pub use countdown::Countdown;
pub use game::{MatchMode, MatchScene, MatchShared};
pub use menu::MenuScene;
