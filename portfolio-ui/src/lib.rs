pub mod carousel;
pub mod config;
pub mod context;
pub mod deck;
pub mod error;
pub mod events;
pub mod menu;
pub mod navigation;
pub mod reveal;
pub mod scheduler;
pub mod theme;

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(test)]
pub(crate) mod test_support;

pub use carousel::*;
pub use config::*;
pub use context::*;
pub use deck::*;
pub use error::*;
pub use events::*;
pub use menu::*;
pub use navigation::*;
pub use reveal::*;
pub use scheduler::*;
pub use theme::*;
