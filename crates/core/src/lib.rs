//! Core domain types, record loading, and card layout for name-card
//! deck generation.

pub mod error;
pub mod layout;
pub mod loader;
pub mod types;

pub use error::{Error, Result};
pub use layout::plan_deck;
pub use loader::VisitorLoader;
pub use types::{Deck, Position, Size, SlidePlan, TextBox, Visitor};
