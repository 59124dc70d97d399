pub mod card;
pub mod container;
pub mod scryfall;

pub use card::*;
pub use container::*;
pub use scryfall::*;
