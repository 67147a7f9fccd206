pub mod bonuses;
pub mod encounters;
pub mod landing;
pub mod movement;

pub use bonuses::*;
pub use landing::{accept_offer, apply_fallback, resolve_landing, Effect, Fallback, Landing, Offer, TradeItem};
pub use movement::*;
