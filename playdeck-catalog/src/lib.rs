//! Finding a game from the slug in a page path, and picking games to show
//! next to it.
//!
//! There is no "fetch by slug" endpoint. The resolver fetches the whole
//! collection, derives a slug for every title and matches the requested one
//! against them.
#[cfg(test)]
mod fixtures;
pub mod matching;
pub mod related;
pub mod resolver;
pub mod slug;

pub use matching::{find_by_slug, MatchKind, SlugMatch, Titled};
pub use related::{related_games, RelatedOrder};
pub use resolver::{
    resolve, DetailState, DetailView, GameDetail, GameSource, LoadTicket, NotFoundReason,
};
pub use slug::slugify;
