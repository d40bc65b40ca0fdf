pub mod answer_state;
pub mod feed_store;
pub mod option_animation;
pub mod reveal_cache;

pub use answer_state::{AnswerBook, AnswerState, ItemInteraction, OptionVerdict};
pub use feed_store::{AppendOutcome, FeedStore};
pub use option_animation::{OptionAnimator, OptionPhase};
pub use reveal_cache::RevealCache;
