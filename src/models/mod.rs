pub mod payload;
pub mod question;

pub use payload::{ForYouPayload, RevealPayload};
pub use question::{Author, McqItem, McqOption};
