pub mod answer_flow;
pub mod prefetch;

pub use answer_flow::{AnswerFlow, SelectOutcome};
pub use prefetch::{PrefetchDecision, PrefetchPolicy, PrefetchScheduler};
