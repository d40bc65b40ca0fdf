pub mod http_source;
pub mod question_source;
pub mod retrying;

pub use http_source::HttpQuestionSource;
pub use question_source::QuestionSource;
pub use retrying::RetryingSource;
