//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `feed_session` - 题目流会话
//! - 持有 FeedStore / AnswerBook / RevealCache，会话内唯一的状态来源
//! - 对界面层只暴露只读快照和少数事件入口（滑动、选择、动画完成）
//!
//! ### `app` - 无界面会话运行器
//! - 初始化日志、题目源和会话
//! - 模拟滑动和作答，输出统计
//!
//! ## 层次关系
//!
//! ```text
//! app (运行一次会话)
//!     ↓
//! feed_session (状态来源 + 快照)
//!     ↓
//! workflow::{PrefetchScheduler, AnswerFlow}
//!     ↓
//! services (能力层：feed_store / reveal_cache / answer_state)
//!     ↓
//! clients (基础设施：QuestionSource)
//! ```

pub mod app;
pub mod feed_session;

pub use app::App;
pub use feed_session::{FeedSession, FeedSnapshot, ItemView, OptionView, SessionStats};
