//! # For You Feed
//!
//! 无限滑动的选择题题目流控制器：按需拉取题目、记录作答、查询正确答案
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Clients）
//! - `clients/` - 与题目服务交互，只暴露能力
//! - `QuestionSource` - 拉取下一道题 / 查询正确答案
//! - `HttpQuestionSource` - 基于 reqwest 的实现
//! - `RetryingSource` - 在题目源边界追加重试
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，各自持有一份状态
//! - `FeedStore` - 只追加的题目列表，单个在途追加请求
//! - `RevealCache` - 答案查询去重 + 缓存
//! - `AnswerBook` - 每道题的作答状态机与选项动画状态
//!
//! ### ③ 流程层（Workflow）
//! - `PrefetchScheduler` - 滑动位置 → 追加请求
//! - `AnswerFlow` - 选择 → 查询答案 → 补全
//!
//! ### ④ 编排层（Orchestration）
//! - `FeedSession` - 会话内唯一的状态来源，对外只给只读快照
//! - `App` - 无界面会话运行器
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

#[cfg(test)]
pub(crate) mod testing;

// 重新导出常用类型
pub use clients::{HttpQuestionSource, QuestionSource, RetryingSource};
pub use config::Config;
pub use error::{AppError, AppResult, ConfigError, NetworkError};
pub use models::{McqItem, McqOption};
pub use orchestrator::{App, FeedSession, FeedSnapshot, SessionStats};
pub use services::{AnswerState, AppendOutcome, FeedStore, RevealCache};
pub use workflow::{PrefetchDecision, PrefetchScheduler, SelectOutcome};
