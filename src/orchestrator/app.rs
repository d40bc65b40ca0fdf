//! 无界面会话运行器 - 编排层
//!
//! ## 职责
//!
//! 代替界面层跑一次完整的题目流会话：
//!
//! 1. **应用初始化**：日志文件、启动信息、HTTP 题目源、会话
//! 2. **首屏加载**：`FeedSession::start`
//! 3. **模拟滑动**：逐页发送滑动信号，对看到的题目选第一个选项并等待答案
//! 4. **动画收尾**：把填充中的选项标记为完成
//! 5. **全局统计**：输出作答统计
//!
//! 只读取会话快照，不直接改动任何状态。

use std::sync::Arc;
use tracing::{info, warn};

use crate::clients::{HttpQuestionSource, QuestionSource, RetryingSource};
use crate::config::Config;
use crate::error::AppResult;
use crate::orchestrator::feed_session::{FeedSession, ItemView};
use crate::services::OptionPhase;
use crate::utils::logging::{
    init_log_file, log_feed_loaded, log_startup, print_final_stats, truncate_text,
};
use crate::workflow::SelectOutcome;

/// 应用主结构
pub struct App {
    config: Config,
    session: FeedSession,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> AppResult<Self> {
        // 初始化日志文件
        init_log_file(&config.output_log_file)?;

        log_startup(&config.api_base_url, config.initial_load_count);

        let http = HttpQuestionSource::new(&config)?;
        let source: Arc<dyn QuestionSource> = Arc::new(RetryingSource::from_config(http, &config));

        Ok(Self::with_source(config, source))
    }

    /// 使用指定题目源创建应用
    pub fn with_source(config: Config, source: Arc<dyn QuestionSource>) -> Self {
        let session = FeedSession::new(source, &config);
        Self { config, session }
    }

    pub fn session(&self) -> &FeedSession {
        &self.session
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> AppResult<()> {
        let loaded = self.session.start().await;
        log_feed_loaded(loaded, self.config.initial_load_count);

        if loaded == 0 {
            warn!("⚠️ 首屏没有加载到题目，程序结束");
            return Ok(());
        }

        for page in 0..self.config.demo_pages {
            let decision = self.session.on_scroll(page).await;
            if self.config.verbose_logging {
                info!("[第 {} 页] 滑动信号: {:?}", page + 1, decision);
            }

            let snapshot = self.session.snapshot();
            let Some(view) = snapshot.items.get(page) else {
                warn!("⚠️ 第 {} 页没有题目，停止滑动", page + 1);
                break;
            };

            self.answer(page, view).await;
        }

        print_final_stats(
            &self.session.stats(),
            self.session.minutes_spent(),
            &self.config.output_log_file,
        );

        Ok(())
    }

    /// 对一道题选择第一个选项，等待答案后收尾动画
    async fn answer(&self, page: usize, view: &ItemView) {
        let item = &view.item;
        info!(
            "[第 {} 页] 题目 #{}: {}",
            page + 1,
            item.id,
            truncate_text(&item.question, 80)
        );

        let Some(choice) = item.options.first() else {
            return;
        };

        match self.session.select_and_wait(item.id, &choice.id).await {
            SelectOutcome::Accepted => {
                info!("[第 {} 页] 选择: {}", page + 1, truncate_text(&choice.label, 40));
            }
            other => {
                warn!("[第 {} 页] 选择未生效: {:?}", page + 1, other);
                return;
            }
        }

        // 没有界面时动画立即完成
        let snapshot = self.session.snapshot();
        if let Some(updated) = snapshot.items.iter().find(|v| v.item.id == item.id) {
            for option in &updated.options {
                if option.phase == OptionPhase::Filling {
                    self.session.settle_option(item.id, &option.id);
                }
            }
        }
    }
}
