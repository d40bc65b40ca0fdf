/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use std::fs;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::{AppError, AppResult};
use crate::orchestrator::SessionStats;

/// 初始化 tracing 订阅者
///
/// 优先使用 `RUST_LOG`，否则按 `verbose` 选择 `debug` 或 `info` 级别
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> AppResult<()> {
    let log_header = format!(
        "{}\n题目流会话日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header).map_err(|source| AppError::File {
        path: log_file_path.to_string(),
        source,
    })?;
    Ok(())
}

/// 记录程序启动信息
///
/// # 参数
/// - `api_base_url`: 题目服务地址
/// - `initial_load_count`: 首屏题目数
pub fn log_startup(api_base_url: &str, initial_load_count: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - For You 题目流");
    info!("🌐 题目服务: {}", api_base_url);
    info!("📊 首屏题目数: {}", initial_load_count);
    info!("{}", "=".repeat(60));
}

/// 记录首屏加载结果
pub fn log_feed_loaded(loaded: usize, requested: usize) {
    if loaded < requested {
        info!("⚠️ 首屏只加载到 {}/{} 道题", loaded, requested);
    } else {
        info!("✓ 首屏加载 {} 道题", loaded);
    }
}

/// 打印最终统计信息
///
/// # 参数
/// - `stats`: 会话统计
/// - `minutes`: 会话分钟数
/// - `log_file_path`: 日志文件路径
pub fn print_final_stats(stats: &SessionStats, minutes: i64, log_file_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 会话统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("📚 已加载: {} 道题", stats.loaded);
    info!("✏️ 已作答: {}", stats.answered);
    info!("✅ 答对: {}", stats.correct);
    info!("❌ 答错: {}", stats.wrong);
    info!("❔ 答案未返回: {}", stats.unrevealed);
    info!("⏱️ 用时: {} 分钟", minutes);
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
