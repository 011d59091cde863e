//! 日志工具模块
//!
//! 提供日志初始化、日志格式化和输出的辅助函数

use anyhow::Result;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::orchestrator::RunStats;
use crate::workflow::ChunkCtx;

/// 初始化 tracing 日志
///
/// `RUST_LOG` 优先；否则默认 info，`verbose` 时为 debug。重复调用无副作用。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n卡片生成日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 在日志文件末尾追加运行统计
pub fn append_log_summary(log_file_path: &str, stats: &RunStats) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;

    writeln!(
        file,
        "完成时间: {}\n条目总数: {}\n续跑起点: {}\n本次处理: {}\n结果行数: {}\n无配图: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        stats.total_items,
        stats.resumed_rows,
        stats.processed,
        stats.final_rows,
        stats.missing_images
    )?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 分块生成模式");
    info!("📚 卡片类型: {} ({} → {})", config.card_kind, config.target_language, config.native_language);
    info!("🤖 模型: {}", config.llm_model_name);
    info!("📦 每块条目数: {}", config.chunk_size);
    info!("📄 输入: {} | 输出: {}", config.input_path, config.output_path);
    info!("{}", "=".repeat(60));
}

/// 记录断点信息
///
/// # 参数
/// - `existing_rows`: 输出文件中已有的行数
/// - `total`: 本次待处理的条目数
/// - `total_chunks`: 块总数
/// - `chunk_size`: 每块条目数
pub fn log_resume_point(existing_rows: usize, total: usize, total_chunks: usize, chunk_size: usize) {
    if existing_rows > 0 {
        info!("↻ 输出文件已有 {} 行，新结果将追加在其后", existing_rows);
    }
    info!("✓ 本次待处理 {} 个条目", total);
    info!("📋 将以每块 {} 个的方式处理，共 {} 块", chunk_size, total_chunks);
    info!("💡 每块完成后立即保存\n");
}

/// 记录块开始信息
pub fn log_chunk_start(ctx: &ChunkCtx, total: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始处理第 {}/{} 块", ctx.chunk_index, ctx.total_chunks);
    info!("📄 本块条目: {}-{} / 共 {} 个", ctx.first_item, ctx.last_item(), total);
    info!("{}", "=".repeat(60));
}

/// 记录块完成信息
pub fn log_chunk_complete(ctx: &ChunkCtx, rows: usize, output_path: &Path) {
    info!("\n{}", "─".repeat(60));
    info!(
        "✓ 第 {} 块已保存: 结果表共 {} 行 → {}",
        ctx.chunk_index,
        rows,
        output_path.display()
    );
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
pub fn print_final_stats(stats: &RunStats, config: &Config) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 本次处理: {}/{}", stats.processed, stats.total_items);
    info!("📄 结果表行数: {}", stats.final_rows);
    info!("🖼️ 无配图: {}", stats.missing_images);
    info!("{}", "=".repeat(60));
    info!("\n结果已保存至: {}", config.output_path);
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
