//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：写日志文件头、根据配置构建外部服务
//! 2. **加载条目**：读取输入文件（`Vec<LearningItem>`）
//! 3. **续跑**：跳过输出文件中已有行数对应的条目
//! 4. **委托处理**：交给 `BatchProcessor`
//! 5. **全局统计**：输出并记录本次运行结果

use crate::config::Config;
use crate::infrastructure::TableStore;
use crate::models::{self, LearningItem};
use crate::orchestrator::BatchProcessor;
use crate::services::{ImageSearch, LlmService, WarnWriter};
use crate::utils::logging;
use crate::workflow::FlowOptions;
use anyhow::{Context, Result};
use tracing::{info, warn};

/// 运行统计
#[derive(Debug, Default)]
pub struct RunStats {
    /// 输入文件中的条目总数
    pub total_items: usize,
    /// 开始前已完成的行数
    pub resumed_rows: usize,
    /// 本次处理的条目数
    pub processed: usize,
    /// 最终结果表行数
    pub final_rows: usize,
    /// 没有配图的行数
    pub missing_images: usize,
}

/// 应用主结构
pub struct App {
    config: Config,
    processor: BatchProcessor<LlmService, ImageSearch>,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        config.validate()?;

        logging::init_log_file(&config.output_log_file)?;
        logging::log_startup(&config);

        let searcher = ImageSearch::new(&config);
        let options = FlowOptions::from_config(&config);
        if options.enrich_images && !searcher.is_configured() {
            warn!("⚠️ 未配置 GOOGLE_API_KEY / GOOGLE_SEARCH_ENGINE_ID，所有记录将没有配图");
        }

        let processor = BatchProcessor::new(LlmService::new(&config), searcher, options)
            .with_warn_writer(WarnWriter::with_path(&config.warn_file));

        Ok(Self { config, processor })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<RunStats> {
        let all_items = models::load_items(&self.config.input_path, self.config.input_has_header).await?;

        if all_items.is_empty() {
            warn!("⚠️ 输入文件中没有条目，程序结束");
            return Ok(RunStats::default());
        }

        let resumed_rows = TableStore::new(&self.config.output_path)
            .load()
            .context("无法读取已有的输出文件")?
            .len();
        let pending = pending_items(&all_items, resumed_rows, self.config.skip_completed);

        let table = self
            .processor
            .process_all(pending, self.config.chunk_size, &self.config.output_path)
            .await
            .with_context(|| format!("批处理中止，输出文件: {}", self.config.output_path))?;

        let stats = RunStats {
            total_items: all_items.len(),
            resumed_rows,
            processed: pending.len(),
            final_rows: table.len(),
            missing_images: table.missing_images(),
        };

        logging::print_final_stats(&stats, &self.config);
        logging::append_log_summary(&self.config.output_log_file, &stats)?;

        Ok(stats)
    }
}

/// 续跑时跳过已完成的条目
///
/// 输出文件的第 N 行对应输入的第 N 个条目，已有 `done` 行即跳过前 `done` 个。
fn pending_items(all_items: &[LearningItem], done: usize, skip_completed: bool) -> &[LearningItem] {
    if !skip_completed || done == 0 {
        return all_items;
    }

    if done >= all_items.len() {
        info!("✓ 输出文件已有 {} 行，全部 {} 个条目均已完成", done, all_items.len());
        return &[];
    }

    info!("↻ 输出文件已有 {} 行，从第 {} 个条目继续", done, done + 1);
    &all_items[done..]
}
