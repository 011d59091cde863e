//! 批处理器 - 编排层
//!
//! ## 职责
//!
//! 把任意长度的条目列表分块交给 `ChunkFlow`，并在每块完成后立即持久化。
//!
//! ## 核心流程
//!
//! 1. **分块**：按 `chunk_size` 切分，保持输入顺序
//! 2. **加载断点**：读取已有的输出文件（不存在则为空表）
//! 3. **逐块处理**：生成 → 配图 → 追加 → 保存 → 重新加载
//! 4. **失败即停**：生成或持久化失败时立即返回，之前的块已经落盘
//!
//! ## 设计特点
//!
//! - **严格串行**：上一块写盘并重新读取之前，不会发起下一块的生成请求
//! - **块级原子**：输出文件中不会出现半个块
//! - **单写者**：同一输出文件只由一个 BatchProcessor 写入

use std::path::Path;
use tracing::{error, info};

use crate::error::{AppResult, ConfigError};
use crate::infrastructure::TableStore;
use crate::models::{LearningItem, ResultTable};
use crate::services::{Generator, ImageSearcher, WarnWriter};
use crate::utils::logging;
use crate::workflow::{ChunkCtx, ChunkFlow, FlowOptions};

/// 批处理器
pub struct BatchProcessor<G, S> {
    flow: ChunkFlow<G, S>,
}

impl<G: Generator, S: ImageSearcher> BatchProcessor<G, S> {
    /// 创建批处理器，外部服务由调用方注入
    pub fn new(generator: G, searcher: S, options: FlowOptions) -> Self {
        Self {
            flow: ChunkFlow::new(generator, searcher, options),
        }
    }

    pub fn with_warn_writer(mut self, warn_writer: WarnWriter) -> Self {
        self.flow = self.flow.with_warn_writer(warn_writer);
        self
    }

    /// 处理全部条目
    ///
    /// # 参数
    /// - `items`: 条目列表，顺序决定分块边界和输出行顺序。条目接在输出文件已有行之后，
    ///   序号从已有行数 + 1 开始，续跑时与输入文件中的位置一致
    /// - `chunk_size`: 每块条目数，必须大于 0
    /// - `output_path`: 输出文件（即断点文件），所在目录必须已存在
    ///
    /// # 返回
    /// 返回最终的结果表（已有行 + 本次生成的行）
    pub async fn process_all(
        &self,
        items: &[LearningItem],
        chunk_size: usize,
        output_path: impl AsRef<Path>,
    ) -> AppResult<ResultTable> {
        if chunk_size == 0 {
            return Err(ConfigError::InvalidChunkSize.into());
        }

        let store = TableStore::new(output_path.as_ref());
        let mut table = store.load()?;

        if items.is_empty() {
            info!("没有待处理的条目，结果表保持 {} 行", table.len());
            return Ok(table);
        }

        let offset = table.len();
        let total_chunks = items.len().div_ceil(chunk_size);
        logging::log_resume_point(offset, items.len(), total_chunks, chunk_size);

        for (idx, chunk) in items.chunks(chunk_size).enumerate() {
            let ctx = ChunkCtx::new(idx + 1, total_chunks, offset + idx * chunk_size + 1, chunk.len());
            logging::log_chunk_start(&ctx, offset + items.len());

            let records = match self.flow.run(chunk, &ctx).await {
                Ok(records) => records,
                Err(e) => {
                    error!("{} ❌ 处理失败: {}", ctx, e);
                    error!(
                        "已完成 {} 块，输出文件保持 {} 行: {}",
                        idx,
                        table.len(),
                        store.path().display()
                    );
                    return Err(e);
                }
            };

            table.append(records);

            if let Err(e) = store.save(&table) {
                error!("{} ❌ 保存结果表失败: {}", ctx, e);
                return Err(e);
            }
            table = store.load()?;

            logging::log_chunk_complete(&ctx, table.len(), store.path());
        }

        Ok(table)
    }
}
