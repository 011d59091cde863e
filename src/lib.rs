//! # Flashcard Generator
//!
//! 为语言学习者批量生成词汇 / 语法卡片：LLM 生成例句和释义，
//! 图片搜索补充配图，结果逐块写入表格文件，中途失败可续跑。
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有输出文件，只暴露加载 / 原子保存能力
//! - `TableStore` - 唯一读写结果表的组件
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，每次只处理一个块或一个词条
//! - `LlmService` - 生成能力（实现 `Generator`）
//! - `ImageSearch` - 配图能力（实现 `ImageSearcher`）
//! - `WarnWriter` - 写 warn.txt 能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个块"的完整处理流程
//! - `ChunkCtx` - 上下文封装（块编号 + 条目序号）
//! - `ChunkFlow` - 流程编排（请求 → 生成 → 校验 → 配图）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 分块、逐块落盘
//! - `orchestrator/app` - 应用生命周期、续跑

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult, EnrichmentError, GenerationError, PersistenceError};
pub use infrastructure::TableStore;
pub use models::{CardKind, ChunkPayload, GeneratedRecord, LearningItem, ResultTable};
pub use orchestrator::{App, BatchProcessor};
pub use services::{Generator, ImageSearcher};
pub use workflow::{ChunkCtx, ChunkFlow, FlowOptions};
