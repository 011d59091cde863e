//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `app` - 应用
//! - 管理应用生命周期（初始化、运行）
//! - 根据配置构建外部服务并注入
//! - 续跑时跳过已完成的条目
//! - 输出全局统计信息
//!
//! ### `batch_processor` - 批处理器
//! - 分块（`Vec<LearningItem>` → chunks）
//! - 逐块调用 ChunkFlow
//! - 每块完成后保存并重新加载结果表
//!
//! ## 层次关系
//!
//! ```text
//! app (处理整个输入文件)
//!     ↓
//! batch_processor (处理 Vec<LearningItem>，每块落盘)
//!     ↓
//! workflow::ChunkFlow (处理单个块)
//!     ↓
//! services (能力层：generate / search_images / warn)
//!     ↓
//! infrastructure (基础设施：TableStore)
//! ```

pub mod app;
pub mod batch_processor;

pub use app::{App, RunStats};
pub use batch_processor::BatchProcessor;
