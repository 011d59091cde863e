//! 业务能力层
//!
//! 每个服务只描述"我能做什么"：生成一个块的卡片、为一个词搜索配图、写一行警告。
//! 批处理只依赖这里的 trait，外部客户端在启动时构建并注入。

pub mod image_search;
pub mod llm_service;
pub mod warn_writer;

pub use image_search::ImageSearch;
pub use llm_service::LlmService;
pub use warn_writer::WarnWriter;

use crate::error::{EnrichmentError, GenerationError};
use crate::models::{ChunkPayload, GeneratedRecord};
use async_trait::async_trait;

/// 卡片生成能力
#[async_trait]
pub trait Generator: Send + Sync {
    /// 为整个块生成记录，失败即整个块失败
    async fn generate(&self, payload: &ChunkPayload) -> Result<Vec<GeneratedRecord>, GenerationError>;
}

/// 配图搜索能力
#[async_trait]
pub trait ImageSearcher: Send + Sync {
    /// 返回按相关度排序的图片 URL
    async fn search_images(&self, term: &str) -> Result<Vec<String>, EnrichmentError>;
}

#[async_trait]
impl<T: Generator + ?Sized> Generator for std::sync::Arc<T> {
    async fn generate(&self, payload: &ChunkPayload) -> Result<Vec<GeneratedRecord>, GenerationError> {
        (**self).generate(payload).await
    }
}

#[async_trait]
impl<T: ImageSearcher + ?Sized> ImageSearcher for std::sync::Arc<T> {
    async fn search_images(&self, term: &str) -> Result<Vec<String>, EnrichmentError> {
        (**self).search_images(term).await
    }
}
