//! 配图搜索服务
//!
//! 使用 Google Custom Search JSON API 为单个词条搜索图片

use crate::config::Config;
use crate::error::EnrichmentError;
use crate::services::ImageSearcher;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

const CUSTOM_SEARCH_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

/// 搜索 API 的响应（只取需要的字段）
#[derive(Debug, Deserialize)]
struct CustomSearchResponse {
    #[serde(default)]
    items: Vec<CustomSearchItem>,
}

#[derive(Debug, Deserialize)]
struct CustomSearchItem {
    link: Option<String>,
}

/// 配图搜索服务
pub struct ImageSearch {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    engine_id: Option<String>,
    num_images: usize,
}

impl ImageSearch {
    /// 创建新的搜索服务
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: CUSTOM_SEARCH_ENDPOINT.to_string(),
            api_key: config.google_api_key.clone().filter(|k| !k.trim().is_empty()),
            engine_id: config
                .google_search_engine_id
                .clone()
                .filter(|k| !k.trim().is_empty()),
            // API 单次最多返回 10 条
            num_images: config.images_per_search.clamp(1, 10),
        }
    }

    /// 使用自定义端点（兼容同格式的代理服务）
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some() && self.engine_id.is_some()
    }
}

#[async_trait]
impl ImageSearcher for ImageSearch {
    async fn search_images(&self, term: &str) -> Result<Vec<String>, EnrichmentError> {
        let (Some(api_key), Some(engine_id)) = (&self.api_key, &self.engine_id) else {
            return Err(EnrichmentError::NotConfigured);
        };

        debug!("搜索配图: {}", term);

        let num = self.num_images.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("key", api_key.as_str()),
                ("cx", engine_id.as_str()),
                ("q", term),
                ("searchType", "image"),
                ("num", num.as_str()),
            ])
            .send()
            .await
            .map_err(|e| EnrichmentError::request_failed(term, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EnrichmentError::BadResponse {
                term: term.to_string(),
                status: status.as_u16(),
            });
        }

        let body: CustomSearchResponse = response
            .json()
            .await
            .map_err(|e| EnrichmentError::request_failed(term, e))?;

        Ok(extract_links(body))
    }
}

/// 提取图片链接，保持 API 返回顺序
fn extract_links(body: CustomSearchResponse) -> Vec<String> {
    body.items
        .into_iter()
        .filter_map(|item| item.link)
        .filter(|link| !link.trim().is_empty())
        .collect()
}
