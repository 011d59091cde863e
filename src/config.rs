use crate::error::{AppResult, ConfigError};
use crate::models::CardKind;
use serde::Deserialize;
use std::path::Path;

/// 默认配置文件名（位于工作目录）
pub const DEFAULT_CONFIG_FILE: &str = "flashcards.toml";

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 每次 LLM 调用处理的条目数量
    pub chunk_size: usize,
    /// 输入文件（term, meaning）
    pub input_path: String,
    /// 输入文件是否带表头
    pub input_has_header: bool,
    /// 输出表格路径（同时也是断点文件）
    pub output_path: String,
    /// 续跑时跳过输出中已有行数对应的条目
    pub skip_completed: bool,
    /// 生成词汇卡片还是语法卡片
    pub card_kind: CardKind,
    /// 学习的目标语言
    pub target_language: String,
    /// 学习者母语
    pub native_language: String,
    /// 是否为每条记录搜索配图，未设置时由 card_kind 决定
    pub enrich_images: Option<bool>,
    /// 每次图片搜索请求的结果数
    pub images_per_search: usize,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    pub llm_temperature: f32,
    pub llm_max_tokens: u32,
    // --- 图片搜索配置 ---
    pub google_api_key: Option<String>,
    pub google_search_engine_id: Option<String>,
    /// 记录无法配图的条目
    pub warn_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 运行日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chunk_size: 10,
            input_path: "data/words.csv".to_string(),
            input_has_header: false,
            output_path: "data/flashcards.csv".to_string(),
            skip_completed: true,
            card_kind: CardKind::Vocabulary,
            target_language: "Japanese".to_string(),
            native_language: "Vietnamese".to_string(),
            enrich_images: None,
            images_per_search: 5,
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o-mini".to_string(),
            llm_temperature: 0.3,
            llm_max_tokens: 4096,
            google_api_key: None,
            google_search_engine_id: None,
            warn_file: "warn.txt".to_string(),
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
        }
    }
}

impl Config {
    /// 加载配置：默认值 → TOML 文件（可选）→ 环境变量
    pub fn load() -> AppResult<Self> {
        let explicit = std::env::var("CONFIG_FILE").ok();
        let base = match explicit.as_deref() {
            Some(path) => Self::from_toml_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_toml_file(DEFAULT_CONFIG_FILE)?
            }
            None => Self::default(),
        };
        Ok(Self::from_env_with(base))
    }

    /// 从 TOML 文件读取配置，缺失的字段使用默认值
    pub fn from_toml_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let unreadable = |source: Box<dyn std::error::Error + Send + Sync>| ConfigError::FileUnreadable {
            path: path.display().to_string(),
            source,
        };
        let content = std::fs::read_to_string(path).map_err(|e| unreadable(Box::new(e)))?;
        let config = toml::from_str(&content).map_err(|e| unreadable(Box::new(e)))?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        let config = toml::from_str(content).map_err(|e| ConfigError::FileUnreadable {
            path: "<inline>".to_string(),
            source: Box::new(e),
        })?;
        Ok(config)
    }

    pub fn from_env() -> Self {
        Self::from_env_with(Self::default())
    }

    /// 用环境变量覆盖 `base` 中的值
    pub fn from_env_with(base: Self) -> Self {
        let env = |name: &str| std::env::var(name).ok();
        Self {
            chunk_size: env("CHUNK_SIZE").and_then(|v| v.parse().ok()).unwrap_or(base.chunk_size),
            input_path: env("INPUT_PATH").unwrap_or(base.input_path),
            input_has_header: env("INPUT_HAS_HEADER").and_then(|v| v.parse().ok()).unwrap_or(base.input_has_header),
            output_path: env("OUTPUT_PATH").unwrap_or(base.output_path),
            skip_completed: env("SKIP_COMPLETED").and_then(|v| v.parse().ok()).unwrap_or(base.skip_completed),
            card_kind: env("CARD_KIND").and_then(|v| v.parse().ok()).unwrap_or(base.card_kind),
            target_language: env("TARGET_LANGUAGE").unwrap_or(base.target_language),
            native_language: env("NATIVE_LANGUAGE").unwrap_or(base.native_language),
            enrich_images: env("ENRICH_IMAGES").and_then(|v| v.parse().ok()).or(base.enrich_images),
            images_per_search: env("IMAGES_PER_SEARCH").and_then(|v| v.parse().ok()).unwrap_or(base.images_per_search),
            llm_api_key: env("LLM_API_KEY").or_else(|| env("OPENAI_API_KEY")).unwrap_or(base.llm_api_key),
            llm_api_base_url: env("LLM_API_BASE_URL").unwrap_or(base.llm_api_base_url),
            llm_model_name: env("LLM_MODEL_NAME").unwrap_or(base.llm_model_name),
            llm_temperature: env("LLM_TEMPERATURE").and_then(|v| v.parse().ok()).unwrap_or(base.llm_temperature),
            llm_max_tokens: env("LLM_MAX_TOKENS").and_then(|v| v.parse().ok()).unwrap_or(base.llm_max_tokens),
            google_api_key: env("GOOGLE_API_KEY").or(base.google_api_key),
            google_search_engine_id: env("GOOGLE_SEARCH_ENGINE_ID").or(base.google_search_engine_id),
            warn_file: env("WARN_FILE").unwrap_or(base.warn_file),
            verbose_logging: env("VERBOSE_LOGGING").and_then(|v| v.parse().ok()).unwrap_or(base.verbose_logging),
            output_log_file: env("OUTPUT_LOG_FILE").unwrap_or(base.output_log_file),
        }
    }

    /// 是否进行配图
    pub fn should_enrich_images(&self) -> bool {
        self.enrich_images
            .unwrap_or_else(|| self.card_kind.enriches_by_default())
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.chunk_size == 0 {
            return Err(ConfigError::InvalidChunkSize.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_overrides_only_given_fields() {
        let config = Config::from_toml_str(
            r#"
            chunk_size = 3
            card_kind = "grammar"
            output_path = "out/grammars.tsv"
            "#,
        )
        .unwrap();

        assert_eq!(config.chunk_size, 3);
        assert_eq!(config.card_kind, CardKind::Grammar);
        assert_eq!(config.output_path, "out/grammars.tsv");
        assert_eq!(config.llm_model_name, Config::default().llm_model_name);
    }

    #[test]
    fn test_enrichment_follows_card_kind_unless_set() {
        let mut config = Config::default();
        assert!(config.should_enrich_images());

        config.card_kind = CardKind::Grammar;
        assert!(!config.should_enrich_images());

        config.enrich_images = Some(true);
        assert!(config.should_enrich_images());
    }

    #[test]
    fn test_zero_chunk_size_is_rejected() {
        let config = Config {
            chunk_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_toml_is_config_error() {
        let err = Config::from_toml_str("chunk_size = \"many\"").unwrap_err();
        assert!(matches!(err, crate::error::AppError::Config(_)));
    }
}
