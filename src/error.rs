use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 应用程序错误类型
///
/// 这里的错误都会终止整个批处理。配图错误（`EnrichmentError`）在块内就地恢复，不会出现在这里。
#[derive(Debug, Error)]
pub enum AppError {
    /// 生成服务错误（致命）
    #[error("生成错误: {0}")]
    Generation(#[from] GenerationError),
    /// 结果表读写错误（致命）
    #[error("持久化错误: {0}")]
    Persistence(#[from] PersistenceError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// LLM 生成错误
#[derive(Debug, Error)]
pub enum GenerationError {
    /// 构建请求失败
    #[error("构建 LLM 请求失败: {source}")]
    RequestBuildFailed { source: BoxError },
    /// API 调用失败（网络、配额等）
    #[error("LLM API调用失败 (模型: {model}): {source}")]
    ApiCallFailed { model: String, source: BoxError },
    /// 返回内容为空
    #[error("LLM返回内容为空 (模型: {model})")]
    EmptyContent { model: String },
    /// 返回内容无法解析为记录列表
    #[error("无法解析LLM返回的记录 (响应: {response}): {source}")]
    MalformedOutput { response: String, source: BoxError },
    /// 返回记录数与本块条目数不一致
    #[error("LLM返回 {actual} 条记录，本块应为 {expected} 条")]
    RecordCountMismatch { expected: usize, actual: usize },
    /// 记录的必填字段为空
    #[error("记录 '{term}' 的字段 {field} 为空")]
    MissingField { term: String, field: &'static str },
}

/// 配图搜索错误
#[derive(Debug, Error)]
pub enum EnrichmentError {
    /// 未配置搜索 API 凭据
    #[error("图片搜索未配置 (需要 GOOGLE_API_KEY 和 GOOGLE_SEARCH_ENGINE_ID)")]
    NotConfigured,
    /// 网络请求或响应解析失败
    #[error("图片搜索请求失败 ('{term}'): {source}")]
    RequestFailed { term: String, source: BoxError },
    /// 搜索 API 返回错误状态码
    #[error("图片搜索返回错误状态 ('{term}'): {status}")]
    BadResponse { term: String, status: u16 },
}

/// 结果表读写错误
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("读取结果表失败 ({path}): {source}")]
    ReadFailed { path: String, source: BoxError },
    #[error("写入结果表失败 ({path}): {source}")]
    WriteFailed { path: String, source: BoxError },
    /// 表头与输出格式不符
    #[error("结果表表头不匹配 ({path}): {found:?}")]
    SchemaMismatch { path: String, found: Vec<String> },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("块大小必须为正整数")]
    InvalidChunkSize,
    #[error("无法读取配置文件 ({path}): {source}")]
    FileUnreadable { path: String, source: BoxError },
}

// ========== 便捷构造函数 ==========

impl GenerationError {
    pub fn api_call_failed(
        model: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        GenerationError::ApiCallFailed {
            model: model.into(),
            source: Box::new(source),
        }
    }
}

impl EnrichmentError {
    pub fn request_failed(
        term: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        EnrichmentError::RequestFailed {
            term: term.into(),
            source: Box::new(source),
        }
    }
}

impl PersistenceError {
    pub fn read_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        PersistenceError::ReadFailed {
            path: path.into(),
            source: Box::new(source),
        }
    }

    pub fn write_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        PersistenceError::WriteFailed {
            path: path.into(),
            source: Box::new(source),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
