//! LLM 服务 - 业务能力层
//!
//! 只负责"为一个块生成卡片"能力，不关心流程
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use regex::Regex;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::GenerationError;
use crate::models::{CardKind, ChunkPayload, GeneratedRecord, GenerationReply};
use crate::services::Generator;
use crate::utils::logging::truncate_text;

/// LLM 服务
///
/// 职责：
/// - 把一个块的条目发给 LLM，解析出结构化记录
/// - 不出现 ResultTable
/// - 不关心块的顺序和持久化
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
    temperature: f32,
    max_tokens: u32,
    target_language: String,
    native_language: String,
}

impl LlmService {
    /// 创建新的 LLM 服务
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
            temperature: config.llm_temperature,
            max_tokens: config.llm_max_tokens,
            target_language: config.target_language.clone(),
            native_language: config.native_language.clone(),
        }
    }

    /// 通用的 LLM 调用函数
    ///
    /// # 参数
    /// - `user_message`: 用户消息内容
    /// - `system_message`: 系统消息（可选）
    ///
    /// # 返回
    /// 返回 LLM 的响应内容（字符串）
    pub async fn send_to_llm(
        &self,
        user_message: &str,
        system_message: Option<&str>,
    ) -> Result<String, GenerationError> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", user_message.len());

        let build_failed = |e: async_openai::error::OpenAIError| GenerationError::RequestBuildFailed {
            source: Box::new(e),
        };

        let mut messages = Vec::new();

        if let Some(sys_msg) = system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()
                .map_err(build_failed)?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()
            .map_err(build_failed)?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build()
            .map_err(build_failed)?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            GenerationError::api_call_failed(&self.model_name, e)
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| GenerationError::EmptyContent {
                model: self.model_name.clone(),
            })?;

        Ok(content.trim().to_string())
    }

    /// 构建系统消息
    fn build_system_message(&self, kind: CardKind) -> String {
        let target = &self.target_language;
        let native = &self.native_language;
        let (subject, extra) = match kind {
            CardKind::Vocabulary => ("vocabulary words", String::new()),
            CardKind::Grammar => (
                "grammar rules",
                format!(
                    "- Give every meaning of the grammar rule, rewriting the provided meaning in {}.\n",
                    native
                ),
            ),
        };

        format!(
            "You are an AI assistant specialized in generating contextually relevant and natural example \
             sentences for {subject} in {target}, helping {native} native speakers learn the language.\n\
             For each item provided:\n\
             {extra}\
             - Create 2 natural, contextually appropriate example sentences.\n\
             - Keep sentences clear and concise, demonstrating proper usage.\n\
             - Use common situations that learners can relate to.\n\
             - Avoid complex grammar or rare vocabulary in the examples.\n\
             - Include different forms of the word if applicable.\n\
             - For each example sentence, provide its translation in {native}.\n\
             - Keep the `meaning` field in {native}."
        )
    }

    /// 构建用户消息
    fn build_user_message(&self, payload: &ChunkPayload) -> String {
        format!(
            r#"{}
Return exactly {} records, one per numbered item above and in the same order.
Reply with a single JSON object and nothing else:
{{"records": [{{"term": "...", "meaning": "...", "example_1": "...", "example_1_meaning": "...", "example_2": "...", "example_2_meaning": "..."}}]}}"#,
            payload.render().trim_end(),
            payload.len()
        )
    }
}

#[async_trait]
impl Generator for LlmService {
    async fn generate(&self, payload: &ChunkPayload) -> Result<Vec<GeneratedRecord>, GenerationError> {
        let system_message = self.build_system_message(payload.kind);
        let user_message = self.build_user_message(payload);

        let response = self.send_to_llm(&user_message, Some(&system_message)).await?;
        let records = parse_generation_response(&response)?;

        debug!("LLM 返回 {} 条记录", records.len());
        Ok(records)
    }
}

/// 从响应中提取 JSON 文本
///
/// 优先使用 ```json 代码块，否则取最外层的 `{...}` 或 `[...]`
fn extract_json(response: &str) -> &str {
    let fenced = Regex::new(r"(?s)```(?:json)?\s*(.*?)```")
        .ok()
        .and_then(|re| re.captures(response))
        .and_then(|cap| cap.get(1));
    if let Some(inner) = fenced {
        return inner.as_str().trim();
    }

    let start = response.find(['{', '[']);
    let end = response.rfind(['}', ']']);
    match (start, end) {
        (Some(s), Some(e)) if s < e => &response[s..=e],
        _ => response.trim(),
    }
}

/// 解析 LLM 响应为记录列表
pub fn parse_generation_response(response: &str) -> Result<Vec<GeneratedRecord>, GenerationError> {
    let json = extract_json(response);
    serde_json::from_str::<GenerationReply>(json)
        .map(GenerationReply::into_records)
        .map_err(|e| GenerationError::MalformedOutput {
            response: truncate_text(response, 200),
            source: Box::new(e),
        })
}
