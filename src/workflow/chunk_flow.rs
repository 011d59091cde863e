//! 块处理流程 - 流程层
//!
//! 核心职责：定义"一个块"的完整处理流程
//!
//! 流程顺序：
//! 1. 构建请求（每个条目一行）
//! 2. 生成 → 校验（失败即整个块失败）
//! 3. 逐条配图（失败只影响该条记录）

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{AppResult, GenerationError};
use crate::models::{CardKind, ChunkPayload, GeneratedRecord, LearningItem};
use crate::services::{Generator, ImageSearcher, WarnWriter};
use crate::utils::logging::truncate_text;
use crate::workflow::chunk_ctx::ChunkCtx;

/// 流程选项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowOptions {
    pub card_kind: CardKind,
    pub enrich_images: bool,
}

impl Default for FlowOptions {
    fn default() -> Self {
        Self {
            card_kind: CardKind::Vocabulary,
            enrich_images: true,
        }
    }
}

impl FlowOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            card_kind: config.card_kind,
            enrich_images: config.should_enrich_images(),
        }
    }
}

/// 块处理流程
///
/// - 编排单个块的生成与配图
/// - 不持有结果表，不做持久化
/// - 只依赖业务能力（services）
pub struct ChunkFlow<G, S> {
    generator: G,
    searcher: S,
    warn_writer: Option<WarnWriter>,
    options: FlowOptions,
}

impl<G: Generator, S: ImageSearcher> ChunkFlow<G, S> {
    /// 创建新的块处理流程
    pub fn new(generator: G, searcher: S, options: FlowOptions) -> Self {
        Self {
            generator,
            searcher,
            warn_writer: None,
            options,
        }
    }

    pub fn with_warn_writer(mut self, warn_writer: WarnWriter) -> Self {
        self.warn_writer = Some(warn_writer);
        self
    }

    pub async fn run(&self, chunk: &[LearningItem], ctx: &ChunkCtx) -> AppResult<Vec<GeneratedRecord>> {
        // ========== 步骤 1: 构建请求 ==========
        let payload = ChunkPayload::build(self.options.card_kind, chunk, ctx.first_item);
        debug!("{} 请求内容:\n{}", ctx, payload.render());

        // ========== 步骤 2: 生成并校验 ==========
        info!("{} 🤖 正在生成 {} 个条目...", ctx, payload.len());
        let mut records = self.generator.generate(&payload).await?;
        validate_records(&records, payload.len())?;
        info!("{} ✓ 生成完成", ctx);

        // ========== 步骤 3: 配图 ==========
        if self.options.enrich_images {
            self.enrich(&mut records, ctx).await;
        }

        Ok(records)
    }

    /// 为缺少配图的记录搜索图片
    ///
    /// 任何一条记录的搜索失败都只会让该记录无图，不影响其他记录。
    async fn enrich(&self, records: &mut [GeneratedRecord], ctx: &ChunkCtx) {
        for record in records.iter_mut().filter(|r| r.needs_image()) {
            match self.searcher.search_images(&record.term).await {
                Ok(urls) => {
                    record.set_image_url(urls.into_iter().next());
                    match &record.image_url {
                        Some(url) => debug!("{} 🖼️ {} → {}", ctx, record.term, truncate_text(url, 80)),
                        None => {
                            info!("{} 未找到 '{}' 的配图", ctx, record.term);
                            self.write_warn(ctx, &record.term, "未找到配图");
                        }
                    }
                }
                Err(e) => {
                    warn!("{} ⚠️ '{}' 配图失败，留空: {}", ctx, record.term, e);
                    record.set_image_url(None);
                    self.write_warn(ctx, &record.term, &e.to_string());
                }
            }
        }
    }

    fn write_warn(&self, ctx: &ChunkCtx, term: &str, reason: &str) {
        if let Some(writer) = &self.warn_writer {
            if let Err(e) = writer.write(ctx.chunk_index, term, reason) {
                warn!("{} 写入 warn.txt 失败: {}", ctx, e);
            }
        }
    }
}

/// 校验一个块的生成结果
///
/// 记录数必须与条目数一致（保证结果行与输入条目一一对应），且必填字段非空。
fn validate_records(records: &[GeneratedRecord], expected: usize) -> Result<(), GenerationError> {
    if records.len() != expected {
        return Err(GenerationError::RecordCountMismatch {
            expected,
            actual: records.len(),
        });
    }
    records.iter().try_for_each(GeneratedRecord::validate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, EnrichmentError};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// 按请求内容回显记录的生成器
    struct EchoGenerator {
        drop_last: bool,
        seen: Mutex<Vec<ChunkPayload>>,
    }

    impl EchoGenerator {
        fn new() -> Self {
            Self {
                drop_last: false,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Generator for EchoGenerator {
        async fn generate(&self, payload: &ChunkPayload) -> Result<Vec<GeneratedRecord>, GenerationError> {
            self.seen.lock().unwrap().push(payload.clone());
            let mut records: Vec<_> = payload
                .entries
                .iter()
                .map(|e| GeneratedRecord {
                    term: e.term.clone(),
                    meaning: e.meaning.clone(),
                    example_1: format!("{} 1", e.term),
                    example_1_meaning: "ví dụ 1".to_string(),
                    example_2: format!("{} 2", e.term),
                    example_2_meaning: "ví dụ 2".to_string(),
                    image_url: None,
                })
                .collect();
            if self.drop_last {
                records.pop();
            }
            Ok(records)
        }
    }

    /// "fire" 搜索失败，"ice" 无结果，其余返回固定地址
    struct ScriptedSearcher {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ImageSearcher for ScriptedSearcher {
        async fn search_images(&self, term: &str) -> Result<Vec<String>, EnrichmentError> {
            self.calls.lock().unwrap().push(term.to_string());
            match term {
                "fire" => Err(EnrichmentError::BadResponse {
                    term: term.to_string(),
                    status: 429,
                }),
                "ice" => Ok(Vec::new()),
                _ => Ok(vec![
                    format!("https://img.example/{}.png", term),
                    "https://img.example/second.png".to_string(),
                ]),
            }
        }
    }

    fn searcher() -> ScriptedSearcher {
        ScriptedSearcher {
            calls: Mutex::new(Vec::new()),
        }
    }

    fn items(terms: &[&str]) -> Vec<LearningItem> {
        terms.iter().map(|t| LearningItem::new(*t, "nghĩa")).collect()
    }

    #[tokio::test]
    async fn test_enrichment_failure_only_affects_that_record() {
        let flow = ChunkFlow::new(EchoGenerator::new(), searcher(), FlowOptions::default());
        let chunk = items(&["water", "fire", "ice", "earth"]);

        let records = flow.run(&chunk, &ChunkCtx::new(1, 1, 1, 4)).await.unwrap();

        let urls: Vec<Option<&str>> = records.iter().map(|r| r.image_url.as_deref()).collect();
        assert_eq!(
            urls,
            vec![
                Some("https://img.example/water.png"),
                None,
                None,
                Some("https://img.example/earth.png"),
            ]
        );
        assert!(records.iter().all(|r| r.validate().is_ok()));
    }

    #[tokio::test]
    async fn test_payload_uses_global_numbering() {
        let flow = ChunkFlow::new(EchoGenerator::new(), searcher(), FlowOptions::default());
        let chunk = items(&["water", "fire"]);

        flow.run(&chunk, &ChunkCtx::new(3, 5, 21, 2)).await.unwrap();

        let seen = flow.generator.seen.lock().unwrap();
        let indices: Vec<usize> = seen[0].entries.iter().map(|e| e.index).collect();
        assert_eq!(indices, vec![21, 22]);
    }

    #[tokio::test]
    async fn test_disabled_enrichment_skips_search() {
        let options = FlowOptions {
            card_kind: CardKind::Grammar,
            enrich_images: false,
        };
        let flow = ChunkFlow::new(EchoGenerator::new(), searcher(), options);

        let records = flow
            .run(&items(&["〜ながら"]), &ChunkCtx::new(1, 1, 1, 1))
            .await
            .unwrap();

        assert_eq!(records[0].image_url, None);
        assert!(flow.searcher.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_short_reply_fails_whole_chunk() {
        let generator = EchoGenerator {
            drop_last: true,
            ..EchoGenerator::new()
        };
        let flow = ChunkFlow::new(generator, searcher(), FlowOptions::default());

        let err = flow
            .run(&items(&["water", "fire"]), &ChunkCtx::new(1, 1, 1, 2))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::Generation(GenerationError::RecordCountMismatch {
                expected: 2,
                actual: 1
            })
        ));
        assert!(flow.searcher.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_lookups_are_written_to_warn_file() {
        let dir = tempfile::tempdir().unwrap();
        let warn_path = dir.path().join("warn.txt");
        let flow = ChunkFlow::new(EchoGenerator::new(), searcher(), FlowOptions::default())
            .with_warn_writer(WarnWriter::with_path(&warn_path));

        flow.run(&items(&["water", "fire", "ice"]), &ChunkCtx::new(2, 2, 4, 3))
            .await
            .unwrap();

        let content = std::fs::read_to_string(&warn_path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.contains("块 2 | 词条 fire"));
        assert!(content.contains("词条 ice"));
    }
}
