use crate::models::{CardKind, LearningItem};
use serde::Serialize;

/// 请求中的单个条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayloadEntry {
    /// 在整个输入列表中的序号（从 1 开始）
    pub index: usize,
    pub term: String,
    pub meaning: String,
}

/// 一个块的生成请求
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkPayload {
    pub kind: CardKind,
    pub entries: Vec<PayloadEntry>,
}

impl ChunkPayload {
    /// 根据块内条目构建请求，`first_index` 为第一个条目的全局序号
    pub fn build(kind: CardKind, items: &[LearningItem], first_index: usize) -> Self {
        let entries = items
            .iter()
            .enumerate()
            .map(|(offset, item)| PayloadEntry {
                index: first_index + offset,
                term: item.term.clone(),
                meaning: item.meaning.clone(),
            })
            .collect();
        Self { kind, entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 渲染为发送给 LLM 的文本，每个条目一行
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|e| self.kind.payload_line(e.index, &e.term, &e.meaning) + "\n")
            .collect()
    }
}
