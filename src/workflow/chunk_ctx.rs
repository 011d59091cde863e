//! 块处理上下文
//!
//! 封装"我正在处理第几块、块里第一条是第几个条目"这一信息

use std::fmt::Display;

/// 块处理上下文
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkCtx {
    /// 块编号（从1开始）
    pub chunk_index: usize,

    /// 块总数（仅用于日志显示）
    pub total_chunks: usize,

    /// 块内第一个条目在输入列表中的序号（从1开始）
    pub first_item: usize,

    /// 块内条目数
    pub len: usize,
}

impl ChunkCtx {
    /// 创建新的块上下文
    pub fn new(chunk_index: usize, total_chunks: usize, first_item: usize, len: usize) -> Self {
        Self {
            chunk_index,
            total_chunks,
            first_item,
            len,
        }
    }

    /// 块内最后一个条目的序号
    pub fn last_item(&self) -> usize {
        self.first_item + self.len.saturating_sub(1)
    }
}

impl Display for ChunkCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[块 {}/{}]", self.chunk_index, self.total_chunks)
    }
}
