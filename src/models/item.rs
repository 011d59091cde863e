use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 待学习条目：原词（或语法）与给定释义
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningItem {
    pub term: String,
    pub meaning: String,
}

impl LearningItem {
    pub fn new(term: impl Into<String>, meaning: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            meaning: meaning.into(),
        }
    }
}

/// 卡片类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardKind {
    /// 词汇卡片
    #[default]
    #[serde(alias = "flashcard", alias = "word")]
    Vocabulary,
    /// 语法卡片
    Grammar,
}

impl CardKind {
    /// 词汇默认配图，语法不配图
    pub fn enriches_by_default(self) -> bool {
        matches!(self, CardKind::Vocabulary)
    }

    /// 请求中每一行的格式
    pub fn payload_line(self, index: usize, term: &str, meaning: &str) -> String {
        match self {
            CardKind::Vocabulary => format!("{}. Word: {}, Meaning: {}", index, term, meaning),
            CardKind::Grammar => format!(
                "{}. Grammar: {}, Meaning need to rewrite: {}",
                index, term, meaning
            ),
        }
    }
}

impl FromStr for CardKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vocabulary" | "flashcard" | "word" => Ok(CardKind::Vocabulary),
            "grammar" => Ok(CardKind::Grammar),
            other => Err(format!("未知的卡片类型: {}", other)),
        }
    }
}

impl fmt::Display for CardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardKind::Vocabulary => write!(f, "vocabulary"),
            CardKind::Grammar => write!(f, "grammar"),
        }
    }
}
