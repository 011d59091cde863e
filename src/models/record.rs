use crate::error::GenerationError;
use serde::{Deserialize, Serialize};

/// 输出表格的列名（顺序即列顺序）
pub const COLUMNS: [&str; 7] = [
    "term",
    "meaning",
    "example_1",
    "example_1_meaning",
    "example_2",
    "example_2_meaning",
    "image_url",
];

/// LLM 生成的一张卡片，同时也是结果表中的一行
///
/// 反序列化时接受旧版字段名（`word` / `grammar` / `example_sentences_1` ...），
/// 序列化时只使用 [`COLUMNS`] 中的列名。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedRecord {
    #[serde(alias = "word", alias = "grammar")]
    pub term: String,
    pub meaning: String,
    #[serde(alias = "example_sentences_1")]
    pub example_1: String,
    #[serde(alias = "meaning_example_sentences_1")]
    pub example_1_meaning: String,
    #[serde(alias = "example_sentences_2")]
    pub example_2: String,
    #[serde(alias = "meaning_example_sentences_2")]
    pub example_2_meaning: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl GeneratedRecord {
    /// 检查除 image_url 外的字段都非空
    pub fn validate(&self) -> Result<(), GenerationError> {
        let fields = [
            ("term", &self.term),
            ("meaning", &self.meaning),
            ("example_1", &self.example_1),
            ("example_1_meaning", &self.example_1_meaning),
            ("example_2", &self.example_2),
            ("example_2_meaning", &self.example_2_meaning),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(GenerationError::MissingField {
                    term: self.term.clone(),
                    field,
                });
            }
        }
        Ok(())
    }

    pub fn needs_image(&self) -> bool {
        self.image_url.as_deref().map_or(true, |url| url.trim().is_empty())
    }

    /// 设置配图地址，空字符串视为无图
    pub fn set_image_url(&mut self, url: Option<String>) {
        self.image_url = url.filter(|u| !u.trim().is_empty());
    }

    /// 按 [`COLUMNS`] 顺序给出各列文本，无图为空字符串
    pub fn cells(&self) -> [&str; 7] {
        [
            &self.term,
            &self.meaning,
            &self.example_1,
            &self.example_1_meaning,
            &self.example_2,
            &self.example_2_meaning,
            self.image_url.as_deref().unwrap_or(""),
        ]
    }
}

/// LLM 返回的记录列表
///
/// 兼容 `{"records": [...]}`、`{"flashcards": [...]}`、`{"grammars": [...]}` 以及裸数组。
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum GenerationReply {
    Wrapped {
        #[serde(alias = "flashcards", alias = "grammars")]
        records: Vec<GeneratedRecord>,
    },
    Bare(Vec<GeneratedRecord>),
}

impl GenerationReply {
    pub fn into_records(self) -> Vec<GeneratedRecord> {
        match self {
            GenerationReply::Wrapped { records } | GenerationReply::Bare(records) => records,
        }
    }
}
