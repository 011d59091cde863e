use crate::models::GeneratedRecord;

/// 结果表：按输入顺序排列、只追加的记录集合
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTable {
    rows: Vec<GeneratedRecord>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<GeneratedRecord>) -> Self {
        Self { rows }
    }

    /// 在表尾追加一个块的记录
    pub fn append(&mut self, records: impl IntoIterator<Item = GeneratedRecord>) {
        self.rows.extend(records);
    }

    pub fn rows(&self) -> &[GeneratedRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GeneratedRecord> {
        self.rows.iter()
    }

    /// 没有配图的行数
    pub fn missing_images(&self) -> usize {
        self.rows.iter().filter(|r| r.image_url.is_none()).count()
    }
}

impl<'a> IntoIterator for &'a ResultTable {
    type Item = &'a GeneratedRecord;
    type IntoIter = std::slice::Iter<'a, GeneratedRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
