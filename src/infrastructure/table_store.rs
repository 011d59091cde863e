//! 结果表存储 - 基础设施层
//!
//! 唯一负责读写输出文件的组件。输出文件本身就是断点：
//! 每次保存都先写入同目录下的临时文件，再重命名覆盖目标文件，
//! 因此目标文件要么是旧的完整内容，要么是新的完整内容。

use crate::error::{AppResult, PersistenceError};
use crate::infrastructure::workbook;
use crate::models::{GeneratedRecord, ResultTable, COLUMNS};
use std::fs;
use std::io::Write;
use std::iter;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 表格文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// 逗号分隔
    Csv,
    /// 制表符分隔
    Tsv,
    /// Excel 工作簿（第一个工作表）
    Xlsx,
}

impl TableFormat {
    /// 根据扩展名选择格式：`.xlsx` 为工作簿，`.tsv` / `.txt` 为制表符，其余为逗号
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_ascii_lowercase())
            .as_deref()
        {
            Some("xlsx") => TableFormat::Xlsx,
            Some("tsv") | Some("txt") => TableFormat::Tsv,
            _ => TableFormat::Csv,
        }
    }

    /// 分隔符，工作簿没有分隔符
    pub fn delimiter(self) -> Option<u8> {
        match self {
            TableFormat::Csv => Some(b','),
            TableFormat::Tsv => Some(b'\t'),
            TableFormat::Xlsx => None,
        }
    }
}

/// 结果表存储
///
/// 职责：
/// - 持有输出文件路径
/// - 加载 / 原子保存 ResultTable
/// - 不认识块、不调用任何外部服务
#[derive(Debug, Clone)]
pub struct TableStore {
    path: PathBuf,
    format: TableFormat,
}

impl TableStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = TableFormat::from_path(&path);
        Self { path, format }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn display_path(&self) -> String {
        self.path.display().to_string()
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// 加载结果表，文件不存在或为空时返回空表
    pub fn load(&self) -> AppResult<ResultTable> {
        if !self.path.exists() {
            debug!("结果表不存在，从空表开始: {}", self.display_path());
            return Ok(ResultTable::new());
        }

        let bytes = fs::read(&self.path)
            .map_err(|e| PersistenceError::read_failed(self.display_path(), e))?;
        if bytes.is_empty() {
            return Ok(ResultTable::new());
        }

        let table = match self.format.delimiter() {
            Some(delimiter) => self.decode_delimited(&bytes, delimiter)?,
            None => self.decode_workbook(&bytes)?,
        };
        debug!("已加载 {} 行: {}", table.len(), self.display_path());
        Ok(table)
    }

    /// 保存完整结果表（覆盖）
    pub fn save(&self, table: &ResultTable) -> AppResult<()> {
        let bytes = match self.format.delimiter() {
            Some(delimiter) => self.encode_delimited(table, delimiter)?,
            None => self.encode_workbook(table)?,
        };
        let tmp_path = self.tmp_path();

        let write_tmp = || -> std::io::Result<()> {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(&bytes)?;
            file.sync_all()
        };

        if let Err(e) = write_tmp().and_then(|_| fs::rename(&tmp_path, &self.path)) {
            let _ = fs::remove_file(&tmp_path);
            return Err(PersistenceError::write_failed(self.display_path(), e).into());
        }

        debug!("已保存 {} 行: {}", table.len(), self.display_path());
        Ok(())
    }

    fn check_header(&self, found: &[&str]) -> AppResult<()> {
        if found != COLUMNS.as_slice() {
            return Err(PersistenceError::SchemaMismatch {
                path: self.display_path(),
                found: found.iter().map(|s| s.to_string()).collect(),
            }
            .into());
        }
        Ok(())
    }

    fn encode_delimited(&self, table: &ResultTable, delimiter: u8) -> AppResult<Vec<u8>> {
        let write_failed = |e: csv::Error| PersistenceError::write_failed(self.display_path(), e);

        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .from_writer(Vec::new());

        writer.write_record(COLUMNS).map_err(write_failed)?;
        for row in table {
            writer.serialize(row).map_err(write_failed)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| PersistenceError::write_failed(self.display_path(), e.into_error()))?;
        Ok(bytes)
    }

    fn decode_delimited(&self, bytes: &[u8], delimiter: u8) -> AppResult<ResultTable> {
        let read_failed = |e: csv::Error| PersistenceError::read_failed(self.display_path(), e);

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .from_reader(bytes);

        let headers = reader.headers().map_err(read_failed)?.clone();
        self.check_header(&headers.iter().collect::<Vec<_>>())?;

        let rows = reader
            .deserialize::<GeneratedRecord>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(read_failed)?;
        Ok(ResultTable::from_rows(rows))
    }

    fn encode_workbook(&self, table: &ResultTable) -> AppResult<Vec<u8>> {
        let rows = iter::once(COLUMNS).chain(table.iter().map(GeneratedRecord::cells));
        let bytes = workbook::write_rows(rows)
            .map_err(|e| PersistenceError::write_failed(self.display_path(), e))?;
        Ok(bytes)
    }

    /// 工作簿中的空单元格按空字段处理，因此无图的行仍然读回 `None`
    fn decode_workbook(&self, bytes: &[u8]) -> AppResult<ResultTable> {
        let read_failed = |e: csv::Error| PersistenceError::read_failed(self.display_path(), e);

        let mut rows = workbook::read_rows(bytes)
            .map_err(|e| PersistenceError::read_failed(self.display_path(), e))?
            .into_iter();

        let Some(header) = rows.next() else {
            return Ok(ResultTable::new());
        };
        self.check_header(&header.iter().map(String::as_str).collect::<Vec<_>>())?;

        let headers = csv::StringRecord::from(COLUMNS.to_vec());
        let records = rows
            .map(|row| csv::StringRecord::from(row).deserialize::<GeneratedRecord>(Some(&headers)))
            .collect::<Result<Vec<_>, _>>()
            .map_err(read_failed)?;
        Ok(ResultTable::from_rows(records))
    }
}
