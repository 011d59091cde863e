use crate::infrastructure::{workbook, TableFormat};
use crate::models::LearningItem;
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;
use tracing::{info, warn};

/// 从输入文件加载学习条目
///
/// `.xlsx` 读取第一个工作表，`.tsv` / `.txt` 按制表符分隔，其余按逗号分隔。
/// 每行取前两个非空字段作为 (term, meaning)，不足两个字段的行会被跳过。
pub async fn load_items(input_path: impl AsRef<Path>, has_header: bool) -> Result<Vec<LearningItem>> {
    let input_path = input_path.as_ref();
    let content = fs::read(input_path)
        .await
        .with_context(|| format!("无法读取输入文件: {}", input_path.display()))?;

    let format = TableFormat::from_path(input_path);
    let items = parse_items(&content, format, has_header)
        .with_context(|| format!("无法解析输入文件: {}", input_path.display()))?;

    info!(
        "从 {} 加载了 {} 个条目",
        input_path.file_name().unwrap_or_default().to_string_lossy(),
        items.len()
    );
    Ok(items)
}

/// 解析输入内容
pub fn parse_items(content: &[u8], format: TableFormat, has_header: bool) -> Result<Vec<LearningItem>> {
    let rows = match format.delimiter() {
        Some(delimiter) => read_delimited(content, delimiter)?,
        None => workbook::read_rows(content).context("无法读取工作簿")?,
    };

    let mut items = Vec::new();
    for (row_idx, row) in rows.iter().enumerate().skip(usize::from(has_header)) {
        let fields: Vec<&str> = row.iter().map(|f| f.trim()).filter(|f| !f.is_empty()).collect();
        if fields.is_empty() {
            continue;
        }
        if fields.len() < 2 {
            warn!("跳过第 {} 行：缺少释义 ({:?})", row_idx + 1, fields);
            continue;
        }

        let meaning = fields[1].trim_matches(|c| c == '"' || c == '“' || c == '”').trim();
        items.push(LearningItem::new(fields[0], meaning));
    }

    Ok(items)
}

fn read_delimited(content: &[u8], delimiter: u8) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content);

    reader
        .records()
        .enumerate()
        .map(|(row_idx, record)| -> Result<Vec<String>> {
            let record = record.with_context(|| format!("第 {} 行格式错误", row_idx + 1))?;
            Ok(record.iter().map(str::to_string).collect())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_comma_separated_without_header() {
        let content = "water,nước\nfire,lửa\n";
        let items = parse_items(content.as_bytes(), TableFormat::Csv, false).unwrap();
        assert_eq!(
            items,
            vec![
                LearningItem::new("water", "nước"),
                LearningItem::new("fire", "lửa"),
            ]
        );
    }

    #[test]
    fn test_parse_skips_header_blank_and_short_rows() {
        let content = "Kanji,Meaning\n見ます,xem\n\n探します\n\"食べます\",\"ăn, dùng bữa\"\n";
        let items = parse_items(content.as_bytes(), TableFormat::Csv, true).unwrap();
        assert_eq!(
            items,
            vec![
                LearningItem::new("見ます", "xem"),
                LearningItem::new("食べます", "ăn, dùng bữa"),
            ]
        );
    }

    #[test]
    fn test_parse_tab_separated_with_empty_fields() {
        let content = "見ます\t\t“xem, nhìn”\n話します\tnói\n";
        let items = parse_items(content.as_bytes(), TableFormat::Tsv, false).unwrap();
        assert_eq!(items[0], LearningItem::new("見ます", "xem, nhìn"));
        assert_eq!(items[1], LearningItem::new("話します", "nói"));
    }

    #[tokio::test]
    async fn test_load_xlsx_first_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.xlsx");
        let bytes = workbook::write_rows([["単語", "意味"], ["見ます", "xem"], ["話します", "“nói”"]]).unwrap();
        std::fs::write(&path, bytes).unwrap();

        let items = load_items(&path, true).await.unwrap();
        assert_eq!(
            items,
            vec![
                LearningItem::new("見ます", "xem"),
                LearningItem::new("話します", "nói"),
            ]
        );
    }

    #[tokio::test]
    async fn test_load_missing_file_reports_path() {
        let err = load_items("does/not/exist.csv", false).await.unwrap_err();
        assert!(err.to_string().contains("does/not/exist.csv"));
    }
}
