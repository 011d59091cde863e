//! 单工作表 xlsx 读写
//!
//! 只处理第一个工作表，所有单元格按文本读写。空字符串不写入单元格，
//! 读取时空单元格还原为空字符串。

use calamine::{Data, Reader, Xlsx};
use rust_xlsxwriter::{DocProperties, ExcelDateTime, Workbook};
use std::io::{self, Cursor};

/// 工作簿的创建时间固定，内容相同的表格每次保存得到相同的字节
const CREATED_YMD: (u16, u8, u8) = (2024, 1, 1);

/// 把若干行文本写成 xlsx 字节
pub fn write_rows<R, C, S>(rows: R) -> io::Result<Vec<u8>>
where
    R: IntoIterator<Item = C>,
    C: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let (year, month, day) = CREATED_YMD;
    let created = ExcelDateTime::from_ymd(year, month, day).map_err(invalid_data)?;

    let mut workbook = Workbook::new();
    workbook.set_properties(&DocProperties::new().set_creation_datetime(&created));

    let worksheet = workbook.add_worksheet();
    for (row_idx, row) in rows.into_iter().enumerate() {
        let row_num = u32::try_from(row_idx).map_err(invalid_data)?;
        for (col_idx, cell) in row.into_iter().enumerate() {
            let cell = cell.as_ref();
            if cell.is_empty() {
                continue;
            }
            let col_num = u16::try_from(col_idx).map_err(invalid_data)?;
            worksheet
                .write_string(row_num, col_num, cell)
                .map_err(invalid_data)?;
        }
    }

    workbook.save_to_buffer().map_err(invalid_data)
}

/// 读取第一个工作表的全部行；没有工作表时返回空
pub fn read_rows(bytes: &[u8]) -> io::Result<Vec<Vec<String>>> {
    let mut workbook = Xlsx::new(Cursor::new(bytes)).map_err(invalid_data)?;

    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range.map_err(invalid_data)?,
        None => return Ok(Vec::new()),
    };

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect())
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn invalid_data(e: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_keep_blank_cells_in_place() {
        let bytes = write_rows([
            vec!["term", "meaning", "image_url"],
            vec!["水", "nước", ""],
            vec!["火", "", "https://img.example/fire.png"],
        ])
        .unwrap();

        assert!(bytes.starts_with(b"PK"));
        assert_eq!(
            read_rows(&bytes).unwrap(),
            vec![
                vec!["term", "meaning", "image_url"],
                vec!["水", "nước", ""],
                vec!["火", "", "https://img.example/fire.png"],
            ]
        );
    }

    #[test]
    fn test_same_rows_give_same_bytes() {
        let rows = [vec!["a", "b"], vec!["c", "d"]];
        assert_eq!(write_rows(rows.clone()).unwrap(), write_rows(rows).unwrap());
    }

    #[test]
    fn test_plain_text_is_not_a_workbook() {
        let err = read_rows(b"term,meaning\n").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
