//! 表格输出 - 业务能力层
//!
//! 把扁平答案、透视矩阵、合并回复写成 xlsx

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::path::Path;
use tracing::{info, warn};

use crate::models::{AnswerRecord, BulkAnswer, ResultMatrix};

/// 透视表主键列名
pub const DOCUMENT_HEADER: &str = "Document";

/// Excel 单元格最多容纳的字符数
pub const MAX_CELL_CHARS: usize = 32_767;

/// 超出单元格上限的文本截断后再写入，避免整个表格写入失败
pub fn fit_cell(text: &str) -> &str {
    match text.char_indices().nth(MAX_CELL_CHARS) {
        Some((cut, _)) => {
            warn!(
                "⚠️ 单元格文本超过 {} 个字符，已截断: {}",
                MAX_CELL_CHARS,
                crate::utils::truncate_text(text, 40)
            );
            &text[..cut]
        }
        None => text,
    }
}

fn write_header(sheet: &mut Worksheet, headers: &[&str]) -> Result<(), XlsxError> {
    let bold = Format::new().set_bold();
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, fit_cell(header), &bold)?;
    }
    Ok(())
}

fn save(workbook: &mut Workbook, path: &Path) -> Result<()> {
    workbook
        .save(path)
        .with_context(|| format!("无法写入表格文件: {}", path.display()))?;
    info!("💾 已写入: {}", path.display());
    Ok(())
}

/// 写出扁平答案（Document / Question / Answer）
pub fn write_flat(path: &Path, records: &[AnswerRecord]) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    write_header(sheet, &[DOCUMENT_HEADER, "Question", "Answer"])?;
    for (idx, record) in records.iter().enumerate() {
        let row = idx as u32 + 1;
        sheet.write_string(row, 0, fit_cell(&record.document))?;
        sheet.write_string(row, 1, fit_cell(&record.question))?;
        sheet.write_string(row, 2, fit_cell(&record.answer))?;
    }

    save(&mut workbook, path)
}

/// 写出透视矩阵，第一列为文档名，其余每列一个问题，空单元格不写
pub fn write_pivot(path: &Path, matrix: &ResultMatrix) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    let mut headers = vec![DOCUMENT_HEADER];
    headers.extend(matrix.questions().iter().map(String::as_str));
    write_header(sheet, &headers)?;

    for (row_idx, document) in matrix.documents().iter().enumerate() {
        let row = row_idx as u32 + 1;
        sheet.write_string(row, 0, fit_cell(document))?;
        for col_idx in 0..matrix.column_count() {
            if let Some(value) = matrix.cell_at(row_idx, col_idx) {
                sheet.write_string(row, col_idx as u16 + 1, fit_cell(value))?;
            }
        }
    }

    save(&mut workbook, path)
}

/// 写出合并提问的原始回复（Document / Answers）
pub fn write_bulk(path: &Path, answers: &[BulkAnswer]) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    write_header(sheet, &[DOCUMENT_HEADER, "Answers"])?;
    for (idx, answer) in answers.iter().enumerate() {
        let row = idx as u32 + 1;
        sheet.write_string(row, 0, fit_cell(&answer.document))?;
        sheet.write_string(row, 1, fit_cell(&answer.answers))?;
    }

    save(&mut workbook, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::loaders::question_loader::{cell_text, open_first_sheet};
    use crate::models::DuplicatePolicy;

    #[test]
    fn test_pivot_round_trip_keeps_empty_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pivot.xlsx");

        let records = vec![
            AnswerRecord::new("a.pdf", "Q1", "5 tons"),
            AnswerRecord::new("b.pdf", "Q2", "Maize"),
        ];
        let matrix = ResultMatrix::pivot(
            &records,
            &["a.pdf".to_string(), "b.pdf".to_string()],
            &["Q1".to_string(), "Q2".to_string()],
            DuplicatePolicy::Reject,
        )
        .unwrap();
        write_pivot(&path, &matrix).unwrap();

        let range = open_first_sheet(&path).unwrap();
        let text = |row: u32, col: u32| range.get_value((row, col)).and_then(cell_text);
        assert_eq!(text(0, 0).as_deref(), Some("Document"));
        assert_eq!(text(0, 2).as_deref(), Some("Q2"));
        assert_eq!(text(1, 0).as_deref(), Some("a.pdf"));
        assert_eq!(text(1, 1).as_deref(), Some("5 tons"));
        assert_eq!(text(1, 2), None);
        assert_eq!(text(2, 2).as_deref(), Some("Maize"));
    }

    #[test]
    fn test_flat_output_has_one_row_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flat.xlsx");
        let records = vec![
            AnswerRecord::new("a.pdf", "Q1", "1"),
            AnswerRecord::new("a.pdf", "Q2", "2"),
        ];
        write_flat(&path, &records).unwrap();

        let range = open_first_sheet(&path).unwrap();
        assert_eq!(range.height(), 3);
        assert_eq!(range.width(), 3);
    }

    #[test]
    fn test_fit_cell_only_cuts_oversized_text() {
        assert_eq!(fit_cell("short"), "short");

        let exact = "é".repeat(MAX_CELL_CHARS);
        assert_eq!(fit_cell(&exact).chars().count(), MAX_CELL_CHARS);

        let long = "é".repeat(MAX_CELL_CHARS + 10);
        assert_eq!(fit_cell(&long).chars().count(), MAX_CELL_CHARS);
    }

    #[test]
    fn test_oversized_bulk_reply_is_truncated_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bulk.xlsx");
        let answers = vec![
            BulkAnswer {
                document: "a.pdf".to_string(),
                answers: "ok".to_string(),
            },
            BulkAnswer {
                document: "b.pdf".to_string(),
                answers: "x".repeat(40_000),
            },
        ];
        write_bulk(&path, &answers).unwrap();

        let range = open_first_sheet(&path).unwrap();
        let text = |row: u32, col: u32| range.get_value((row, col)).and_then(cell_text);
        assert_eq!(text(1, 1).as_deref(), Some("ok"));
        assert_eq!(text(2, 1).map(|t| t.len()), Some(MAX_CELL_CHARS));
    }
}
