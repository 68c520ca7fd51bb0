use crate::error::AppError;
use crate::models::QuestionSet;
use anyhow::{Context, Result};
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use std::path::Path;

/// 打开表格的第一个工作表
pub(crate) fn open_first_sheet(path: &Path) -> Result<Range<Data>> {
    let mut workbook: Xlsx<_> = open_workbook(path)
        .with_context(|| format!("无法打开表格文件: {}", path.display()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::NoWorksheet {
            path: path.display().to_string(),
        })?
        .with_context(|| format!("无法读取工作表: {}", path.display()))?;

    Ok(range)
}

/// 单元格转文本，空单元格返回 `None`
pub(crate) fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// 读取问题行
///
/// 取第 `row` 行（从 0 开始，绝对行号）的前 `max_questions` 个单元格，
/// 丢弃其中的空单元格，剩余的原文依次作为问题。
pub fn read_question_row(path: &Path, row: u32, max_questions: usize) -> Result<Vec<String>> {
    let range = open_first_sheet(path)?;

    let questions: Vec<String> = (0..max_questions as u32)
        .filter_map(|col| range.get_value((row, col)).and_then(cell_text))
        .collect();

    Ok(questions)
}

/// 从表格加载问题集合（带固定前缀）
pub fn load_question_set(path: &Path, row: u32, max_questions: usize) -> Result<QuestionSet> {
    let originals = read_question_row(path, row, max_questions)?;

    if originals.is_empty() {
        return Err(AppError::EmptyQuestionRow {
            path: path.display().to_string(),
            row,
        }
        .into());
    }

    tracing::info!("成功加载 {} 个问题", originals.len());
    Ok(QuestionSet::new(originals))
}
