//! 报表格式化 - 业务能力层
//!
//! 读取透视表，按列配置重新排列、排序，并写出带样式的新表格。
//!
//! ## 表头匹配
//!
//! 1. 表头与列名完全相同，或表头中 `**Parameter:**` 之后的短名与列名相同
//! 2. 否则按各列的 `priority` 顺序做子串匹配（`exact_only` 的列不参与），
//!    输出时仍按列配置顺序排列
//!
//! 同一列被多个表头命中时保留第一个，其余记录警告后忽略。

use anyhow::Result;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook};
use std::cmp::Ordering;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::models::loaders::question_loader::{cell_text, open_first_sheet};
use crate::models::{ColumnAlign, ReportLayout};
use crate::services::spreadsheet_writer::fit_cell;

const HEADER_FILL: u32 = 0x004F9F;
const ALTERNATE_ROW_FILL: u32 = 0xE6E6E6;
const HEADER_ROW_HEIGHT: f64 = 45.0;
const DATA_ROW_HEIGHT: f64 = 25.0;
const PARAMETER_MARKER: &str = "**Parameter:**";

/// 格式化结果
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FormatSummary {
    pub rows: usize,
    /// 每个输出列对应的输入列下标
    pub mapping: Vec<Option<usize>>,
    /// 没有对应任何输出列的表头
    pub unmatched_headers: Vec<String>,
}

/// 从完整的参数描述中取短名
///
/// 形如 `**Parameter:** Country of Study.\n...` 的表头取 `Country of Study`，
/// 其他表头原样返回。
pub fn short_name(full_header: &str) -> &str {
    match full_header.split_once(PARAMETER_MARKER) {
        Some((_, rest)) => rest
            .lines()
            .next()
            .unwrap_or_default()
            .trim()
            .trim_end_matches('.'),
        None => full_header,
    }
}

/// 把输入表头映射到输出列
///
/// 返回值与 `layout.columns` 一一对应，`Some(i)` 表示取输入的第 `i` 列
pub fn map_columns(headers: &[String], layout: &ReportLayout) -> (Vec<Option<usize>>, Vec<String>) {
    let mut mapping: Vec<Option<usize>> = vec![None; layout.columns.len()];
    let mut unmatched = Vec::new();
    let match_order = layout.match_order();

    for (idx, header) in headers.iter().enumerate() {
        let short = short_name(header);

        let exact = layout
            .columns
            .iter()
            .position(|spec| spec.name == *header || spec.name == short);

        let slot = exact.or_else(|| {
            match_order.iter().copied().find(|&slot| {
                let spec = &layout.columns[slot];
                !spec.exact_only && spec.match_terms().iter().any(|term| header.contains(term))
            })
        });

        match slot {
            Some(slot) if mapping[slot].is_none() => {
                debug!("表头 '{}' → {}", short, layout.columns[slot].name);
                mapping[slot] = Some(idx);
            }
            Some(slot) => {
                warn!(
                    "⚠️ 表头 '{}' 与已匹配的列 '{}' 冲突，已忽略",
                    short, layout.columns[slot].name
                );
                unmatched.push(header.clone());
            }
            None => unmatched.push(header.clone()),
        }
    }

    (mapping, unmatched)
}

fn compare_keys(a: Option<&String>, b: Option<&String>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn data_format(align: ColumnAlign, shaded: bool) -> Format {
    let format = Format::new().set_border(FormatBorder::Thin).set_text_wrap();
    let format = match align {
        ColumnAlign::Left => format
            .set_align(FormatAlign::Left)
            .set_align(FormatAlign::VerticalCenter),
        ColumnAlign::Center => format
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter),
        ColumnAlign::LongText => format
            .set_align(FormatAlign::Left)
            .set_align(FormatAlign::Top),
    };
    if shaded {
        format.set_background_color(Color::RGB(ALTERNATE_ROW_FILL))
    } else {
        format
    }
}

/// 格式化透视表
///
/// # 参数
/// - `input`: 透视表路径（第一行为表头）
/// - `output`: 输出路径
/// - `layout`: 列配置
pub fn format_report(input: &Path, output: &Path, layout: &ReportLayout) -> Result<FormatSummary> {
    let range = open_first_sheet(input)?;
    let mut rows = range.rows();

    let headers: Vec<String> = rows
        .next()
        .map(|row| row.iter().map(|c| cell_text(c).unwrap_or_default()).collect())
        .unwrap_or_default();
    info!("原始表头数: {}", headers.len());

    let (mapping, unmatched_headers) = map_columns(&headers, layout);
    info!(
        "✓ 匹配到 {}/{} 列",
        mapping.iter().filter(|m| m.is_some()).count(),
        layout.columns.len()
    );
    for header in &unmatched_headers {
        warn!("⚠️ 未使用的表头: {}", crate::utils::truncate_text(header, 60));
    }

    let mut table: Vec<Vec<Option<String>>> = rows
        .map(|row| {
            mapping
                .iter()
                .map(|m| m.and_then(|idx| row.get(idx)).and_then(cell_text))
                .collect()
        })
        .collect();

    // 按主键列（Document）排序
    if let Some(key) = layout.key_index() {
        table.sort_by(|a, b| {
            compare_keys(
                a.get(key).and_then(Option::as_ref),
                b.get(key).and_then(Option::as_ref),
            )
        });
    }

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    let header_format = Format::new()
        .set_background_color(Color::RGB(HEADER_FILL))
        .set_font_color(Color::White)
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap()
        .set_border(FormatBorder::Thin);

    for (col, spec) in layout.columns.iter().enumerate() {
        let col = col as u16;
        sheet.write_string_with_format(0, col, fit_cell(&spec.name), &header_format)?;
        sheet.set_column_width(col, spec.width)?;
    }
    sheet.set_row_height(0, HEADER_ROW_HEIGHT)?;

    for (row_idx, values) in table.iter().enumerate() {
        let row = row_idx as u32 + 1;
        // 表格行号从 1 开始，第一行数据在第 2 行（偶数行）上色
        let shaded = (row + 1) % 2 == 0;

        for (col, (value, spec)) in values.iter().zip(&layout.columns).enumerate() {
            let format = data_format(spec.align, shaded);
            match value {
                Some(text) => sheet.write_string_with_format(row, col as u16, fit_cell(text), &format)?,
                None => sheet.write_blank(row, col as u16, &format)?,
            };
        }
        sheet.set_row_height(row, DATA_ROW_HEIGHT)?;
    }

    workbook.save(output)?;
    info!("💾 格式化后的表格已写入: {}", output.display());

    Ok(FormatSummary {
        rows: table.len(),
        mapping,
        unmatched_headers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    fn headers(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_short_name() {
        assert_eq!(
            short_name("**Parameter:** Country of Study.\nThe country where..."),
            "Country of Study"
        );
        assert_eq!(short_name("Document"), "Document");
    }

    #[test]
    fn test_substring_match_maps_to_slot() {
        let layout = ReportLayout::default();
        let (mapping, unmatched) = map_columns(
            &headers(&[
                "Document",
                "Extract the Country of Study as listed in the paper",
                "Something unrelated",
            ]),
            &layout,
        );

        let country = layout.names().iter().position(|n| *n == "Country of Study").unwrap();
        assert_eq!(mapping[0], Some(0));
        assert_eq!(mapping[country], Some(1));
        assert_eq!(unmatched, vec!["Something unrelated"]);
    }

    #[test]
    fn test_exact_short_name_beats_substring() {
        let layout = ReportLayout::default();
        // 描述里提到了 Title，但短名是 Summary
        let (mapping, _) = map_columns(
            &headers(&["**Parameter:** Summary.\nSummarise the study; do not repeat the Title"]),
            &layout,
        );
        let summary = layout.names().iter().position(|n| *n == "Summary").unwrap();
        let title = layout.names().iter().position(|n| *n == "Title").unwrap();
        assert_eq!(mapping[summary], Some(0));
        assert_eq!(mapping[title], None);
    }

    #[test]
    fn test_header_naming_two_columns_follows_match_priority() {
        let layout = ReportLayout::default();
        let (mapping, unmatched) = map_columns(
            &headers(&["Summary of the study, including its Title"]),
            &layout,
        );
        let summary = layout.names().iter().position(|n| *n == "Summary").unwrap();
        let title = layout.names().iter().position(|n| *n == "Title").unwrap();
        assert_eq!(mapping[summary], Some(0));
        assert_eq!(mapping[title], None);
        assert!(unmatched.is_empty());
    }

    #[test]
    fn test_document_requires_exact_header() {
        let layout = ReportLayout::default();
        let (mapping, unmatched) = map_columns(&headers(&["Document type"]), &layout);
        assert_eq!(mapping[0], None);
        assert_eq!(unmatched, vec!["Document type"]);
    }

    #[test]
    fn test_second_claimant_is_ignored() {
        let layout = ReportLayout::default();
        let (mapping, unmatched) =
            map_columns(&headers(&["Crops grown", "Crops harvested"]), &layout);
        let crops = layout.names().iter().position(|n| *n == "Crops").unwrap();
        assert_eq!(mapping[crops], Some(0));
        assert_eq!(unmatched, vec!["Crops harvested"]);
    }

    #[test]
    fn test_format_report_reorders_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("pivot.xlsx");
        let output = dir.path().join("formatted.xlsx");

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        let header_row = ["Document", "**Parameter:** Year of Report.\nYYYY", "Country of Study (ISO name)"];
        for (col, header) in header_row.iter().enumerate() {
            sheet.write_string(0, col as u16, *header).unwrap();
        }
        sheet.write_string(1, 0, "b.pdf").unwrap();
        sheet.write_string(1, 1, "2021").unwrap();
        sheet.write_string(2, 0, "a.pdf").unwrap();
        sheet.write_string(2, 2, "Kenya").unwrap();
        workbook.save(&input).unwrap();

        let layout = ReportLayout::default();
        let summary = format_report(&input, &output, &layout).unwrap();
        assert_eq!(summary.rows, 2);
        assert!(summary.unmatched_headers.is_empty());

        let range = open_first_sheet(&output).unwrap();
        let text = |row: u32, col: u32| range.get_value((row, col)).and_then(cell_text);
        let names = layout.names();
        let year = names.iter().position(|n| *n == "Year of Report").unwrap() as u32;
        let country = names.iter().position(|n| *n == "Country of Study").unwrap() as u32;

        assert_eq!(text(0, 0).as_deref(), Some("Document"));
        assert_eq!(text(0, 1).as_deref(), Some("Title"));
        assert_eq!(text(0, 16).as_deref(), Some(names[16]));
        assert_eq!(text(1, 0).as_deref(), Some("a.pdf"));
        assert_eq!(text(1, country).as_deref(), Some("Kenya"));
        assert_eq!(text(2, 0).as_deref(), Some("b.pdf"));
        assert_eq!(text(2, year).as_deref(), Some("2021"));
    }
}
