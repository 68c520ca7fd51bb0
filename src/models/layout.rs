//! 报表列配置
//!
//! 一列对应一个语义槽位：显示名、所属分组、宽度、对齐方式，
//! 以及在表头原文中查找的子串（缺省为显示名本身）。

use serde::{Deserialize, Serialize};

/// 单元格对齐方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnAlign {
    /// 左对齐，垂直居中，自动换行
    Left,
    /// 水平垂直居中，自动换行
    Center,
    /// 长文本：左对齐，顶端对齐，自动换行
    LongText,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub section: String,
    pub width: f64,
    pub align: ColumnAlign,
    /// 表头模糊匹配用的子串，为空时使用 `name`
    #[serde(default)]
    pub aliases: Vec<String>,
    /// 只接受表头完全相同
    #[serde(default)]
    pub exact_only: bool,
    /// 子串匹配的先后（越小越先），缺省排在所有指定了优先级的列之后
    #[serde(default)]
    pub priority: Option<u32>,
}

impl ColumnSpec {
    fn new(name: &str, section: &str, width: f64, align: ColumnAlign) -> Self {
        Self {
            name: name.to_string(),
            section: section.to_string(),
            width,
            align,
            aliases: Vec::new(),
            exact_only: false,
            priority: None,
        }
    }

    /// 模糊匹配时使用的子串
    pub fn match_terms(&self) -> Vec<&str> {
        if self.aliases.is_empty() {
            vec![self.name.as_str()]
        } else {
            self.aliases.iter().map(String::as_str).collect()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportLayout {
    pub columns: Vec<ColumnSpec>,
}

impl Default for ReportLayout {
    fn default() -> Self {
        use ColumnAlign::*;

        const BASIC: &str = "Basic Information";
        const STUDY: &str = "Study Details";
        const GEO: &str = "Geographic & Institutional Info";
        const SUBJECT: &str = "Subject Matter";
        const IMPACT: &str = "Impact Information";

        let mut document = ColumnSpec::new("Document", BASIC, 12.0, Left);
        document.exact_only = true;

        let mut layout = Self {
            columns: vec![
                document,
                ColumnSpec::new("Title", BASIC, 50.0, LongText),
                ColumnSpec::new("Year of Report", BASIC, 15.0, Center),
                ColumnSpec::new("Summary", BASIC, 50.0, LongText),
                ColumnSpec::new("Study Theme", STUDY, 50.0, LongText),
                ColumnSpec::new("Category of Study", STUDY, 30.0, Left),
                ColumnSpec::new("Period Analyzed", STUDY, 30.0, Left),
                ColumnSpec::new("Link or DOI", STUDY, 40.0, Left),
                ColumnSpec::new("Country of Study", GEO, 30.0, Left),
                ColumnSpec::new("CGIAR Region", GEO, 30.0, Left),
                ColumnSpec::new("Contributing Initiatives or centers", GEO, 30.0, Left),
                ColumnSpec::new("Primary Product Type", SUBJECT, 30.0, Left),
                ColumnSpec::new("Crops", SUBJECT, 30.0, Left),
                ColumnSpec::new("Category for Natural Resource Management", SUBJECT, 30.0, Left),
                ColumnSpec::new("Keywords", SUBJECT, 30.0, Left),
                ColumnSpec::new("Primary and Secondary CGIAR Impact Area(s)", IMPACT, 30.0, Left),
                ColumnSpec::new(
                    "Name; Unit/Metric; and Value for Reported Indicator of Impact",
                    IMPACT,
                    30.0,
                    Left,
                ),
            ],
        };

        // 表头同时包含多个列名时，按这个顺序决定归属
        const MATCH_ORDER: [&str; 16] = [
            "CGIAR Region",
            "Category for Natural Resource Management",
            "Category of Study",
            "Contributing Initiatives or centers",
            "Country of Study",
            "Crops",
            "Keywords",
            "Link or DOI",
            "Name; Unit/Metric; and Value for Reported Indicator of Impact",
            "Period Analyzed",
            "Primary Product Type",
            "Primary and Secondary CGIAR Impact Area(s)",
            "Study Theme",
            "Summary",
            "Title",
            "Year of Report",
        ];
        for column in &mut layout.columns {
            column.priority = MATCH_ORDER
                .iter()
                .position(|name| *name == column.name)
                .map(|p| p as u32);
        }

        layout
    }
}

impl ReportLayout {
    /// 排序主键列的下标：第一个 `exact_only` 列，没有时取第一列
    pub fn key_index(&self) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.exact_only)
            .or_else(|| (!self.columns.is_empty()).then_some(0))
    }

    /// 子串匹配时尝试各列的顺序（输出顺序不受影响）
    pub fn match_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.columns.len()).collect();
        order.sort_by_key(|&idx| (self.columns[idx].priority.unwrap_or(u32::MAX), idx));
        order
    }

    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_shape() {
        let layout = ReportLayout::default();
        assert_eq!(layout.columns.len(), 17);
        assert_eq!(layout.key_index(), Some(0));
        assert_eq!(layout.columns[0].name, "Document");

        let sections: Vec<&str> = layout.columns.iter().map(|c| c.section.as_str()).collect();
        let mut distinct = sections.clone();
        distinct.dedup();
        assert_eq!(distinct.len(), 5);
    }

    #[test]
    fn test_match_order_puts_summary_before_title() {
        let layout = ReportLayout::default();
        let order: Vec<&str> = layout
            .match_order()
            .into_iter()
            .map(|idx| layout.columns[idx].name.as_str())
            .collect();

        assert_eq!(order[0], "CGIAR Region");
        assert_eq!(order[15], "Year of Report");
        // Document 不参与优先级，排在最后
        assert_eq!(order[16], "Document");
        let summary = order.iter().position(|n| *n == "Summary").unwrap();
        let title = order.iter().position(|n| *n == "Title").unwrap();
        assert!(summary < title);
    }

    #[test]
    fn test_key_index_without_exact_column() {
        let layout = ReportLayout {
            columns: vec![
                ColumnSpec::new("Name", "Basic", 20.0, ColumnAlign::Left),
                ColumnSpec::new("Crops", "Subject", 30.0, ColumnAlign::Left),
            ],
        };
        assert_eq!(layout.key_index(), Some(0));
        assert_eq!(ReportLayout { columns: Vec::new() }.key_index(), None);
    }

    #[test]
    fn test_match_terms_fall_back_to_name() {
        let mut spec = ColumnSpec::new("Crops", "Subject Matter", 30.0, ColumnAlign::Left);
        assert_eq!(spec.match_terms(), vec!["Crops"]);
        spec.aliases = vec!["Crop".to_string(), "Commodity".to_string()];
        assert_eq!(spec.match_terms(), vec!["Crop", "Commodity"]);
    }
}
