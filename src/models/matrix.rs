//! 结果矩阵
//!
//! 把扁平的 (文档, 问题, 答案) 列表透视成 文档 × 问题 的表。
//! 行按文档名排序，列按问题集合的顺序；失败的组合留空单元格而不是缺行缺列。

use std::collections::HashMap;

use crate::error::AppError;
use crate::models::AnswerRecord;

/// 重复 (文档, 问题) 的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// 直接报错
    #[default]
    Reject,
    /// 后写入的覆盖先写入的
    LastWriteWins,
}

impl DuplicatePolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "reject" => Some(DuplicatePolicy::Reject),
            "last-write-wins" | "last" => Some(DuplicatePolicy::LastWriteWins),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResultMatrix {
    documents: Vec<String>,
    questions: Vec<String>,
    cells: HashMap<(usize, usize), String>,
}

impl ResultMatrix {
    /// 透视
    ///
    /// # 参数
    /// - `records`: 扁平答案
    /// - `documents`: 本次处理过的全部文档（即使没有任何答案也占一行）
    /// - `questions`: 全部问题原文（即使没有任何答案也占一列）
    /// - `policy`: 重复组合的处理方式
    pub fn pivot(
        records: &[AnswerRecord],
        documents: &[String],
        questions: &[String],
        policy: DuplicatePolicy,
    ) -> Result<Self, AppError> {
        let mut matrix = Self::default();
        let mut doc_index: HashMap<String, usize> = HashMap::new();
        let mut question_index: HashMap<String, usize> = HashMap::new();

        for question in questions {
            matrix.column_index(&mut question_index, question);
        }

        let mut doc_names: Vec<&String> = documents
            .iter()
            .chain(records.iter().map(|r| &r.document))
            .collect();
        doc_names.sort();
        doc_names.dedup();
        for name in doc_names {
            doc_index.insert(name.clone(), matrix.documents.len());
            matrix.documents.push(name.clone());
        }

        for record in records {
            let row = doc_index[&record.document];
            let col = matrix.column_index(&mut question_index, &record.question);

            let previous = matrix.cells.insert((row, col), record.answer.clone());
            if previous.is_some() && policy == DuplicatePolicy::Reject {
                return Err(AppError::PivotCollision {
                    document: record.document.clone(),
                    question: record.question.clone(),
                });
            }
        }

        Ok(matrix)
    }

    fn column_index(&mut self, index: &mut HashMap<String, usize>, question: &str) -> usize {
        if let Some(&col) = index.get(question) {
            return col;
        }
        let col = self.questions.len();
        index.insert(question.to_string(), col);
        self.questions.push(question.to_string());
        col
    }

    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub fn row_count(&self) -> usize {
        self.documents.len()
    }

    pub fn column_count(&self) -> usize {
        self.questions.len()
    }

    /// 按行列下标取单元格，空单元格返回 `None`
    pub fn cell_at(&self, row: usize, col: usize) -> Option<&str> {
        self.cells.get(&(row, col)).map(String::as_str)
    }

    pub fn cell(&self, document: &str, question: &str) -> Option<&str> {
        let row = self.documents.iter().position(|d| d == document)?;
        let col = self.questions.iter().position(|q| q == question)?;
        self.cell_at(row, col)
    }
}
