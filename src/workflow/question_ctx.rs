//! 文档处理上下文
//!
//! 封装"我正在处理第几个文档、叫什么"这一信息

use std::fmt::Display;

/// 文档处理上下文
#[derive(Debug, Clone)]
pub struct DocumentCtx {
    /// 文档文件名
    pub document: String,

    /// 文档序号（从1开始，仅用于日志显示）
    pub doc_index: usize,
}

impl DocumentCtx {
    pub fn new(document: impl Into<String>, doc_index: usize) -> Self {
        Self {
            document: document.into(),
            doc_index,
        }
    }
}

impl Display for DocumentCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[文档 {} {}]", self.doc_index, self.document)
    }
}
