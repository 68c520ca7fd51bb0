//! 失败记录服务 - 业务能力层
//!
//! 只负责把调用失败的 (文档, 问题) 追加写入失败记录文件

use anyhow::{Context, Result};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::models::FailedPair;
use crate::utils::truncate_text;

/// 失败记录服务
///
/// 职责：
/// - 把丢弃的组合写入文件，避免结果表里只看到空单元格
/// - 只追加，不清空已有内容
pub struct FailureWriter {
    failure_file_path: String,
}

impl FailureWriter {
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            failure_file_path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.failure_file_path
    }

    /// 写入失败记录
    ///
    /// # 参数
    /// - `run_id`: 运行时间戳
    /// - `failures`: 本次运行失败的组合
    pub async fn write(&self, run_id: &str, failures: &[FailedPair]) -> Result<()> {
        if failures.is_empty() {
            return Ok(());
        }

        debug!("写入 {} 条失败记录到 {}", failures.len(), self.failure_file_path);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.failure_file_path)
            .await
            .with_context(|| format!("无法打开失败记录文件: {}", self.failure_file_path))?;

        let mut content = String::new();
        for failure in failures {
            content.push_str(&format!(
                "{} | 文档 {} | 问题: {} | 错误: {}\n",
                run_id,
                failure.document,
                truncate_text(&failure.question, 80),
                failure.error.replace('\n', " ")
            ));
        }

        file.write_all(content.as_bytes()).await?;
        file.flush().await?;

        Ok(())
    }
}
