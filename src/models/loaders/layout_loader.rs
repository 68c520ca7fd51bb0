use crate::models::ReportLayout;
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

/// 从 TOML 文件加载报表列配置
pub async fn load_layout_file(path: &Path) -> Result<ReportLayout> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("无法读取列配置文件: {}", path.display()))?;

    let layout: ReportLayout = toml::from_str(&content)
        .with_context(|| format!("无法解析列配置文件: {}", path.display()))?;

    if layout.columns.is_empty() {
        anyhow::bail!("列配置文件没有任何列: {}", path.display());
    }

    Ok(layout)
}

/// 有配置文件就用配置文件，否则使用内置列表
pub async fn load_report_layout(path: Option<&str>) -> Result<ReportLayout> {
    match path {
        Some(path) => {
            tracing::info!("正在加载列配置: {}", path);
            load_layout_file(Path::new(path)).await
        }
        None => Ok(ReportLayout::default()),
    }
}
