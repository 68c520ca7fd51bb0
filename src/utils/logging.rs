/// 日志工具模块
///
/// 提供日志初始化以及格式化输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化全局日志
///
/// 使用 `RUST_LOG` 控制级别，未设置时为 `info`。重复调用不会报错。
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `mode`: 运行模式描述
/// - `model`: 使用的模型
/// - `max_concurrent`: 每个文档的最大并发数
pub fn log_startup(mode: &str, model: &str, max_concurrent: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - {}", mode);
    info!("🤖 模型: {}", model);
    info!("📊 每个文档最大并发数: {}", max_concurrent);
    info!("{}", "=".repeat(60));
}

/// 记录输入加载信息
pub fn log_inputs_loaded(documents: usize, questions: usize) {
    info!("✓ 找到 {} 个待处理的 PDF", documents);
    info!("📋 每个文档将提问 {} 个参数\n", questions);
}

/// 记录文档开始信息
pub fn log_document_start(doc_index: usize, total: usize, name: &str, text_len: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📄 开始处理第 {}/{} 个文档: {}", doc_index, total, name);
    info!("📏 文本长度: {} 字符", text_len);
    info!("{}", "=".repeat(60));
}

/// 记录文档完成信息
pub fn log_document_complete(doc_index: usize, success: usize, total: usize) {
    info!("{}", "─".repeat(60));
    info!("✓ 第 {} 个文档完成: 成功 {}/{}", doc_index, success, total);
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `documents`: 处理的文档数
/// - `answers`: 成功的答案数
/// - `failed`: 失败的 (文档, 问题) 数
/// - `outputs`: 写出的文件路径
pub fn print_final_stats(documents: usize, answers: usize, failed: usize, outputs: &[String]) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("📄 文档: {}", documents);
    info!("✅ 答案: {}", answers);
    info!("❌ 失败: {}", failed);
    for path in outputs {
        info!("💾 输出: {}", path);
    }
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
