use crate::error::AppError;
use crate::models::Document;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 列出文件夹中所有以 `.pdf` 结尾的文件，保持目录遍历顺序
pub async fn list_pdf_files(folder_path: &str) -> Result<Vec<PathBuf>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        anyhow::bail!("文件夹不存在: {}", folder_path);
    }

    let mut pdf_files = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_pdf = path
            .file_name()
            .and_then(|s| s.to_str())
            .is_some_and(|name| name.ends_with(".pdf"));
        if is_pdf && path.is_file() {
            pdf_files.push(path);
        }
    }

    Ok(pdf_files)
}

/// 读取单个 PDF，各页文本按页序用换行连接
pub async fn load_pdf_document(pdf_path: &Path) -> Result<Document> {
    let name = pdf_path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    let path = pdf_path.to_path_buf();
    let pages = tokio::task::spawn_blocking(move || pdf_extract::extract_text_by_pages(&path))
        .await
        .with_context(|| format!("PDF 提取任务异常退出: {}", pdf_path.display()))?
        .map_err(|e| AppError::PdfExtract {
            path: pdf_path.display().to_string(),
            message: e.to_string(),
        })?;

    Ok(Document::new(name, pages.join("\n")))
}

/// 从文件夹中加载所有 PDF
pub async fn load_all_pdf_documents(folder_path: &str) -> Result<Vec<Document>> {
    let mut documents = Vec::new();

    for path in list_pdf_files(folder_path).await? {
        tracing::info!(
            "正在加载: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );

        let document = load_pdf_document(&path).await?;
        tracing::info!("成功提取 {} 个字符", document.text.chars().count());
        documents.push(document);
    }

    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_pdf_suffix_is_listed() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.pdf", "notes.txt", "B.PDF", "c.pdf.bak"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("folder.pdf")).unwrap();

        let files = tokio_test::block_on(list_pdf_files(dir.path().to_str().unwrap())).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.pdf"]);
    }

    #[test]
    fn test_missing_folder_is_an_error() {
        let result = tokio_test::block_on(list_pdf_files("/definitely/not/here"));
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_broken_pdf_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"not a pdf").unwrap();

        let result = load_pdf_document(&path).await;
        assert!(result.is_err());
    }

    /// 生成每页一行文字的最小 PDF（Helvetica，xref 偏移按实际字节计算）
    fn text_pdf(pages: &[&str]) -> Vec<u8> {
        let font_id = 3 + 2 * pages.len();
        let kids: Vec<String> = (0..pages.len()).map(|i| format!("{} 0 R", 3 + 2 * i)).collect();

        let mut objects = vec![
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            format!("<< /Type /Pages /Kids [{}] /Count {} >>", kids.join(" "), pages.len()),
        ];
        for (i, text) in pages.iter().enumerate() {
            let content = format!("BT /F1 24 Tf 72 720 Td ({}) Tj ET", text);
            objects.push(format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents {} 0 R /Resources << /Font << /F1 {} 0 R >> >> >>",
                4 + 2 * i,
                font_id
            ));
            objects.push(format!(
                "<< /Length {} >>\nstream\n{}\nendstream",
                content.len(),
                content
            ));
        }
        objects.push(
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
        );

        let mut pdf = String::from("%PDF-1.4\n");
        let mut offsets = Vec::new();
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, body));
        }

        let xref_at = pdf.len();
        pdf.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
        for offset in offsets {
            pdf.push_str(&format!("{:010} 00000 n \n", offset));
        }
        pdf.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_at
        ));
        pdf.into_bytes()
    }

    #[tokio::test]
    async fn test_pages_are_joined_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.pdf");
        std::fs::write(&path, text_pdf(&["Yield 5 tons", "Crop maize"])).unwrap();

        let document = load_pdf_document(&path).await.unwrap();
        assert_eq!(document.name, "a.pdf");

        let first = document.text.find("Yield").expect("缺少第一页文本");
        let second = document.text.find("maize").expect("缺少第二页文本");
        assert!(first < second);
        assert!(document.text[first..second].contains('\n'));
    }

    #[tokio::test]
    async fn test_folder_load_reads_every_pdf() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.pdf"), text_pdf(&["Title Maize trials"])).unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"skip me").unwrap();

        let documents = load_all_pdf_documents(dir.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(documents.len(), 1);
        assert!(documents[0].text.contains("Maize"));
    }
}
