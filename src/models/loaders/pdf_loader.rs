use crate::error::FileError;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 递归查找目录下的所有 PDF 文件
///
/// 扩展名不区分大小写，结果按路径排序，保证处理顺序稳定
///
/// # 参数
/// - `dir`: 起始目录
///
/// # 返回
/// PDF 文件路径列表；目录不存在时返回 [`FileError::NotFound`]
pub async fn find_pdf_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !fs::try_exists(dir).await.unwrap_or(false) {
        return Err(FileError::NotFound {
            path: dir.display().to_string(),
        }
        .into());
    }

    let mut pending = vec![dir.to_path_buf()];
    let mut pdf_files = Vec::new();

    while let Some(folder) = pending.pop() {
        let mut entries = fs::read_dir(&folder)
            .await
            .with_context(|| format!("无法读取文件夹: {}", folder.display()))?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let file_type = entry.file_type().await?;
            if file_type.is_dir() {
                pending.push(path);
            } else if is_pdf(&path) {
                pdf_files.push(path);
            }
        }
    }

    pdf_files.sort();
    tracing::info!("在 {} 中找到 {} 个 PDF 文件", dir.display(), pdf_files.len());

    Ok(pdf_files)
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_walks_subfolders_and_filters_extension() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("2023").join("march");
        std::fs::create_dir_all(&nested).unwrap();

        std::fs::write(dir.path().join("b.pdf"), b"%PDF-1.4").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"not a pdf").unwrap();
        std::fs::write(nested.join("A.PDF"), b"%PDF-1.4").unwrap();
        std::fs::write(nested.join("answers.json"), b"[]").unwrap();

        let files = find_pdf_files(dir.path()).await.unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().display().to_string())
            .collect();

        assert_eq!(files.len(), 2);
        assert!(names.iter().any(|n| n.ends_with("A.PDF")));
        assert!(names.contains(&"b.pdf".to_string()));
        // 排序后顺序稳定
        let mut sorted = files.clone();
        sorted.sort();
        assert_eq!(files, sorted);
    }

    #[tokio::test]
    async fn test_empty_folder_has_no_files() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_pdf_files(dir.path()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_folder_is_not_found() {
        let err = find_pdf_files(Path::new("no/such/folder")).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FileError>(),
            Some(FileError::NotFound { .. })
        ));
    }
}
