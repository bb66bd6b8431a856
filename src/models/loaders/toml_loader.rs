use crate::error::{AppError, AppResult, FileError};
use crate::models::draft::RecipeDraft;
use std::path::{Path, PathBuf};
use tokio::fs;

/// 从 TOML 文件加载菜谱草稿
pub async fn load_draft(toml_file_path: &Path) -> AppResult<RecipeDraft> {
    let path_str = toml_file_path.display().to_string();

    let content = fs::read_to_string(toml_file_path)
        .await
        .map_err(|e| AppError::file_read_failed(&path_str, e))?;

    let draft: RecipeDraft = toml::from_str(&content).map_err(|e| {
        AppError::File(FileError::TomlParseFailed {
            path: path_str.clone(),
            source: e,
        })
    })?;

    Ok(draft.with_file_path(path_str))
}

/// 从文件夹中加载所有 TOML 草稿，按文件名排序
///
/// 单个文件解析失败只记录警告，不影响其他文件
pub async fn load_all_drafts(folder_path: &str) -> AppResult<Vec<RecipeDraft>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        return Err(AppError::File(FileError::DirectoryNotFound {
            path: folder_path.to_string(),
        }));
    }

    let mut toml_files = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .map_err(|e| AppError::file_read_failed(folder_path, e))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml_files.push(path);
        }
    }
    toml_files.sort();

    let mut drafts = Vec::new();
    for path in toml_files {
        tracing::info!(
            "正在加载: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );

        match load_draft(&path).await {
            Ok(draft) => {
                tracing::info!(
                    "成功加载「{}」: {} 个材料, {} 个步骤",
                    draft.name,
                    draft.ingredients.len(),
                    draft.instructions.len()
                );
                drafts.push(draft);
            }
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {}", path.display(), e);
            }
        }
    }

    Ok(drafts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_all_drafts_skips_broken_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("b.toml"),
            "name = \"豚汁\"\n[[ingredients]]\nname = \"豚肉\"\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("a.toml"), "name = \"冷奴\"\n").unwrap();
        std::fs::write(dir.path().join("broken.toml"), "name = [").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let drafts = load_all_drafts(dir.path().to_str().unwrap()).await.unwrap();
        let names: Vec<&str> = drafts.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["冷奴", "豚汁"]);
        assert!(drafts[0].file_path.as_deref().unwrap().ends_with("a.toml"));
    }

    #[tokio::test]
    async fn test_missing_folder_is_an_error() {
        let result = load_all_drafts("/nonexistent/recipe/drafts").await;
        assert!(matches!(
            result,
            Err(AppError::File(FileError::DirectoryNotFound { .. }))
        ));
    }
}
