//! 批量导入 - 编排层
//!
//! ## 职责
//!
//! 1. **批量加载**：扫描草稿目录，加载所有 TOML 菜谱草稿
//! 2. **并发控制**：使用 Semaphore 限制同时提交的数量
//! 3. **分批处理**：每批完成后再开始下一批
//! 4. **全局统计**：汇总成功 / 校验未通过 / 失败的数量
//!
//! 单个草稿的提交委托给 `SubmissionService`

use std::sync::Arc;

use anyhow::Result;
use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::form::ImageFile;
use crate::models::{load_all_drafts, RecipeDraft};
use crate::services::{SubmissionService, SubmitOutcome, SubmitTarget};
use crate::utils::logging::{
    log_batch_complete, log_batch_start, log_drafts_loaded, print_final_stats, truncate_text,
};

/// 单个草稿的导入结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftOutcome {
    /// 已保存，附带新菜谱 ID
    Imported(i32),
    /// 校验未通过，附带错误数
    Rejected(usize),
}

/// 导入统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportStats {
    pub total: usize,
    pub success: usize,
    pub rejected: usize,
    pub failed: usize,
}

/// 批次处理结果
#[derive(Debug, Default)]
struct BatchResult {
    success: usize,
    rejected: usize,
    failed: usize,
}

/// 批量导入器
pub struct BatchImporter {
    submission: SubmissionService,
    max_concurrent: usize,
    remove_imported: bool,
}

impl BatchImporter {
    pub fn new(submission: SubmissionService, config: &Config) -> Self {
        Self {
            submission,
            max_concurrent: config.max_concurrent_imports.max(1),
            remove_imported: config.remove_imported,
        }
    }

    /// 导入目录中的全部草稿
    pub async fn run(&self, folder: &str) -> Result<ImportStats> {
        info!("📁 正在扫描菜谱草稿: {}", folder);
        let drafts = load_all_drafts(folder).await?;

        if drafts.is_empty() {
            warn!("⚠️ 没有找到待导入的TOML文件");
            return Ok(ImportStats::default());
        }

        log_drafts_loaded(drafts.len(), self.max_concurrent);
        let stats = self.import_all(drafts).await?;
        print_final_stats(stats.success, stats.rejected, stats.failed, stats.total);

        Ok(stats)
    }

    async fn import_all(&self, drafts: Vec<RecipeDraft>) -> Result<ImportStats> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let total = drafts.len();
        let total_batches = total.div_ceil(self.max_concurrent);
        let mut stats = ImportStats {
            total,
            ..Default::default()
        };

        for (batch_index, batch) in drafts.chunks(self.max_concurrent).enumerate() {
            let batch_start = batch_index * self.max_concurrent;
            log_batch_start(
                batch_index + 1,
                total_batches,
                batch_start + 1,
                batch_start + batch.len(),
                total,
            );

            let result = self
                .import_batch(batch, batch_start, semaphore.clone())
                .await?;

            stats.success += result.success;
            stats.rejected += result.rejected;
            stats.failed += result.failed;

            log_batch_complete(batch_index + 1, result.success, batch.len());
        }

        Ok(stats)
    }

    async fn import_batch(
        &self,
        batch: &[RecipeDraft],
        batch_start: usize,
        semaphore: Arc<Semaphore>,
    ) -> Result<BatchResult> {
        let mut handles = Vec::new();

        for (idx, draft) in batch.iter().enumerate() {
            let draft_index = batch_start + idx + 1;
            let permit = semaphore.clone().acquire_owned().await?;
            let submission = self.submission.clone();
            let draft = draft.clone();
            let remove_imported = self.remove_imported;

            let handle = tokio::spawn(async move {
                let _permit = permit;
                import_draft(&submission, &draft, draft_index, remove_imported).await
            });
            handles.push((draft_index, handle));
        }

        // 等待本批所有任务完成
        let finished = join_all(
            handles
                .into_iter()
                .map(|(draft_index, handle)| async move { (draft_index, handle.await) }),
        )
        .await;

        let mut result = BatchResult::default();
        for (draft_index, joined) in finished {
            match joined {
                Ok(Ok(DraftOutcome::Imported(_))) => result.success += 1,
                Ok(Ok(DraftOutcome::Rejected(_))) => result.rejected += 1,
                Ok(Err(e)) => {
                    error!("[草稿 {}] ❌ 导入失败: {}", draft_index, e);
                    result.failed += 1;
                }
                Err(e) => {
                    error!("[草稿 {}] 任务执行失败: {}", draft_index, e);
                    result.failed += 1;
                }
            }
        }

        Ok(result)
    }
}

/// 提交单个草稿
///
/// 成功且 `remove_imported` 为真时删除草稿文件
pub async fn import_draft(
    submission: &SubmissionService,
    draft: &RecipeDraft,
    draft_index: usize,
    remove_imported: bool,
) -> AppResult<DraftOutcome> {
    info!(
        "[草稿 {}] 📝 提交「{}」",
        draft_index,
        truncate_text(&draft.name, 30)
    );

    let mut form = draft.to_form();
    if let Some(path) = draft.image_path() {
        form.image = Some(ImageFile::from_path(&path).await?);
    }

    match submission.submit(&form, SubmitTarget::Create).await? {
        SubmitOutcome::Saved(detail) => {
            info!(
                "[草稿 {}] ✓ 已保存 (id={})",
                draft_index, detail.recipe.id
            );
            if remove_imported {
                if let Some(path) = &draft.file_path {
                    tokio::fs::remove_file(path)
                        .await
                        .map_err(|e| AppError::file_read_failed(path.as_str(), e))?;
                    info!("[草稿 {}] 🗑️ 已删除草稿文件: {}", draft_index, path);
                }
            }
            Ok(DraftOutcome::Imported(detail.recipe.id))
        }
        SubmitOutcome::Rejected(errors) => {
            for (field, message) in errors.fields() {
                warn!("[草稿 {}] ⚠️ {}: {}", draft_index, field, message);
            }
            for message in errors.form_level() {
                warn!("[草稿 {}] ⚠️ {}", draft_index, message);
            }
            Ok(DraftOutcome::Rejected(errors.len()))
        }
    }
}
