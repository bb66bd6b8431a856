//! 菜谱提交
//!
//! 提交顺序固定：客户端校验 → 图片检查 → 发送请求。
//! 前两步失败时不会发出任何请求。

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::form::{validate, RecipeForm, ValidationErrors};
use crate::models::RecipeDetail;
use crate::services::recipe_service::RecipeService;

pub use crate::form::image::{decode_data_url, encode_data_url};

/// 提交目标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitTarget {
    Create,
    Update(i32),
}

/// 提交结果
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// 保存成功，附带服务端返回的详情
    Saved(RecipeDetail),
    /// 校验未通过（客户端或服务端），错误已映射为表单字段名
    Rejected(ValidationErrors),
}

impl SubmitOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, SubmitOutcome::Saved(_))
    }
}

/// 提交控制
#[derive(Debug, Clone)]
pub struct SubmissionService {
    recipes: RecipeService,
    max_image_bytes: usize,
}

impl SubmissionService {
    pub fn new(recipes: RecipeService, config: &Config) -> Self {
        Self {
            recipes,
            max_image_bytes: config.max_image_bytes,
        }
    }

    pub fn recipes(&self) -> &RecipeService {
        &self.recipes
    }

    /// 提交表单
    ///
    /// 图片检查失败返回 `AppError::File`；服务端 400 校验错误转换为 `Rejected`
    pub async fn submit(&self, form: &RecipeForm, target: SubmitTarget) -> AppResult<SubmitOutcome> {
        let client_errors = validate(form);
        if !client_errors.is_empty() {
            debug!("客户端校验未通过: {} 个错误", client_errors.len());
            return Ok(SubmitOutcome::Rejected(ValidationErrors::from_client(
                &client_errors,
            )));
        }

        if let Some(image) = &form.image {
            image.check(self.max_image_bytes)?;
            debug!("图片检查通过: {:?}", image);
        }

        let detail = form.to_recipe_detail();
        let image = form.image.as_ref();
        let result = match target {
            SubmitTarget::Create => self.recipes.create(&detail, image).await,
            SubmitTarget::Update(id) => self.recipes.update(id, &detail, image).await,
        };

        match result {
            Ok(saved) => {
                info!("✓ 提交成功: 「{}」", saved.recipe.name);
                Ok(SubmitOutcome::Saved(saved))
            }
            Err(AppError::Validation(failure)) => {
                warn!("服务端校验未通过: {}", failure);
                let mut errors = ValidationErrors::from_server(&failure.errors);
                if errors.is_empty() {
                    if let Some(message) = &failure.message {
                        errors.display(None, message);
                    }
                }
                Ok(SubmitOutcome::Rejected(errors))
            }
            Err(e) => Err(e),
        }
    }
}
