//! 菜谱接口服务
//!
//! 按路径风格和图片提交方式调用后端菜谱接口

use std::sync::Arc;

use reqwest::Method;
use serde_json::json;
use tracing::{debug, info};

use crate::api::Endpoints;
use crate::config::{Config, ImageMode};
use crate::error::{ApiError, AppResult};
use crate::form::ImageFile;
use crate::infrastructure::{ApiTransport, PartSpec, Payload};
use crate::models::{RecipeDetail, RecipeDetailWithImageData, RecipeSearchCriteria};

/// multipart 中菜谱 JSON 部分的名称
pub const PART_RECIPE_DETAIL: &str = "recipeDetail";
/// multipart 中图片文件部分的名称
pub const PART_IMAGE_FILE: &str = "imageFile";

/// 菜谱接口服务
#[derive(Debug, Clone)]
pub struct RecipeService {
    transport: Arc<ApiTransport>,
    endpoints: Endpoints,
    image_mode: ImageMode,
}

impl RecipeService {
    pub fn new(transport: Arc<ApiTransport>, config: &Config) -> Self {
        Self {
            transport,
            endpoints: Endpoints::new(config.endpoint_style),
            image_mode: config.image_mode,
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn image_mode(&self) -> ImageMode {
        self.image_mode
    }

    /// 一览 / 检索，`query` 为已规范化的查询参数
    pub async fn list(&self, query: &[(String, String)]) -> AppResult<Vec<RecipeDetail>> {
        let recipes: Vec<RecipeDetail> = self
            .transport
            .get_json(&self.endpoints.list(), query)
            .await?;
        debug!("取得菜谱 {} 件", recipes.len());
        Ok(recipes)
    }

    /// 按检索条件查询
    pub async fn search(&self, criteria: &RecipeSearchCriteria) -> AppResult<Vec<RecipeDetail>> {
        self.list(&criteria.to_query_pairs()).await
    }

    pub async fn get(&self, id: i32) -> AppResult<RecipeDetail> {
        self.transport.get_json(&self.endpoints.detail(id), &[]).await
    }

    /// 新建菜谱，返回服务端保存后的详情
    pub async fn create(
        &self,
        detail: &RecipeDetail,
        image: Option<&ImageFile>,
    ) -> AppResult<RecipeDetail> {
        let payload = self.build_payload(detail, image)?;
        let saved: RecipeDetail = self
            .transport
            .send_json(Method::POST, &self.endpoints.create(), &payload)
            .await?;
        info!("✓ 菜谱已创建: 「{}」(id={})", saved.recipe.name, saved.recipe.id);
        Ok(saved)
    }

    /// 更新菜谱
    ///
    /// 路径 ID 与请求体中的菜谱 ID 不一致时不发送请求
    pub async fn update(
        &self,
        id: i32,
        detail: &RecipeDetail,
        image: Option<&ImageFile>,
    ) -> AppResult<RecipeDetail> {
        if detail.recipe.id != id {
            return Err(ApiError::IdMismatch {
                path_id: id,
                body_id: detail.recipe.id,
            }
            .into());
        }

        let payload = self.build_payload(detail, image)?;
        let saved: RecipeDetail = self
            .transport
            .send_json(Method::PUT, &self.endpoints.update(id), &payload)
            .await?;
        info!("✓ 菜谱已更新: 「{}」(id={})", saved.recipe.name, saved.recipe.id);
        Ok(saved)
    }

    /// 切换收藏状态，返回服务端的提示文本
    pub async fn set_favorite(&self, id: i32, favorite: bool) -> AppResult<String> {
        let payload = Payload::Json(json!({ "favorite": favorite }));
        self.transport
            .send_text(Method::PUT, &self.endpoints.favorite(id), &payload)
            .await
    }

    /// 删除菜谱，返回服务端的提示文本
    pub async fn delete(&self, id: i32) -> AppResult<String> {
        let message = self
            .transport
            .send_text(Method::DELETE, &self.endpoints.delete(id), &Payload::Empty)
            .await?;
        info!("✓ 菜谱已删除: id={}", id);
        Ok(message)
    }

    /// 按图片提交方式构造请求体
    pub fn build_payload(
        &self,
        detail: &RecipeDetail,
        image: Option<&ImageFile>,
    ) -> AppResult<Payload> {
        match self.image_mode {
            ImageMode::Json => {
                let body = RecipeDetailWithImageData {
                    recipe_detail: detail.clone(),
                    image_data: image.map(ImageFile::to_data_url),
                };
                Ok(Payload::Json(serde_json::to_value(body)?))
            }
            ImageMode::Multipart => {
                let mut parts = vec![PartSpec::Json {
                    name: PART_RECIPE_DETAIL.to_string(),
                    value: serde_json::to_value(detail)?,
                }];
                if let Some(image) = image {
                    parts.push(PartSpec::File {
                        name: PART_IMAGE_FILE.to_string(),
                        file_name: image.file_name.clone(),
                        mime: image.effective_mime().to_string(),
                        bytes: image.bytes.clone(),
                    });
                }
                Ok(Payload::Multipart(parts))
            }
        }
    }
}
