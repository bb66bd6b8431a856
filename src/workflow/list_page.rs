//! 菜谱一览页面 - 流程层
//!
//! 读取列表、检索、切换收藏、删除确认

use tracing::{debug, error, info, warn};

use crate::error::{ApiError, AppError};
use crate::models::RecipeDetail;
use crate::render::common::DEFAULT_LIST_ERROR;
use crate::render::{render_cards, render_count, render_error, render_loading};
use crate::services::search_service::{to_criteria, to_query, SearchForm};
use crate::services::RecipeService;
use crate::workflow::page_view::{regions, PageView};

pub const TOAST_DELETED: &str = "レシピを削除しました";
pub const ALERT_FAVORITE_FAILED: &str = "お気に入りの更新に失敗しました";
pub const ALERT_DELETE_FAILED: &str = "削除に失敗しました。再度お試しください。";

/// 菜谱一览页面
pub struct ListPage {
    recipes: RecipeService,
    view: PageView,
    items: Vec<RecipeDetail>,
    delete_target: Option<i32>,
}

impl ListPage {
    pub fn new(recipes: RecipeService) -> Self {
        Self {
            recipes,
            view: PageView::new(),
            items: Vec::new(),
            delete_target: None,
        }
    }

    pub fn view(&self) -> &PageView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut PageView {
        &mut self.view
    }

    pub fn items(&self) -> &[RecipeDetail] {
        &self.items
    }

    pub fn delete_target(&self) -> Option<i32> {
        self.delete_target
    }

    /// 页面打开时无条件读取全部菜谱
    pub async fn initialize(&mut self) -> bool {
        self.load(&[]).await
    }

    /// 按检索表单重新读取
    ///
    /// 日期格式或范围有误时直接显示错误，不发请求
    pub async fn search(&mut self, form: &SearchForm) -> bool {
        if let Err(e) = to_criteria(form) {
            warn!("检索条件有误: {}", e);
            self.show_error(&list_error_message(&e));
            return false;
        }
        let query = to_query(form);
        self.load(&query).await
    }

    /// 读取列表并重绘卡片和件数
    pub async fn load(&mut self, query: &[(String, String)]) -> bool {
        self.view
            .set_html(regions::RECIPE_CONTAINER, render_loading());

        match self.recipes.list(query).await {
            Ok(items) => {
                info!("✓ 读取菜谱 {} 件", items.len());
                self.items = items;
                self.render_list();
                true
            }
            Err(e) => {
                error!("读取菜谱列表失败: {}", e);
                self.show_error(&list_error_message(&e));
                false
            }
        }
    }

    fn render_list(&mut self) {
        self.view
            .set_html(regions::RECIPE_CONTAINER, render_cards(&self.items));
        self.view
            .set_text(regions::RECIPE_COUNT, render_count(self.items.len()));
    }

    fn show_error(&mut self, message: &str) {
        self.view
            .set_html(regions::RECIPE_CONTAINER, render_error(message));
    }

    fn set_favorite_locally(&mut self, id: i32, favorite: bool) {
        if let Some(item) = self.items.iter_mut().find(|d| d.recipe.id == id) {
            item.recipe.favorite = favorite;
        }
        self.render_list();
    }

    /// 切换收藏
    ///
    /// 先改界面再发请求，失败时恢复原状态并提示。
    /// 返回最终的收藏状态；列表中没有该菜谱时返回 `None`
    pub async fn toggle_favorite(&mut self, id: i32) -> Option<bool> {
        let current = self
            .items
            .iter()
            .find(|d| d.recipe.id == id)
            .map(|d| d.recipe.favorite)?;
        let next = !current;

        self.set_favorite_locally(id, next);

        match self.recipes.set_favorite(id, next).await {
            Ok(message) => {
                debug!("收藏已更新 id={}: {}", id, message);
                Some(next)
            }
            Err(e) => {
                error!("收藏更新失败 id={}: {}", id, e);
                self.view.alert(ALERT_FAVORITE_FAILED);
                self.set_favorite_locally(id, current);
                Some(current)
            }
        }
    }

    /// 点击删除按钮：记录目标并打开确认框
    pub fn confirm_delete(&mut self, id: i32) {
        self.delete_target = Some(id);
        self.view.open_modal();
    }

    pub fn cancel_delete(&mut self) {
        self.delete_target = None;
        self.view.close_modal();
    }

    /// 确认删除
    ///
    /// 无论成败删除目标都会被清空；成功时关闭确认框、重新读取列表并提示
    pub async fn execute_delete(&mut self) -> bool {
        let Some(id) = self.delete_target.take() else {
            return false;
        };

        match self.recipes.delete(id).await {
            Ok(_) => {
                self.view.close_modal();
                self.load(&[]).await;
                self.view.toast(TOAST_DELETED);
                true
            }
            Err(e) => {
                error!("删除失败 id={}: {}", id, e);
                self.view.alert(ALERT_DELETE_FAILED);
                false
            }
        }
    }
}

/// 列表区域显示的错误文本
fn list_error_message(err: &AppError) -> String {
    match err {
        AppError::Validation(failure) => failure
            .errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join(" / "),
        AppError::Api(ApiError::NotFound { .. } | ApiError::BadResponse { message: Some(_), .. }) => {
            err.user_message()
        }
        _ => DEFAULT_LIST_ERROR.to_string(),
    }
}
