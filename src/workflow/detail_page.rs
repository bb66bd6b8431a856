//! 菜谱详情页面

use tracing::{error, info};

use crate::models::RecipeDetail;
use crate::render::{render_detail, render_error, render_loading};
use crate::services::RecipeService;
use crate::workflow::page_view::{regions, PageView};

pub struct DetailPage {
    recipes: RecipeService,
    view: PageView,
    detail: Option<RecipeDetail>,
}

impl DetailPage {
    pub fn new(recipes: RecipeService) -> Self {
        Self {
            recipes,
            view: PageView::new(),
            detail: None,
        }
    }

    pub fn view(&self) -> &PageView {
        &self.view
    }

    pub fn detail(&self) -> Option<&RecipeDetail> {
        self.detail.as_ref()
    }

    /// 读取并显示详情；不存在时显示服务端返回的提示
    pub async fn load(&mut self, id: i32) -> bool {
        self.view
            .set_html(regions::RECIPE_DETAIL, render_loading());

        match self.recipes.get(id).await {
            Ok(detail) => {
                info!("✓ 读取菜谱详情: 「{}」", detail.recipe.name);
                self.view
                    .set_html(regions::RECIPE_DETAIL, render_detail(&detail));
                self.detail = Some(detail);
                true
            }
            Err(e) => {
                error!("读取菜谱详情失败 id={}: {}", id, e);
                self.detail = None;
                self.view
                    .set_html(regions::RECIPE_DETAIL, render_error(&e.user_message()));
                false
            }
        }
    }
}
