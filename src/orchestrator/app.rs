//! 应用入口 - 编排层
//!
//! 持有传输层和各服务，把命令行的每个子命令交给对应页面或服务执行，
//! 返回要输出的文本

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::info;

use crate::config::Config;
use crate::form::ImageFile;
use crate::infrastructure::ApiTransport;
use crate::models::load_draft;
use crate::orchestrator::batch_importer::{BatchImporter, ImportStats};
use crate::services::{AuthService, RecipeService, SearchForm, SubmissionService};
use crate::utils::logging::log_startup;
use crate::workflow::{regions, DetailPage, ListPage, PageView, RecipeFormPage};

/// 应用主结构
pub struct App {
    config: Config,
    recipes: RecipeService,
    submission: SubmissionService,
    auth: AuthService,
}

impl App {
    /// 初始化应用；配置了游客登录时先登录
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let transport = Arc::new(ApiTransport::new(&config)?);
        let recipes = RecipeService::new(transport.clone(), &config);
        let submission = SubmissionService::new(recipes.clone(), &config);
        let auth = AuthService::new(transport);

        let app = Self {
            config,
            recipes,
            submission,
            auth,
        };

        if app.config.guest_login {
            app.auth.guest_login().await?;
        }

        Ok(app)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 用户名密码登录
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        self.auth.login(username, password).await?;
        Ok(())
    }

    /// 一览 / 检索：输出件数和卡片 HTML
    pub async fn list(&self, form: &SearchForm) -> Result<String> {
        let mut page = ListPage::new(self.recipes.clone());
        page.search(form).await;
        Ok(render_regions(
            page.view(),
            &[regions::RECIPE_COUNT, regions::RECIPE_CONTAINER],
        ))
    }

    /// 详情：输出详情 HTML（不存在时为错误提示）
    pub async fn show(&self, id: i32) -> Result<String> {
        let mut page = DetailPage::new(self.recipes.clone());
        page.load(id).await;
        Ok(render_regions(page.view(), &[regions::RECIPE_DETAIL]))
    }

    /// 从草稿新建
    pub async fn create(&self, draft_path: &Path, image: Option<&Path>) -> Result<String> {
        let draft = load_draft(draft_path).await?;
        let mut page = RecipeFormPage::new_recipe(self.submission.clone());
        *page.form_mut() = draft.to_form();

        if let Some(path) = image.map(Path::to_path_buf).or_else(|| draft.image_path()) {
            page.attach_image(ImageFile::from_path(&path).await?);
        }

        finish_submit(page).await
    }

    /// 用草稿内容覆盖已有菜谱（已有的材料/步骤行保留 ID）
    pub async fn update(&self, id: i32, draft_path: &Path, image: Option<&Path>) -> Result<String> {
        let draft = load_draft(draft_path).await?;
        let mut page = RecipeFormPage::edit(self.submission.clone(), id)
            .await
            .with_context(|| format!("无法读取菜谱 id={}", id))?;

        draft.apply_to(page.form_mut());

        if let Some(path) = image.map(Path::to_path_buf).or_else(|| draft.image_path()) {
            page.attach_image(ImageFile::from_path(&path).await?);
        }

        finish_submit(page).await
    }

    /// 设置收藏状态
    pub async fn favorite(&self, id: i32, favorite: bool) -> Result<String> {
        let message = self.recipes.set_favorite(id, favorite).await?;
        info!("✓ 收藏状态已更新 id={} favorite={}", id, favorite);
        Ok(message)
    }

    /// 删除：与页面上确认删除的流程相同
    pub async fn delete(&self, id: i32) -> Result<String> {
        let mut page = ListPage::new(self.recipes.clone());
        page.confirm_delete(id);
        if !page.execute_delete().await {
            bail!(page.view_mut().take_alerts().join("\n"));
        }
        let mut lines: Vec<String> = page.view().toasts().to_vec();
        lines.extend(page.view().region(regions::RECIPE_COUNT).map(str::to_string));
        Ok(lines.join("\n"))
    }

    /// 批量导入草稿目录
    pub async fn import(&self, folder: Option<&str>) -> Result<ImportStats> {
        let folder = folder.unwrap_or(&self.config.draft_folder);
        BatchImporter::new(self.submission.clone(), &self.config)
            .run(folder)
            .await
    }
}

async fn finish_submit(mut page: RecipeFormPage) -> Result<String> {
    match page.submit().await {
        Some(saved) => Ok(format!(
            "{} (id={}) → {}",
            page.view().toasts().join(" "),
            saved.recipe.id,
            page.view().redirect().unwrap_or_default()
        )),
        None => {
            let mut lines: Vec<String> = page.view().alerts().to_vec();
            for (field, message) in page.errors().fields() {
                lines.push(format!("  {}: {}", field, message));
            }
            for message in page.errors().form_level() {
                lines.push(format!("  {}", message));
            }
            bail!(lines.join("\n"))
        }
    }
}

fn render_regions(view: &PageView, names: &[&str]) -> String {
    names
        .iter()
        .filter_map(|name| view.region(name))
        .collect::<Vec<_>>()
        .join("\n")
}
