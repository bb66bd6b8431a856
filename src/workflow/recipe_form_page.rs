//! 菜谱新建 / 编辑页面 - 流程层
//!
//! 行的增删、输入时清除错误、提交后的提示与跳转

use tracing::{error, info, warn};

use crate::api::pages;
use crate::error::{AppError, AppResult, FormError};
use crate::form::{ImageFile, RecipeForm, ValidationErrors};
use crate::models::RecipeDetail;
use crate::render::render_recipe_form;
use crate::services::{SubmissionService, SubmitOutcome, SubmitTarget};
use crate::workflow::page_view::{regions, PageView};

pub const TOAST_SAVED: &str = "レシピを保存しました";
pub const ALERT_FORM_INVALID: &str = "入力内容に不備があります。入力フォームを確認してください。";

/// 菜谱编辑页面
pub struct RecipeFormPage {
    submission: SubmissionService,
    view: PageView,
    form: RecipeForm,
    errors: ValidationErrors,
    target: SubmitTarget,
}

impl RecipeFormPage {
    /// 新建页面：材料和步骤各一行空白行
    pub fn new_recipe(submission: SubmissionService) -> Self {
        let mut page = Self {
            submission,
            view: PageView::new(),
            form: RecipeForm::new(),
            errors: ValidationErrors::new(),
            target: SubmitTarget::Create,
        };
        page.render();
        page
    }

    /// 编辑页面：读取已保存的菜谱填入表单
    pub async fn edit(submission: SubmissionService, id: i32) -> AppResult<Self> {
        let detail = submission.recipes().get(id).await?;
        info!("编辑菜谱: 「{}」(id={})", detail.recipe.name, id);

        let mut page = Self {
            submission,
            view: PageView::new(),
            form: RecipeForm::from_recipe_detail(&detail),
            errors: ValidationErrors::new(),
            target: SubmitTarget::Update(id),
        };
        page.render();
        Ok(page)
    }

    pub fn view(&self) -> &PageView {
        &self.view
    }

    pub fn form(&self) -> &RecipeForm {
        &self.form
    }

    /// 修改表单内容后需调用 `render` 刷新
    pub fn form_mut(&mut self) -> &mut RecipeForm {
        &mut self.form
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn target(&self) -> SubmitTarget {
        self.target
    }

    pub fn render(&mut self) {
        self.view.set_html(
            regions::RECIPE_FORM,
            render_recipe_form(&self.form, &self.errors),
        );
    }

    pub fn add_ingredient_row(&mut self) -> usize {
        let index = self.form.add_ingredient_row();
        self.render();
        index
    }

    pub fn add_instruction_row(&mut self) -> usize {
        let index = self.form.add_instruction_row();
        self.render();
        index
    }

    /// 删除材料行，只剩一行时提示且不删除
    pub fn remove_ingredient_row(&mut self, index: usize) -> bool {
        let removed = self.form.remove_ingredient_row(index).map(|_| ());
        self.after_remove(removed)
    }

    /// 删除步骤行，其余步骤号重新编号
    pub fn remove_instruction_row(&mut self, index: usize) -> bool {
        let removed = self.form.remove_instruction_row(index).map(|_| ());
        self.after_remove(removed)
    }

    fn after_remove(&mut self, result: Result<(), FormError>) -> bool {
        match result {
            Ok(()) => {
                self.render();
                true
            }
            Err(e) => {
                warn!("无法删除行: {}", e);
                self.view.alert(e.to_string());
                false
            }
        }
    }

    /// 输入框重新输入：清除该字段的错误
    pub fn on_input(&mut self, field: &str) {
        if self.errors.clear_field(field) {
            self.render();
        }
    }

    pub fn attach_image(&mut self, image: ImageFile) {
        self.form.image = Some(image);
    }

    /// 提交
    ///
    /// 成功时提示并跳转到一览页面，返回保存后的详情；
    /// 失败时显示字段错误和整体提示
    pub async fn submit(&mut self) -> Option<RecipeDetail> {
        self.errors.clear();

        match self.submission.submit(&self.form, self.target).await {
            Ok(SubmitOutcome::Saved(detail)) => {
                self.render();
                self.view.toast(TOAST_SAVED);
                self.view.redirect_to(pages::LIST);
                Some(detail)
            }
            Ok(SubmitOutcome::Rejected(errors)) => {
                info!("表单未通过校验: {} 个错误", errors.len());
                self.errors = errors;
                self.render();
                self.view.alert(ALERT_FORM_INVALID);
                None
            }
            Err(e @ AppError::File(_)) => {
                warn!("图片无法上传: {}", e);
                self.render();
                self.view.alert(e.user_message());
                None
            }
            Err(e) => {
                error!("提交失败: {}", e);
                self.render();
                self.view.alert(ALERT_FORM_INVALID);
                None
            }
        }
    }
}
