use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::form::RecipeForm;

/// 批量导入用的菜谱草稿（TOML）
///
/// ```toml
/// name = "卵焼き"
/// servings = "2"
/// favorite = true
/// image = "egg.png"
///
/// [[ingredients]]
/// name = "卵"
/// quantity = "3個"
///
/// [[instructions]]
/// content = "卵を割って混ぜる"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeDraft {
    pub name: String,
    #[serde(default)]
    pub recipe_source: Option<String>,
    #[serde(default)]
    pub servings: Option<String>,
    #[serde(default)]
    pub remark: Option<String>,
    #[serde(default)]
    pub favorite: bool,
    /// 图片路径，相对路径以草稿文件所在目录为基准
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<DraftIngredient>,
    #[serde(default)]
    pub instructions: Vec<DraftInstruction>,
    #[serde(skip_serializing, skip_deserializing)]
    pub file_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftIngredient {
    pub name: String,
    #[serde(default)]
    pub quantity: Option<String>,
    #[serde(default)]
    pub arrange: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftInstruction {
    pub content: String,
    #[serde(default)]
    pub arrange: bool,
}

impl RecipeDraft {
    pub fn with_file_path(mut self, file_path: String) -> Self {
        self.file_path = Some(file_path);
        self
    }

    /// 图片的实际路径
    pub fn image_path(&self) -> Option<PathBuf> {
        let image = self.image.as_deref().filter(|s| !s.trim().is_empty())?;
        let path = Path::new(image);
        if path.is_absolute() {
            return Some(path.to_path_buf());
        }
        let base = self
            .file_path
            .as_deref()
            .and_then(|p| Path::new(p).parent())
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Some(base.join(path))
    }

    /// 填入新建表单（图片需另行读取）
    pub fn to_form(&self) -> RecipeForm {
        let mut form = RecipeForm::new();
        self.apply_to(&mut form);
        form
    }

    /// 把草稿内容写入已有表单
    ///
    /// 已有行按位置覆盖并保留 ID，多出的草稿行追加为新行，
    /// 草稿里没有的行从末尾删除（至少保留一行）。菜谱 ID 和已保存的图片路径不变。
    pub fn apply_to(&self, form: &mut RecipeForm) {
        form.name = self.name.clone();
        form.recipe_source = self.recipe_source.clone().unwrap_or_default();
        form.servings = self.servings.clone().unwrap_or_default();
        form.remark = self.remark.clone().unwrap_or_default();
        form.favorite = self.favorite;

        let wanted = self.ingredients.len().max(1);
        while form.ingredients().len() < wanted {
            form.add_ingredient_row();
        }
        while form.ingredients().len() > wanted {
            let last = form.ingredients().len() - 1;
            if form.remove_ingredient_row(last).is_err() {
                break;
            }
        }
        for position in 0..form.ingredients().len() {
            let draft = self.ingredients.get(position).cloned().unwrap_or_default();
            if let Some(row) = form.ingredient_mut(position) {
                row.name = draft.name;
                row.quantity = draft.quantity.unwrap_or_default();
                row.arrange = draft.arrange;
            }
        }

        let wanted = self.instructions.len().max(1);
        while form.instructions().len() < wanted {
            form.add_instruction_row();
        }
        while form.instructions().len() > wanted {
            let last = form.instructions().len() - 1;
            if form.remove_instruction_row(last).is_err() {
                break;
            }
        }
        for position in 0..form.instructions().len() {
            let draft = self.instructions.get(position).cloned().unwrap_or_default();
            if let Some(row) = form.instruction_mut(position) {
                row.content = draft.content;
                row.arrange = draft.arrange;
            }
        }
        form.renumber_steps();
    }
}
