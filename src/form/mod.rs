//! 菜谱编辑表单
//!
//! 维护菜谱本体字段和可增删的材料行 / 步骤行，负责：
//! - 行的追加、删除（至少保留一行）与步骤号重排
//! - 与提交字段（`ingredient.name.N` 等）之间的相互转换
//! - 与 `RecipeDetail` JSON 之间的相互转换

pub mod fields;
pub mod image;
pub mod validation;

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{FormError, RowKind};
use crate::models::{Ingredient, Instruction, Recipe, RecipeDetail};

pub use fields::{RecipeField, RowAttr, RowField};
pub use image::ImageFile;
pub use validation::{map_server_field, validate, ValidationErrors};

/// 材料行
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngredientRow {
    /// 已存在的材料 ID，新行为 0
    pub id: i32,
    pub name: String,
    pub quantity: String,
    pub arrange: bool,
}

/// 步骤行
///
/// 步骤号由表单维护，始终等于行的位置（从 1 开始）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstructionRow {
    pub id: i32,
    step_number: usize,
    pub content: String,
    pub arrange: bool,
}

impl InstructionRow {
    pub fn step_number(&self) -> usize {
        self.step_number
    }
}

/// 菜谱编辑表单
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeForm {
    /// 编辑时的菜谱 ID，新建为 0
    pub recipe_id: i32,
    pub name: String,
    pub recipe_source: String,
    pub servings: String,
    pub remark: String,
    pub favorite: bool,
    /// 编辑时已保存的图片路径
    pub image_path: Option<String>,
    /// 待上传的新图片
    pub image: Option<ImageFile>,
    ingredients: Vec<IngredientRow>,
    instructions: Vec<InstructionRow>,
}

impl Default for RecipeForm {
    fn default() -> Self {
        Self::new()
    }
}

impl RecipeForm {
    /// 新建空表单，材料和步骤各带一行空白行
    pub fn new() -> Self {
        let mut form = Self {
            recipe_id: 0,
            name: String::new(),
            recipe_source: String::new(),
            servings: String::new(),
            remark: String::new(),
            favorite: false,
            image_path: None,
            image: None,
            ingredients: Vec::new(),
            instructions: Vec::new(),
        };
        form.ensure_initial_rows();
        form
    }

    fn ensure_initial_rows(&mut self) {
        if self.ingredients.is_empty() {
            self.add_ingredient_row();
        }
        if self.instructions.is_empty() {
            self.add_instruction_row();
        }
    }

    pub fn ingredients(&self) -> &[IngredientRow] {
        &self.ingredients
    }

    pub fn instructions(&self) -> &[InstructionRow] {
        &self.instructions
    }

    pub fn ingredient_mut(&mut self, index: usize) -> Option<&mut IngredientRow> {
        self.ingredients.get_mut(index)
    }

    pub fn instruction_mut(&mut self, index: usize) -> Option<&mut InstructionRow> {
        self.instructions.get_mut(index)
    }

    /// 追加材料行，返回新行的序号（从 1 开始）
    pub fn add_ingredient_row(&mut self) -> usize {
        self.ingredients.push(IngredientRow::default());
        self.ingredients.len()
    }

    /// 追加步骤行，步骤号预填为新行序号
    pub fn add_instruction_row(&mut self) -> usize {
        let next = self.instructions.len() + 1;
        self.instructions.push(InstructionRow {
            step_number: next,
            ..Default::default()
        });
        next
    }

    /// 删除材料行（`index` 从 0 开始）
    pub fn remove_ingredient_row(&mut self, index: usize) -> Result<IngredientRow, FormError> {
        check_removable(RowKind::Ingredient, index, self.ingredients.len())?;
        Ok(self.ingredients.remove(index))
    }

    /// 删除步骤行并重排步骤号
    pub fn remove_instruction_row(&mut self, index: usize) -> Result<InstructionRow, FormError> {
        check_removable(RowKind::Instruction, index, self.instructions.len())?;
        let removed = self.instructions.remove(index);
        self.renumber_steps();
        Ok(removed)
    }

    /// 步骤号按行顺序重排为 1..=n
    pub fn renumber_steps(&mut self) {
        for (position, row) in self.instructions.iter_mut().enumerate() {
            row.step_number = position + 1;
        }
    }

    /// 当前所有行字段名（页面上 `name` 属性的集合）
    pub fn field_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        for index in 1..=self.ingredients.len() {
            for attr in [RowAttr::Name, RowAttr::Quantity, RowAttr::Arrange] {
                names.push(RowField::new(RowKind::Ingredient, attr, index).to_string());
            }
        }
        for index in 1..=self.instructions.len() {
            for attr in [RowAttr::StepNumber, RowAttr::Content, RowAttr::Arrange] {
                names.push(RowField::new(RowKind::Instruction, attr, index).to_string());
            }
        }
        names
    }

    /// 从提交字段还原表单
    ///
    /// 字段顺序任意、序号可以不连续；行按序号升序排列，
    /// 步骤号重新按位置编号。未知字段忽略。
    pub fn from_fields(fields: &[(String, String)]) -> Self {
        let mut form = Self {
            ingredients: Vec::new(),
            instructions: Vec::new(),
            ..Self::new()
        };
        let mut ingredients: BTreeMap<usize, IngredientRow> = BTreeMap::new();
        let mut instructions: BTreeMap<usize, InstructionRow> = BTreeMap::new();

        for (key, value) in fields {
            if let Some(field) = RecipeField::parse(key) {
                match field {
                    RecipeField::Name => form.name = value.clone(),
                    RecipeField::RecipeSource => form.recipe_source = value.clone(),
                    RecipeField::Servings => form.servings = value.clone(),
                    RecipeField::Remark => form.remark = value.clone(),
                    RecipeField::Favorite => form.favorite = is_checked(value),
                }
                continue;
            }

            if key == "id" || key == "recipe.id" {
                form.recipe_id = value.trim().parse().unwrap_or(0);
                continue;
            }

            let Some(field) = RowField::parse(key) else {
                debug!("忽略未知表单字段: {}", key);
                continue;
            };

            match field.kind {
                RowKind::Ingredient => {
                    let row = ingredients.entry(field.index).or_default();
                    match field.attr {
                        RowAttr::Name => row.name = value.clone(),
                        RowAttr::Quantity => row.quantity = value.clone(),
                        RowAttr::Arrange => row.arrange = is_checked(value),
                        _ => {}
                    }
                }
                RowKind::Instruction => {
                    let row = instructions.entry(field.index).or_default();
                    match field.attr {
                        RowAttr::Content => row.content = value.clone(),
                        RowAttr::Arrange => row.arrange = is_checked(value),
                        _ => {}
                    }
                }
            }
        }

        form.ingredients = ingredients.into_values().collect();
        form.instructions = instructions.into_values().collect();
        form.renumber_steps();
        form.ensure_initial_rows();
        form
    }

    /// 转换为提交字段，未勾选的复选框不出现（与浏览器行为一致）
    pub fn to_fields(&self) -> Vec<(String, String)> {
        let mut fields = vec![
            ("name".to_string(), self.name.clone()),
            ("recipeSource".to_string(), self.recipe_source.clone()),
            ("servings".to_string(), self.servings.clone()),
            ("remark".to_string(), self.remark.clone()),
        ];
        if self.favorite {
            fields.push(("favorite".to_string(), "on".to_string()));
        }

        for (position, row) in self.ingredients.iter().enumerate() {
            let index = position + 1;
            let key = |attr| RowField::new(RowKind::Ingredient, attr, index).to_string();
            fields.push((key(RowAttr::Name), row.name.clone()));
            fields.push((key(RowAttr::Quantity), row.quantity.clone()));
            if row.arrange {
                fields.push((key(RowAttr::Arrange), "on".to_string()));
            }
        }

        for (position, row) in self.instructions.iter().enumerate() {
            let index = position + 1;
            let key = |attr| RowField::new(RowKind::Instruction, attr, index).to_string();
            fields.push((key(RowAttr::StepNumber), row.step_number.to_string()));
            fields.push((key(RowAttr::Content), row.content.clone()));
            if row.arrange {
                fields.push((key(RowAttr::Arrange), "on".to_string()));
            }
        }

        fields
    }

    /// 转换为提交用的 `RecipeDetail`
    pub fn to_recipe_detail(&self) -> RecipeDetail {
        let recipe = Recipe {
            id: self.recipe_id,
            name: self.name.clone(),
            image_path: self.image_path.clone(),
            recipe_source: Some(self.recipe_source.clone()),
            servings: Some(self.servings.clone()),
            remark: Some(self.remark.clone()),
            favorite: self.favorite,
            created_at: None,
            updated_at: None,
        };

        let ingredients = self
            .ingredients
            .iter()
            .map(|row| Ingredient {
                id: row.id,
                recipe_id: self.recipe_id,
                name: row.name.clone(),
                quantity: Some(row.quantity.clone()),
                arrange: row.arrange,
            })
            .collect();

        let instructions = self
            .instructions
            .iter()
            .map(|row| Instruction {
                id: row.id,
                recipe_id: self.recipe_id,
                step_number: row.step_number as i32,
                content: row.content.clone(),
                arrange: row.arrange,
            })
            .collect();

        RecipeDetail {
            recipe,
            ingredients,
            instructions,
        }
    }

    /// 用已保存的菜谱填充表单（编辑页面）
    ///
    /// 保留各行 ID 以便服务端更新原有记录；步骤按步骤号排序
    pub fn from_recipe_detail(detail: &RecipeDetail) -> Self {
        let recipe = &detail.recipe;
        let mut form = Self {
            recipe_id: recipe.id,
            name: recipe.name.clone(),
            recipe_source: recipe.recipe_source.clone().unwrap_or_default(),
            servings: recipe.servings.clone().unwrap_or_default(),
            remark: recipe.remark.clone().unwrap_or_default(),
            favorite: recipe.favorite,
            image_path: recipe.image_path.clone().filter(|p| !p.is_empty()),
            image: None,
            ingredients: detail
                .ingredients
                .iter()
                .map(|i| IngredientRow {
                    id: i.id,
                    name: i.name.clone(),
                    quantity: i.quantity.clone().unwrap_or_default(),
                    arrange: i.arrange,
                })
                .collect(),
            instructions: detail
                .ordered_instructions()
                .into_iter()
                .map(|i| InstructionRow {
                    id: i.id,
                    step_number: 0,
                    content: i.content.clone(),
                    arrange: i.arrange,
                })
                .collect(),
        };
        form.renumber_steps();
        form.ensure_initial_rows();
        form
    }
}

fn check_removable(kind: RowKind, index: usize, len: usize) -> Result<(), FormError> {
    if index >= len {
        return Err(FormError::RowOutOfRange { kind, index, len });
    }
    if len <= 1 {
        return Err(FormError::LastRow { kind });
    }
    Ok(())
}

fn is_checked(value: &str) -> bool {
    !matches!(value.trim().to_ascii_lowercase().as_str(), "" | "false" | "off" | "0")
}
