//! 表单校验
//!
//! 客户端校验规则与服务端 `@NotBlank` 约束保持一致，
//! 服务端返回的字段路径（`recipeDetail.ingredients[0].name`）
//! 会被映射回表单字段名（`ingredient.name.1`）

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::RowKind;
use crate::form::{RecipeField, RecipeForm, RowAttr, RowField};
use crate::models::FieldError;

pub const RECIPE_NAME_REQUIRED: &str = "レシピ名は必須です";
pub const INGREDIENT_NAME_REQUIRED: &str = "材料名は必須です";
pub const INSTRUCTION_CONTENT_REQUIRED: &str = "調理手順は必須です";

/// 客户端校验，返回的字段名为表单字段名
pub fn validate(form: &RecipeForm) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if form.name.trim().is_empty() {
        errors.push(FieldError::new(
            RecipeField::Name.error_key(),
            RECIPE_NAME_REQUIRED,
        ));
    }

    for (position, row) in form.ingredients().iter().enumerate() {
        if row.name.trim().is_empty() {
            errors.push(FieldError::new(
                RowField::new(RowKind::Ingredient, RowAttr::Name, position + 1).to_string(),
                INGREDIENT_NAME_REQUIRED,
            ));
        }
    }

    for (position, row) in form.instructions().iter().enumerate() {
        if row.content.trim().is_empty() {
            errors.push(FieldError::new(
                RowField::new(RowKind::Instruction, RowAttr::Content, position + 1).to_string(),
                INSTRUCTION_CONTENT_REQUIRED,
            ));
        }
    }

    errors
}

/// 服务端字段路径 → 表单字段名
///
/// 无法对应到具体输入框的字段返回 `None`，作为整体错误显示
pub fn map_server_field(field: &str) -> Option<String> {
    static ROW_PATTERN: OnceLock<Regex> = OnceLock::new();
    let re = ROW_PATTERN.get_or_init(|| {
        Regex::new(r"^(?:recipeDetail\.)?(ingredients|instructions)\[(\d+)\]\.([A-Za-z]+)$")
            .expect("valid regex")
    });

    let path = field.strip_prefix("recipeDetail.").unwrap_or(field);
    if let Some(name) = path.strip_prefix("recipe.") {
        return RecipeField::parse(name).map(RecipeField::error_key);
    }

    let caps = re.captures(field)?;
    let kind = match &caps[1] {
        "ingredients" => RowKind::Ingredient,
        _ => RowKind::Instruction,
    };
    let index: usize = caps[2].parse().ok()?;
    let attr = match (kind, &caps[3]) {
        (RowKind::Ingredient, "name") => RowAttr::Name,
        (RowKind::Ingredient, "quantity") => RowAttr::Quantity,
        (RowKind::Instruction, "content") => RowAttr::Content,
        (RowKind::Instruction, "stepNumber") => RowAttr::StepNumber,
        (_, "arrange") => RowAttr::Arrange,
        _ => return None,
    };
    Some(RowField::new(kind, attr, index + 1).to_string())
}

/// 表单上当前显示的校验错误
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<String, String>,
    form_level: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// 客户端校验结果（字段名已是表单字段名）
    pub fn from_client(errors: &[FieldError]) -> Self {
        let mut result = Self::new();
        for error in errors {
            result.display(Some(&error.field), &error.message);
        }
        result
    }

    /// 服务端校验结果，字段路径经 `map_server_field` 转换
    pub fn from_server(errors: &[FieldError]) -> Self {
        let mut result = Self::new();
        for error in errors {
            let field = map_server_field(&error.field);
            result.display(field.as_deref(), &error.message);
        }
        result
    }

    /// 显示一条错误；同一字段已有错误时替换
    pub fn display(&mut self, field: Option<&str>, message: &str) {
        match field {
            Some(field) => {
                self.fields.insert(field.to_string(), message.to_string());
            }
            None => self.form_level.push(message.to_string()),
        }
    }

    /// 输入框重新输入时移除该字段的错误
    pub fn clear_field(&mut self, field: &str) -> bool {
        self.fields.remove(field).is_some()
    }

    pub fn clear(&mut self) {
        self.fields.clear();
        self.form_level.clear();
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn form_level(&self) -> &[String] {
        &self.form_level
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.form_level.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len() + self.form_level.len()
    }
}
