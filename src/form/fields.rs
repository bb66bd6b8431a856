//! 表单字段名
//!
//! 重复行的字段名形如 `ingredient.name.3`、`instruction.stepNumber.1`，
//! 序号从 1 开始，与页面上 `name` 属性保持一致

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::RowKind;

/// 重复行里的一个字段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowField {
    pub kind: RowKind,
    pub attr: RowAttr,
    /// 从 1 开始
    pub index: usize,
}

/// 行字段属性
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAttr {
    Name,
    Quantity,
    StepNumber,
    Content,
    Arrange,
}

impl RowAttr {
    pub fn as_str(self) -> &'static str {
        match self {
            RowAttr::Name => "name",
            RowAttr::Quantity => "quantity",
            RowAttr::StepNumber => "stepNumber",
            RowAttr::Content => "content",
            RowAttr::Arrange => "arrange",
        }
    }

    fn parse(kind: RowKind, s: &str) -> Option<Self> {
        match (kind, s) {
            (RowKind::Ingredient, "name") => Some(RowAttr::Name),
            (RowKind::Ingredient, "quantity") => Some(RowAttr::Quantity),
            (RowKind::Instruction, "stepNumber") => Some(RowAttr::StepNumber),
            (RowKind::Instruction, "content") => Some(RowAttr::Content),
            (_, "arrange") => Some(RowAttr::Arrange),
            _ => None,
        }
    }
}

impl RowField {
    pub fn new(kind: RowKind, attr: RowAttr, index: usize) -> Self {
        Self { kind, attr, index }
    }

    /// 解析 `ingredient.name.3` 形式的字段名
    pub fn parse(name: &str) -> Option<Self> {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        let re = PATTERN.get_or_init(|| {
            Regex::new(r"^(ingredient|instruction)\.([A-Za-z]+)\.(\d+)$").expect("valid regex")
        });

        let caps = re.captures(name)?;
        let kind = match &caps[1] {
            "ingredient" => RowKind::Ingredient,
            _ => RowKind::Instruction,
        };
        let attr = RowAttr::parse(kind, &caps[2])?;
        let index: usize = caps[3].parse().ok()?;
        if index == 0 {
            return None;
        }
        Some(Self { kind, attr, index })
    }
}

impl fmt::Display for RowField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.kind, self.attr.as_str(), self.index)
    }
}

/// 菜谱本体字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeField {
    Name,
    RecipeSource,
    Servings,
    Remark,
    Favorite,
}

impl RecipeField {
    pub const ALL: [RecipeField; 5] = [
        RecipeField::Name,
        RecipeField::RecipeSource,
        RecipeField::Servings,
        RecipeField::Remark,
        RecipeField::Favorite,
    ];

    /// 页面元素 id
    pub fn id(self) -> &'static str {
        match self {
            RecipeField::Name => "name",
            RecipeField::RecipeSource => "recipeSource",
            RecipeField::Servings => "servings",
            RecipeField::Remark => "remark",
            RecipeField::Favorite => "favorite",
        }
    }

    /// 校验错误使用的字段名
    pub fn error_key(self) -> String {
        format!("recipe.{}", self.id())
    }

    /// 同时接受 `name` 与 `recipe.name`
    pub fn parse(name: &str) -> Option<Self> {
        let key = name.strip_prefix("recipe.").unwrap_or(name);
        Self::ALL.into_iter().find(|f| f.id() == key)
    }
}
