use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::FieldError;

/// 日期范围颠倒时的提示
pub const DATE_RANGE_MESSAGE: &str = "終了日が開始日より前の日付になっています";

/// 菜谱列表检索条件
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSearchCriteria {
    #[serde(default)]
    pub recipe_names: Vec<String>,
    #[serde(default)]
    pub favorite_recipe: Option<bool>,
    #[serde(default)]
    pub create_date_from: Option<NaiveDate>,
    #[serde(default)]
    pub create_date_to: Option<NaiveDate>,
    #[serde(default)]
    pub update_date_from: Option<NaiveDate>,
    #[serde(default)]
    pub update_date_to: Option<NaiveDate>,
    #[serde(default)]
    pub ingredient_names: Vec<String>,
}

impl RecipeSearchCriteria {
    /// 是否没有任何条件
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// 与服务端相同的日期范围校验：开始日晚于结束日时报错在 `*To` 字段上
    pub fn validate_date_ranges(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if let (Some(from), Some(to)) = (self.create_date_from, self.create_date_to) {
            if from > to {
                errors.push(FieldError::new("createDateTo", DATE_RANGE_MESSAGE));
            }
        }
        if let (Some(from), Some(to)) = (self.update_date_from, self.update_date_to) {
            if from > to {
                errors.push(FieldError::new("updateDateTo", DATE_RANGE_MESSAGE));
            }
        }
        errors
    }

    /// 转换为查询参数，列表值按重复键展开，顺序与检索表单一致
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for name in &self.recipe_names {
            pairs.push(("recipeNames".to_string(), name.clone()));
        }
        for name in &self.ingredient_names {
            pairs.push(("ingredientNames".to_string(), name.clone()));
        }
        if self.favorite_recipe == Some(true) {
            pairs.push(("favoriteRecipe".to_string(), "true".to_string()));
        }
        let dates = [
            ("createDateFrom", self.create_date_from),
            ("createDateTo", self.create_date_to),
            ("updateDateFrom", self.update_date_from),
            ("updateDateTo", self.update_date_to),
        ];
        for (key, date) in dates {
            if let Some(date) = date {
                pairs.push((key.to_string(), date.format("%Y-%m-%d").to_string()));
            }
        }
        pairs
    }
}
