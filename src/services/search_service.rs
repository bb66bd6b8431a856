//! 菜谱检索
//!
//! 把检索表单的输入规范化为查询参数，或转换为带类型的检索条件

use chrono::NaiveDate;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::{FieldError, RecipeSearchCriteria};

/// 日期无法解析时的提示
pub const DATE_FORMAT_MESSAGE: &str = "日付はyyyy-mm-ddの形式で入力してください";

/// 检索表单
///
/// 字段顺序与页面上的输入框顺序一致
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchForm {
    /// 菜谱名，空格分隔多个关键词
    pub recipe_names: String,
    /// 材料名，空格分隔多个关键词
    pub ingredient_names: String,
    pub favorite_recipe: bool,
    pub create_date_from: String,
    pub create_date_to: String,
    pub update_date_from: String,
    pub update_date_to: String,
}

impl SearchForm {
    fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("recipeNames", self.recipe_names.clone()),
            ("ingredientNames", self.ingredient_names.clone()),
            (
                "favoriteRecipe",
                if self.favorite_recipe { "on" } else { "" }.to_string(),
            ),
            ("createDateFrom", self.create_date_from.clone()),
            ("createDateTo", self.create_date_to.clone()),
            ("updateDateFrom", self.update_date_from.clone()),
            ("updateDateTo", self.update_date_to.clone()),
        ]
    }
}

/// 连续空白（含全角空格）合并为一个半角空格并去掉首尾空白
pub fn normalize_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 检索表单 → 查询参数
///
/// - 空值跳过
/// - `favoriteRecipe` 勾选时为 `true`
/// - `recipeNames` / `ingredientNames` 按空格拆分为重复键
/// - 其他值去掉首尾空白
pub fn to_query(form: &SearchForm) -> Vec<(String, String)> {
    let mut params = Vec::new();

    for (key, value) in form.entries() {
        if value.trim().is_empty() {
            continue;
        }
        match key {
            "favoriteRecipe" => params.push((key.to_string(), "true".to_string())),
            "recipeNames" | "ingredientNames" => {
                for word in normalize_whitespace(&value).split(' ') {
                    params.push((key.to_string(), word.to_string()));
                }
            }
            _ => params.push((key.to_string(), value.trim().to_string())),
        }
    }

    debug!("检索参数: {:?}", params);
    params
}

/// 检索表单 → 检索条件
///
/// 日期格式错误或范围颠倒时返回 `AppError::Validation`，字段名为查询参数名
pub fn to_criteria(form: &SearchForm) -> AppResult<RecipeSearchCriteria> {
    let mut errors = Vec::new();
    let mut parse_date = |key: &str, value: &str| -> Option<NaiveDate> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                errors.push(FieldError::new(key, DATE_FORMAT_MESSAGE));
                None
            }
        }
    };

    let create_date_from = parse_date("createDateFrom", &form.create_date_from);
    let create_date_to = parse_date("createDateTo", &form.create_date_to);
    let update_date_from = parse_date("updateDateFrom", &form.update_date_from);
    let update_date_to = parse_date("updateDateTo", &form.update_date_to);

    let criteria = RecipeSearchCriteria {
        recipe_names: split_keywords(&form.recipe_names),
        favorite_recipe: form.favorite_recipe.then_some(true),
        create_date_from,
        create_date_to,
        update_date_from,
        update_date_to,
        ingredient_names: split_keywords(&form.ingredient_names),
    };

    errors.extend(criteria.validate_date_ranges());
    if !errors.is_empty() {
        return Err(AppError::validation(None, errors));
    }

    Ok(criteria)
}

fn split_keywords(value: &str) -> Vec<String> {
    value.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::search::DATE_RANGE_MESSAGE;

    #[test]
    fn test_normalize_whitespace_handles_full_width_space() {
        assert_eq!(normalize_whitespace("  卵\u{3000}\u{3000}砂糖 \t 塩 "), "卵 砂糖 塩");
        assert_eq!(normalize_whitespace("\u{3000}"), "");
    }

    #[test]
    fn test_to_query_splits_names_and_skips_blanks() {
        let form = SearchForm {
            recipe_names: "卵焼き\u{3000}味噌汁".to_string(),
            ingredient_names: "   ".to_string(),
            favorite_recipe: true,
            create_date_from: " 2024-01-01 ".to_string(),
            ..Default::default()
        };

        let query = to_query(&form);
        let expected: Vec<(String, String)> = [
            ("recipeNames", "卵焼き"),
            ("recipeNames", "味噌汁"),
            ("favoriteRecipe", "true"),
            ("createDateFrom", "2024-01-01"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        assert_eq!(query, expected);
    }

    #[test]
    fn test_empty_form_yields_empty_query() {
        assert!(to_query(&SearchForm::default()).is_empty());
        assert!(to_criteria(&SearchForm::default()).unwrap().is_empty());
    }

    #[test]
    fn test_to_criteria_rejects_reversed_range() {
        let form = SearchForm {
            update_date_from: "2024-05-10".to_string(),
            update_date_to: "2024-05-01".to_string(),
            ..Default::default()
        };

        match to_criteria(&form) {
            Err(AppError::Validation(failure)) => {
                assert_eq!(failure.errors.len(), 1);
                assert_eq!(failure.errors[0].field, "updateDateTo");
                assert_eq!(failure.errors[0].message, DATE_RANGE_MESSAGE);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_to_criteria_reports_bad_date_format() {
        let form = SearchForm {
            create_date_from: "2024/01/01".to_string(),
            ..Default::default()
        };

        match to_criteria(&form) {
            Err(AppError::Validation(failure)) => {
                assert_eq!(failure.errors[0].field, "createDateFrom");
                assert_eq!(failure.errors[0].message, DATE_FORMAT_MESSAGE);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_to_criteria_matches_query() {
        let form = SearchForm {
            ingredient_names: "鶏肉 卵".to_string(),
            create_date_to: "2024-12-31".to_string(),
            ..Default::default()
        };
        let criteria = to_criteria(&form).unwrap();
        assert_eq!(criteria.ingredient_names, vec!["鶏肉", "卵"]);
        assert_eq!(criteria.to_query_pairs(), to_query(&form));
    }
}
