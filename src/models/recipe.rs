use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 菜谱
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[serde(default)]
    pub id: i32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub recipe_source: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub servings: Option<String>,
    #[serde(default)]
    pub remark: Option<String>,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDateTime>,
}

/// 材料
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    #[serde(default)]
    pub id: i32,
    #[serde(default)]
    pub recipe_id: i32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quantity: Option<String>,
    #[serde(default)]
    pub arrange: bool,
}

/// 烹饪步骤
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instruction {
    #[serde(default)]
    pub id: i32,
    #[serde(default)]
    pub recipe_id: i32,
    #[serde(default, deserialize_with = "deserialize_lenient_i32")]
    pub step_number: i32,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub arrange: bool,
}

/// 菜谱详情：菜谱 + 材料列表 + 步骤列表
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDetail {
    pub recipe: Recipe,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub instructions: Vec<Instruction>,
}

impl RecipeDetail {
    /// 按步骤号排序后的步骤
    pub fn ordered_instructions(&self) -> Vec<&Instruction> {
        let mut steps: Vec<&Instruction> = self.instructions.iter().collect();
        steps.sort_by_key(|i| i.step_number);
        steps
    }
}

/// JSON 提交时附带 Base64 图片的菜谱详情
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDetailWithImageData {
    pub recipe_detail: RecipeDetail,
    /// `data:<mime>;base64,<payload>`，无图片时为 null
    pub image_data: Option<String>,
}

// 表单里的数字输入框提交的是字符串，服务端回传的是数字，两种都要接受
fn deserialize_lenient_i32<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Visitor;
    use std::fmt;

    struct StepVisitor;

    impl<'de> Visitor<'de> for StepVisitor {
        type Value = i32;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a step number as string or integer")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Ok(0);
            }
            trimmed.parse().map_err(E::custom)
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            i32::try_from(value).map_err(E::custom)
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            i32::try_from(value).map_err(E::custom)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(0)
        }
    }

    deserializer.deserialize_any(StepVisitor)
}

fn deserialize_lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Visitor;
    use std::fmt;

    struct ServingsVisitor;

    impl<'de> Visitor<'de> for ServingsVisitor {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string, an integer or null")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(None)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(None)
        }
    }

    deserializer.deserialize_any(ServingsVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_server_detail() {
        let value = json!({
            "recipe": {
                "id": 1,
                "name": "卵焼き",
                "imagePath": "/uploads/egg.png",
                "recipeSource": "https://example.com",
                "servings": "2",
                "remark": "",
                "favorite": true,
                "createdAt": "2024-09-22T17:00:00",
                "updatedAt": "2024-12-03T18:00:00"
            },
            "ingredients": [
                {"id": 1, "recipeId": 1, "name": "卵", "quantity": "3個", "arrange": false}
            ],
            "instructions": [
                {"id": 2, "recipeId": 1, "stepNumber": 2, "content": "焼く", "arrange": false},
                {"id": 1, "recipeId": 1, "stepNumber": 1, "content": "卵を割る", "arrange": false}
            ]
        });

        let detail: RecipeDetail = serde_json::from_value(value).unwrap();
        assert_eq!(detail.recipe.name, "卵焼き");
        assert!(detail.recipe.favorite);
        assert_eq!(detail.recipe.servings.as_deref(), Some("2"));
        assert!(detail.recipe.created_at.is_some());

        let steps = detail.ordered_instructions();
        assert_eq!(steps[0].content, "卵を割る");
        assert_eq!(steps[1].content, "焼く");
    }

    #[test]
    fn test_step_number_accepts_string() {
        let step: Instruction =
            serde_json::from_value(json!({"stepNumber": "3", "content": "煮る"})).unwrap();
        assert_eq!(step.step_number, 3);
    }

    #[test]
    fn test_servings_accepts_integer() {
        let recipe: Recipe = serde_json::from_value(json!({"name": "カレー", "servings": 4})).unwrap();
        assert_eq!(recipe.servings.as_deref(), Some("4"));
    }

    #[test]
    fn test_image_data_serializes_as_null() {
        let payload = RecipeDetailWithImageData {
            recipe_detail: RecipeDetail::default(),
            image_data: None,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert!(value["imageData"].is_null());
        assert!(value["recipeDetail"]["recipe"].get("createdAt").is_none());
    }
}
