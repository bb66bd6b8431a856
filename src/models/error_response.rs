use serde::{Deserialize, Serialize};

/// 字段级错误
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// 服务端统一错误响应
///
/// `status` 为 `BAD_REQUEST` / `NOT_FOUND` 这类枚举名，
/// `errors` 只在参数校验失败时出现
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<Vec<FieldError>>,
}

impl ErrorResponse {
    /// 是否携带字段错误
    pub fn has_field_errors(&self) -> bool {
        self.errors.as_ref().is_some_and(|e| !e.is_empty())
    }
}

/// 游客登录 / 普通提示类响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_validation_error_response() {
        let body = r#"{
            "status": "BAD_REQUEST",
            "message": "入力エラー",
            "errors": [
                {"field": "recipeDetail.recipe.name", "message": "空白は許可されていません"}
            ]
        }"#;

        let resp: ErrorResponse = serde_json::from_str(body).unwrap();
        assert!(resp.has_field_errors());
        assert_eq!(resp.status.as_deref(), Some("BAD_REQUEST"));
    }

    #[test]
    fn test_not_found_response_has_no_field_errors() {
        let resp: ErrorResponse =
            serde_json::from_str(r#"{"status":"NOT_FOUND","message":"レシピID「999」は存在しません"}"#)
                .unwrap();
        assert!(!resp.has_field_errors());
    }
}
