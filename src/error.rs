use thiserror::Error;

use crate::models::FieldError;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// API 调用错误
    #[error("API错误: {0}")]
    Api(#[from] ApiError),
    /// 服务端或客户端校验失败（可映射回表单字段）
    #[error("校验错误: {0}")]
    Validation(ValidationFailure),
    /// 认证 / CSRF 相关错误
    #[error("认证错误: {0}")]
    Auth(#[from] AuthError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// API 调用错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 网络请求失败
    #[error("API请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// API 返回错误响应
    #[error("API返回错误响应 ({endpoint}): status={status}, message={message:?}")]
    BadResponse {
        endpoint: String,
        status: u16,
        message: Option<String>,
    },
    /// 资源不存在（404）
    #[error("资源不存在 ({endpoint}): {message}")]
    NotFound { endpoint: String, message: String },
    /// 路径 ID 与请求体 ID 不一致
    #[error("路径ID {path_id} 与请求体中的ID {body_id} 不一致")]
    IdMismatch { path_id: i32, body_id: i32 },
    /// URL 构造失败
    #[error("无效的URL: {url}")]
    InvalidUrl { url: String },
    /// JSON 解析失败
    #[error("JSON解析失败: {source}")]
    JsonParseFailed {
        #[source]
        source: serde_json::Error,
    },
}

/// 校验失败详情
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationFailure {
    /// 整体提示信息（可能为空）
    pub message: Option<String>,
    /// 字段级错误，字段名为服务端或表单的字段路径
    pub errors: Vec<FieldError>,
}

impl std::fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.message {
            Some(msg) => write!(f, "{} ({} 个字段错误)", msg, self.errors.len()),
            None => write!(f, "{} 个字段错误", self.errors.len()),
        }
    }
}

/// 认证错误
#[derive(Debug, Error)]
pub enum AuthError {
    /// 无法获取 CSRF 令牌
    #[error("无法获取CSRF令牌: {reason}")]
    CsrfUnavailable { reason: String },
    /// 游客登录失败
    #[error("游客登录失败: {message}")]
    GuestLoginFailed { message: String },
    /// 用户名或密码错误
    #[error("登录被拒绝: {username}")]
    LoginRejected { username: String },
    /// 未认证或无权限
    #[error("请求被拒绝 ({endpoint}): status={status}")]
    Forbidden { endpoint: String, status: u16 },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 文件不存在
    #[error("文件不存在: {path}")]
    NotFound { path: String },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 目录不存在
    #[error("目录不存在: {path}")]
    DirectoryNotFound { path: String },
    /// 图片超过大小限制
    #[error("画像ファイルは{}以下にしてください ({size} > {limit} bytes)", size_label(.limit))]
    ImageTooLarge { size: usize, limit: usize },
    /// 不是图片文件
    #[error("画像ファイルのみアップロード可能です ({mime})")]
    NotAnImage { mime: String },
    /// data URL 格式错误
    #[error("不正なデータ形式です: {reason}")]
    InvalidDataUrl { reason: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 基础 URL 无效
    #[error("无效的基础URL: {value}")]
    InvalidBaseUrl { value: String },
}

/// 表单中重复行的种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Ingredient,
    Instruction,
}

impl std::fmt::Display for RowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowKind::Ingredient => write!(f, "ingredient"),
            RowKind::Instruction => write!(f, "instruction"),
        }
    }
}

/// 表单操作错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    /// 最后一行不能删除
    #[error("{}", last_row_message(.kind))]
    LastRow { kind: RowKind },
    /// 行索引越界
    #[error("{kind} 行索引 {index} 超出范围 [0, {len})")]
    RowOutOfRange {
        kind: RowKind,
        index: usize,
        len: usize,
    },
}

/// 字节数 → `5MB` / `512KB` / `16B`
pub fn size_label(bytes: &usize) -> String {
    const KIB: usize = 1024;
    const MIB: usize = 1024 * 1024;
    match *bytes {
        b if b >= MIB && b % MIB == 0 => format!("{}MB", b / MIB),
        b if b >= KIB && b % KIB == 0 => format!("{}KB", b / KIB),
        b => format!("{}B", b),
    }
}

fn last_row_message(kind: &RowKind) -> &'static str {
    match kind {
        RowKind::Ingredient => "材料は最低1つ必要です",
        RowKind::Instruction => "手順は最低1つ必要です",
    }
}

// ========== 从常见错误类型转换 ==========

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Api(ApiError::JsonParseFailed { source: err })
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: String::new(),
            source: err,
        })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建API请求失败错误
    pub fn api_request_failed(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        AppError::Api(ApiError::RequestFailed {
            endpoint: endpoint.into(),
            source,
        })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建校验错误
    pub fn validation(message: Option<String>, errors: Vec<FieldError>) -> Self {
        AppError::Validation(ValidationFailure { message, errors })
    }

    /// 是否为 404
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::Api(ApiError::NotFound { .. }))
    }

    /// 面向用户的提示文本（优先使用服务端返回的 message）
    pub fn user_message(&self) -> String {
        match self {
            AppError::Api(ApiError::NotFound { message, .. }) => message.clone(),
            AppError::Api(ApiError::BadResponse {
                message: Some(message),
                ..
            }) => message.clone(),
            AppError::Validation(failure) => failure
                .message
                .clone()
                .unwrap_or_else(|| "入力内容に不備があります".to_string()),
            AppError::File(FileError::ImageTooLarge { limit, .. }) => {
                format!("画像ファイルは{}以下にしてください", size_label(limit))
            }
            AppError::File(FileError::NotAnImage { .. }) => {
                "画像ファイルのみアップロード可能です".to_string()
            }
            other => other.to_string(),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_row_message_is_user_facing() {
        let err = FormError::LastRow {
            kind: RowKind::Instruction,
        };
        assert_eq!(err.to_string(), "手順は最低1つ必要です");
    }

    #[test]
    fn test_user_message_prefers_server_message() {
        let err = AppError::Api(ApiError::NotFound {
            endpoint: "/api/recipes/999".to_string(),
            message: "レシピID「999」は存在しません".to_string(),
        });
        assert!(err.is_not_found());
        assert_eq!(err.user_message(), "レシピID「999」は存在しません");
    }

    #[test]
    fn test_validation_display_counts_fields() {
        let err = AppError::validation(
            Some("入力エラー".to_string()),
            vec![FieldError::new("recipe.name", "レシピ名は必須です")],
        );
        assert_eq!(err.to_string(), "校验错误: 入力エラー (1 个字段错误)");
    }

    #[test]
    fn test_image_limit_message_follows_configured_limit() {
        let err = AppError::File(FileError::ImageTooLarge {
            size: 3 * 1024 * 1024,
            limit: 2 * 1024 * 1024,
        });
        assert_eq!(err.user_message(), "画像ファイルは2MB以下にしてください");

        let err = FileError::ImageTooLarge {
            size: 72,
            limit: 32,
        };
        assert!(err.to_string().starts_with("画像ファイルは32B以下にしてください"));
        assert_eq!(size_label(&(5 * 1024 * 1024)), "5MB");
        assert_eq!(size_label(&(512 * 1024)), "512KB");
    }
}
