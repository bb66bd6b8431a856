use std::str::FromStr;

use crate::error::ConfigError;

/// 接口路径风格
///
/// 早期版本使用 `/recipes/...`，后续版本统一迁移到 `/api/recipes/...`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndpointStyle {
    Legacy,
    Rest,
}

impl FromStr for EndpointStyle {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(EndpointStyle::Legacy),
            "rest" | "api" => Ok(EndpointStyle::Rest),
            _ => Err(parse_error("ENDPOINT_STYLE", s, "legacy|rest")),
        }
    }
}

/// 图片提交方式
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageMode {
    /// JSON 请求体中携带 Base64 data URL
    Json,
    /// multipart/form-data，`recipeDetail` + `imageFile`
    Multipart,
}

impl FromStr for ImageMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" | "base64" => Ok(ImageMode::Json),
            "multipart" => Ok(ImageMode::Multipart),
            _ => Err(parse_error("IMAGE_MODE", s, "json|multipart")),
        }
    }
}

fn parse_error(var_name: &str, value: &str, expected_type: &str) -> ConfigError {
    ConfigError::EnvVarParseFailed {
        var_name: var_name.to_string(),
        value: value.to_string(),
        expected_type: expected_type.to_string(),
    }
}

/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 后端地址
    pub base_url: String,
    /// 接口路径风格
    pub endpoint_style: EndpointStyle,
    /// 图片提交方式
    pub image_mode: ImageMode,
    /// 是否在变更请求中附带 CSRF 令牌
    pub csrf_enabled: bool,
    /// 启动时是否执行游客登录
    pub guest_login: bool,
    /// 上传图片大小上限（字节）
    pub max_image_bytes: usize,
    /// 请求超时（秒）
    pub request_timeout_secs: u64,
    // --- 批量导入 ---
    /// 同时提交的草稿数量
    pub max_concurrent_imports: usize,
    /// 草稿 TOML 文件存放目录
    pub draft_folder: String,
    /// 导入成功后是否删除草稿文件
    pub remove_imported: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            endpoint_style: EndpointStyle::Rest,
            image_mode: ImageMode::Json,
            csrf_enabled: true,
            guest_login: false,
            max_image_bytes: 5 * 1024 * 1024,
            request_timeout_secs: 30,
            max_concurrent_imports: 4,
            draft_folder: "recipe_drafts".to_string(),
            remove_imported: false,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从环境变量读取配置，无法解析的值回退为默认值
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            base_url: std::env::var("BASE_URL").unwrap_or(default.base_url),
            endpoint_style: std::env::var("ENDPOINT_STYLE").ok().and_then(|v| v.parse().ok()).unwrap_or(default.endpoint_style),
            image_mode: std::env::var("IMAGE_MODE").ok().and_then(|v| v.parse().ok()).unwrap_or(default.image_mode),
            csrf_enabled: std::env::var("CSRF_ENABLED").ok().and_then(|v| v.parse().ok()).unwrap_or(default.csrf_enabled),
            guest_login: std::env::var("GUEST_LOGIN").ok().and_then(|v| v.parse().ok()).unwrap_or(default.guest_login),
            max_image_bytes: std::env::var("MAX_IMAGE_BYTES").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_image_bytes),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
            max_concurrent_imports: std::env::var("MAX_CONCURRENT_IMPORTS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_concurrent_imports),
            draft_folder: std::env::var("DRAFT_FOLDER").unwrap_or(default.draft_folder),
            remove_imported: std::env::var("REMOVE_IMPORTED").ok().and_then(|v| v.parse().ok()).unwrap_or(default.remove_imported),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }

    /// 指向给定后端的配置，其余保持默认
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}
