//! CSRF 令牌缓存
//!
//! 令牌与会话绑定：登录后会话切换，旧令牌必须作废

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// 表单登录时携带令牌的参数名
pub const CSRF_FORM_PARAM: &str = "_csrf";

/// `GET /csrf-token` 的响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsrfToken {
    pub token: String,
    pub header_name: String,
}

/// CSRF 令牌缓存
#[derive(Debug, Default)]
pub struct CsrfStore {
    enabled: bool,
    cached: Mutex<Option<CsrfToken>>,
}

impl CsrfStore {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            cached: Mutex::new(None),
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub async fn cached(&self) -> Option<CsrfToken> {
        self.cached.lock().await.clone()
    }

    pub async fn store(&self, token: CsrfToken) {
        *self.cached.lock().await = Some(token);
    }

    /// 作废缓存，下次变更请求前重新获取
    pub async fn invalidate(&self) {
        *self.cached.lock().await = None;
    }
}
