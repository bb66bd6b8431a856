//! 登录
//!
//! 登录成功后会话切换，CSRF 令牌随之重新获取

use std::sync::Arc;

use reqwest::Method;
use tracing::{info, warn};

use crate::api::endpoints::{GUEST_LOGIN, LOGIN};
use crate::error::{AppError, AppResult, AuthError};
use crate::infrastructure::{ApiTransport, Payload};
use crate::models::MessageResponse;

/// 登录服务
#[derive(Debug, Clone)]
pub struct AuthService {
    transport: Arc<ApiTransport>,
}

impl AuthService {
    pub fn new(transport: Arc<ApiTransport>) -> Self {
        Self { transport }
    }

    /// 游客登录，返回服务端的提示信息
    pub async fn guest_login(&self) -> AppResult<String> {
        let response: MessageResponse = self
            .transport
            .send_json(Method::POST, GUEST_LOGIN, &Payload::Empty)
            .await
            .map_err(|e| {
                warn!("游客登录失败: {}", e);
                AppError::Auth(AuthError::GuestLoginFailed {
                    message: e.user_message(),
                })
            })?;

        info!("✓ 游客登录成功: {}", response.message);
        self.transport.refresh_csrf().await?;
        Ok(response.message)
    }

    /// 表单登录
    ///
    /// 服务端以重定向表示结果，最终地址为 `/login?error` 时视为失败
    pub async fn login(&self, username: &str, password: &str) -> AppResult<()> {
        let payload = Payload::Form(vec![
            ("username".to_string(), username.to_string()),
            ("password".to_string(), password.to_string()),
        ]);

        let response = self
            .transport
            .execute(Method::POST, LOGIN, &[], &payload)
            .await?;

        if is_login_error_url(response.url()) {
            warn!("登录被拒绝: {}", username);
            return Err(AuthError::LoginRejected {
                username: username.to_string(),
            }
            .into());
        }

        info!("✓ 登录成功: {}", username);
        self.transport.refresh_csrf().await?;
        Ok(())
    }
}

fn is_login_error_url(url: &url::Url) -> bool {
    url.path().ends_with(LOGIN) && url.query_pairs().any(|(key, _)| key == "error")
}
