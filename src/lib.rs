//! # Recipe Notebook Client
//!
//! 菜谱笔记应用的客户端逻辑：检索、详情、新建 / 编辑 / 删除、收藏、图片上传
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有唯一的 HTTP Client 与会话 Cookie
//! - `ApiTransport` - 附加 CSRF 令牌、403 时刷新重试、错误响应转换
//!
//! ### ② 业务能力层（Services）
//! - `RecipeService` - 菜谱接口（两种路径风格、两种图片提交方式）
//! - `SubmissionService` - 校验 → 图片检查 → 提交 → 错误映射
//! - `search_service` - 检索表单规范化
//! - `AuthService` - 游客登录 / 表单登录
//!
//! ### ③ 流程层（Workflow）
//! - `ListPage` / `DetailPage` / `RecipeFormPage` - 页面操作，结果渲染进 `PageView`
//!
//! ### ④ 编排层（Orchestration）
//! - `App` - 命令行子命令分派
//! - `BatchImporter` - TOML 草稿批量导入
//!
//! 表单模型（`form`）与 HTML 渲染（`render`）不依赖网络，可单独使用。

pub mod api;
pub mod config;
pub mod error;
pub mod form;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod render;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::{Config, EndpointStyle, ImageMode};
pub use error::{AppError, AppResult};
pub use form::{RecipeForm, ValidationErrors};
pub use infrastructure::ApiTransport;
pub use models::{Recipe, RecipeDetail};
pub use orchestrator::{App, BatchImporter};
pub use services::{RecipeService, SubmissionService, SubmitOutcome, SubmitTarget};
pub use workflow::{DetailPage, ListPage, PageView, RecipeFormPage};
