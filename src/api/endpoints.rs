//! 接口路径
//!
//! 同一套操作在两种路径风格下的地址

use crate::config::EndpointStyle;

pub const CSRF_TOKEN: &str = "/csrf-token";
pub const GUEST_LOGIN: &str = "/api/login/guest";
pub const LOGIN: &str = "/login";

/// 菜谱相关接口路径
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoints {
    style: EndpointStyle,
}

impl Endpoints {
    pub fn new(style: EndpointStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> EndpointStyle {
        self.style
    }

    fn root(&self) -> &'static str {
        match self.style {
            EndpointStyle::Legacy => "/recipes",
            EndpointStyle::Rest => "/api/recipes",
        }
    }

    /// 一览 / 检索
    pub fn list(&self) -> String {
        self.root().to_string()
    }

    pub fn detail(&self, id: i32) -> String {
        format!("{}/{}", self.root(), id)
    }

    pub fn create(&self) -> String {
        format!("{}/new", self.root())
    }

    pub fn update(&self, id: i32) -> String {
        format!("{}/{}/update", self.root(), id)
    }

    pub fn favorite(&self, id: i32) -> String {
        format!("{}/{}/favorite", self.root(), id)
    }

    pub fn delete(&self, id: i32) -> String {
        format!("{}/{}/delete", self.root(), id)
    }
}

/// 页面地址（卡片上的跳转链接）
pub mod pages {
    pub const LIST: &str = "/recipes.html";

    pub fn detail(id: i32) -> String {
        format!("/detail.html?id={}", id)
    }

    pub fn update(id: i32) -> String {
        format!("/update.html?id={}", id)
    }
}
