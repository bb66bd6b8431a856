//! API 模块
//!
//! 后端接口路径定义

pub mod endpoints;

pub use endpoints::{pages, Endpoints};
