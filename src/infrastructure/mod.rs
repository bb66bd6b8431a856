//! 基础设施层
//!
//! 持有稀缺资源（HTTP Client 与会话），只暴露能力

pub mod csrf;
pub mod http_client;

pub use csrf::{CsrfStore, CsrfToken};
pub use http_client::{ApiTransport, PartSpec, Payload};
