//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 持有传输层与服务（RecipeService / SubmissionService / AuthService）
//! - 把命令行子命令分派给页面流程
//!
//! ### `batch_importer` - 批量导入
//! - 加载草稿目录中的全部 TOML
//! - Semaphore 控制并发，分批提交
//! - 汇总统计
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator (App / BatchImporter)
//!     ↓
//! workflow (ListPage / DetailPage / RecipeFormPage)
//!     ↓
//! services (recipe / submission / search / auth)
//!     ↓
//! infrastructure (ApiTransport + CsrfStore)
//! ```

pub mod app;
pub mod batch_importer;

pub use app::App;
pub use batch_importer::{import_draft, BatchImporter, DraftOutcome, ImportStats};
