//! 页面流程层
//!
//! 每个页面一个结构体：调用服务、把结果渲染进 `PageView`

pub mod detail_page;
pub mod list_page;
pub mod page_view;
pub mod recipe_form_page;

pub use detail_page::DetailPage;
pub use list_page::ListPage;
pub use page_view::{regions, PageView};
pub use recipe_form_page::RecipeFormPage;
