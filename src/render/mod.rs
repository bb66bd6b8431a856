//! HTML 片段渲染
//!
//! 只做 JSON → HTML，不发请求。插值文本一律由 maud 转义。

pub mod common;
pub mod detail;
pub mod form;
pub mod list;

pub use common::{format_date, render_count, render_error, render_loading, render_toast};
pub use detail::render_detail;
pub use form::{render_ingredient_row, render_instruction_row, render_recipe_form};
pub use list::{render_cards, render_favorite_button};
