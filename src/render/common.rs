//! 各页面共用的片段

use chrono::{Datelike, NaiveDateTime};
use maud::{html, Markup};

/// 列表读取失败且没有具体原因时的提示
pub const DEFAULT_LIST_ERROR: &str = "レシピの取得に失敗しました。再度お試しください。";

/// 日期显示为 `YYYY/M/D`（不补零），缺失时为空串
pub fn format_date(value: Option<&NaiveDateTime>) -> String {
    match value {
        Some(dt) => format!("{}/{}/{}", dt.year(), dt.month(), dt.day()),
        None => String::new(),
    }
}

pub fn render_loading() -> Markup {
    html! {
        div.loading { "読み込み中..." }
    }
}

/// 错误提示框，`message` 为空白时使用默认提示
pub fn render_error(message: &str) -> Markup {
    let message = if message.trim().is_empty() {
        DEFAULT_LIST_ERROR
    } else {
        message
    };
    html! {
        div.alert.alert-danger role="alert" { (message) }
    }
}

/// 件数显示
pub fn render_count(count: usize) -> String {
    format!("全{}件", count)
}

pub fn render_toast(message: &str) -> Markup {
    html! {
        div class="position-fixed bottom-0 end-0 p-3" style="z-index: 5000" {
            div.toast.show role="alert" {
                div.toast-header {
                    strong class="me-auto" { "通知" }
                    button.btn-close type="button" data-bs-dismiss="toast" {}
                }
                div.toast-body { (message) }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_format_date_without_padding() {
        let dt = NaiveDate::from_ymd_opt(2024, 1, 5)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        assert_eq!(format_date(Some(&dt)), "2024/1/5");
        assert_eq!(format_date(None), "");
    }

    #[test]
    fn test_render_error_falls_back_to_default() {
        assert!(render_error("  ").into_string().contains(DEFAULT_LIST_ERROR));
        let html = render_error("<script>").into_string();
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("alert-danger"));
    }

    #[test]
    fn test_render_count_and_toast() {
        assert_eq!(render_count(12), "全12件");
        let html = render_toast("レシピを削除しました").into_string();
        assert!(html.contains("toast-body"));
        assert!(html.contains("レシピを削除しました"));
    }
}
