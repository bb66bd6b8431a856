//! 页面状态
//!
//! 页面上各区域当前的 HTML、弹出的提示、跳转目标

use std::collections::BTreeMap;

use maud::Markup;

use crate::render::render_toast;

/// 页面区域名（对应页面上的元素 ID）
pub mod regions {
    pub const RECIPE_CONTAINER: &str = "recipeContainer";
    pub const RECIPE_COUNT: &str = "recipeCount";
    pub const RECIPE_DETAIL: &str = "recipeDetail";
    pub const RECIPE_FORM: &str = "recipeForm";
    pub const TOAST: &str = "toastContainer";
}

/// 一个页面的可见状态
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageView {
    regions: BTreeMap<String, String>,
    toasts: Vec<String>,
    alerts: Vec<String>,
    modal_open: bool,
    redirect: Option<String>,
}

impl PageView {
    pub fn new() -> Self {
        Self::default()
    }

    /// 替换区域内容
    pub fn set_html(&mut self, region: &str, markup: Markup) {
        self.regions.insert(region.to_string(), markup.into_string());
    }

    pub fn set_text(&mut self, region: &str, text: impl Into<String>) {
        self.regions.insert(region.to_string(), text.into());
    }

    pub fn region(&self, region: &str) -> Option<&str> {
        self.regions.get(region).map(String::as_str)
    }

    /// 记录提示并渲染到 toast 区域（只显示最新一条）
    pub fn toast(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.set_html(regions::TOAST, render_toast(&message));
        self.toasts.push(message);
    }

    pub fn toasts(&self) -> &[String] {
        &self.toasts
    }

    pub fn alert(&mut self, message: impl Into<String>) {
        self.alerts.push(message.into());
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    /// 取出并清空提示（界面已展示）
    pub fn take_alerts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.alerts)
    }

    pub fn open_modal(&mut self) {
        self.modal_open = true;
    }

    pub fn close_modal(&mut self) {
        self.modal_open = false;
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal_open
    }

    pub fn redirect_to(&mut self, location: impl Into<String>) {
        self.redirect = Some(location.into());
    }

    pub fn redirect(&self) -> Option<&str> {
        self.redirect.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maud::html;

    #[test]
    fn test_regions_are_replaced() {
        let mut view = PageView::new();
        view.set_html(regions::RECIPE_CONTAINER, html! { p { "a" } });
        view.set_html(regions::RECIPE_CONTAINER, html! { p { "b" } });
        assert_eq!(view.region(regions::RECIPE_CONTAINER), Some("<p>b</p>"));
        assert_eq!(view.region(regions::RECIPE_COUNT), None);
    }

    #[test]
    fn test_alerts_are_taken_once() {
        let mut view = PageView::new();
        view.alert("削除に失敗しました。再度お試しください。");
        assert_eq!(view.take_alerts().len(), 1);
        assert!(view.alerts().is_empty());
    }

    #[test]
    fn test_toast_region_shows_latest_message() {
        let mut view = PageView::new();
        assert_eq!(view.region(regions::TOAST), None);
        view.toast("レシピを保存しました");
        view.toast("レシピを削除しました");
        let html = view.region(regions::TOAST).unwrap_or_default();
        assert!(html.contains("レシピを削除しました"));
        assert!(!html.contains("レシピを保存しました"));
        assert_eq!(view.toasts().len(), 2);
    }
}
