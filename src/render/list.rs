//! 菜谱卡片列表

use maud::{html, Markup};

use crate::api::pages;
use crate::models::{Recipe, RecipeDetail};
use crate::render::common::format_date;

pub const FAVORITE_ACTIVE: &str = "favorite-active";
pub const FAVORITE_INACTIVE: &str = "favorite-inactive";

/// 收藏按钮的图标和样式类
pub fn favorite_icon(favorite: bool) -> (&'static str, &'static str) {
    if favorite {
        ("★", FAVORITE_ACTIVE)
    } else {
        ("☆", FAVORITE_INACTIVE)
    }
}

/// 收藏按钮（切换后单独重绘）
pub fn render_favorite_button(id: i32, favorite: bool) -> Markup {
    let (icon, class) = favorite_icon(favorite);
    html! {
        button class=(format!("favorite-button {}", class))
            onclick=(format!("toggleFavorite({})", id))
            data-id=(id)
            title="お気に入り切り替え" {
            (icon)
        }
    }
}

pub fn render_card(recipe: &Recipe) -> Markup {
    let image = recipe.image_path.as_deref().filter(|p| !p.is_empty());
    html! {
        div.col {
            div class="card h-100 position-relative" {
                (render_favorite_button(recipe.id, recipe.favorite))
                div.card-img-top {
                    @if let Some(src) = image {
                        img.img-fit-contain src=(src) alt=(recipe.name);
                    }
                }
                div.card-actions {
                    button.edit-button
                        onclick=(format!("location.href='{}'", pages::update(recipe.id)))
                        title="編集" { "✎" }
                    button.delete-button
                        onclick=(format!("confirmDelete({})", recipe.id))
                        title="削除" { "×" }
                }
                div.card-body {
                    h5.card-title { (recipe.name) }
                    p.card-text {
                        small.text-muted {
                            "作成日: " (format_date(recipe.created_at.as_ref()))
                            br;
                            "更新日: " (format_date(recipe.updated_at.as_ref()))
                        }
                    }
                    a class="btn btn-outline-primary" href=(pages::detail(recipe.id)) { "詳細" }
                }
            }
        }
    }
}

/// 每个菜谱一张卡片
pub fn render_cards(recipes: &[RecipeDetail]) -> Markup {
    html! {
        @for detail in recipes {
            (render_card(&detail.recipe))
        }
    }
}
