//! 菜谱详情（只读）

use maud::{html, Markup};

use crate::models::RecipeDetail;
use crate::render::common::format_date;
use crate::render::list::favorite_icon;

pub fn render_detail(detail: &RecipeDetail) -> Markup {
    let recipe = &detail.recipe;
    let image = recipe.image_path.as_deref().filter(|p| !p.is_empty());
    let (icon, favorite_class) = favorite_icon(recipe.favorite);
    let text = |value: &Option<String>| value.clone().unwrap_or_default();

    html! {
        div.recipe-detail data-id=(recipe.id) {
            h2.recipe-name {
                span class=(favorite_class) { (icon) }
                " "
                (recipe.name)
            }
            @if let Some(src) = image {
                div.recipe-image {
                    img.img-fit-contain src=(src) alt=(recipe.name);
                }
            }
            dl.recipe-meta {
                dt { "レシピの出典" }
                dd { (text(&recipe.recipe_source)) }
                dt { "何人前" }
                dd { (text(&recipe.servings)) }
                dt { "備考" }
                dd { (text(&recipe.remark)) }
            }

            h3 { "材料" }
            table.table.ingredients {
                thead {
                    tr {
                        th { "材料名" }
                        th { "分量" }
                        th {}
                    }
                }
                tbody {
                    @for ingredient in &detail.ingredients {
                        tr {
                            td { (ingredient.name) }
                            td { (ingredient.quantity.as_deref().unwrap_or_default()) }
                            td {
                                @if ingredient.arrange {
                                    span class="badge bg-secondary" { "アレンジ" }
                                }
                            }
                        }
                    }
                }
            }

            h3 { "作り方" }
            ol.instructions {
                @for step in detail.ordered_instructions() {
                    li data-step=(step.step_number) {
                        (step.content)
                        @if step.arrange {
                            " "
                            span class="badge bg-secondary" { "アレンジ" }
                        }
                    }
                }
            }

            p.text-muted {
                small {
                    "作成日: " (format_date(recipe.created_at.as_ref()))
                    br;
                    "更新日: " (format_date(recipe.updated_at.as_ref()))
                }
            }
        }
    }
}
