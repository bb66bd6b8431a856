//! 编辑表单的行片段与字段错误

use maud::{html, Markup};

use crate::error::RowKind;
use crate::form::{
    IngredientRow, InstructionRow, RecipeField, RecipeForm, RowAttr, RowField, ValidationErrors,
};

fn row_name(kind: RowKind, attr: RowAttr, index: usize) -> String {
    RowField::new(kind, attr, index).to_string()
}

fn input_class(base: &str, field: &str, errors: &ValidationErrors) -> String {
    if errors.get(field).is_some() {
        format!("{} is-invalid", base)
    } else {
        base.to_string()
    }
}

/// 输入框下方的错误提示
pub fn render_field_error(field: &str, errors: &ValidationErrors) -> Markup {
    html! {
        @if let Some(message) = errors.get(field) {
            div class="text-danger mt-1" data-error-for=(field) { (message) }
        }
    }
}

/// 材料行，`index` 从 1 开始
pub fn render_ingredient_row(index: usize, row: &IngredientRow, errors: &ValidationErrors) -> Markup {
    let name = row_name(RowKind::Ingredient, RowAttr::Name, index);
    let quantity = row_name(RowKind::Ingredient, RowAttr::Quantity, index);
    let arrange = row_name(RowKind::Ingredient, RowAttr::Arrange, index);

    html! {
        div class="ingredient mb-3 row" {
            div class="col-md-5" {
                input class=(input_class("form-control", &name, errors)) type="text"
                    name=(name) value=(row.name) placeholder="材料名（必須）";
                (render_field_error(&name, errors))
            }
            div class="col-md-3" {
                input.form-control type="text" name=(quantity) value=(row.quantity) placeholder="分量";
            }
            div class="col-md-2" {
                div.form-check {
                    input.form-check-input type="checkbox" name=(arrange) checked[row.arrange];
                    label.form-check-label { "アレンジ" }
                }
            }
            div class="col-md-2" {
                button type="button" class="btn btn-danger btn-sm remove-ingredient" { "削除" }
            }
        }
    }
}

/// 步骤行，步骤号只读
pub fn render_instruction_row(index: usize, row: &InstructionRow, errors: &ValidationErrors) -> Markup {
    let step = row_name(RowKind::Instruction, RowAttr::StepNumber, index);
    let content = row_name(RowKind::Instruction, RowAttr::Content, index);
    let arrange = row_name(RowKind::Instruction, RowAttr::Arrange, index);

    html! {
        div class="instruction mb-3 row" {
            div class="col-md-2" {
                input.form-control type="number" name=(step) value=(row.step_number()) readonly;
            }
            div class="col-md-6" {
                textarea class=(input_class("form-control", &content, errors))
                    name=(content) placeholder="手順内容（必須）" { (row.content) }
                (render_field_error(&content, errors))
            }
            div class="col-md-2" {
                div.form-check {
                    input.form-check-input type="checkbox" name=(arrange) checked[row.arrange];
                    label.form-check-label { "アレンジ" }
                }
            }
            div class="col-md-2" {
                button type="button" class="btn btn-danger btn-sm remove-instruction" { "削除" }
            }
        }
    }
}

/// 整个编辑表单
pub fn render_recipe_form(form: &RecipeForm, errors: &ValidationErrors) -> Markup {
    let name_key = RecipeField::Name.error_key();

    html! {
        form #newRecipeForm novalidate {
            @for message in errors.form_level() {
                div class="alert alert-danger" role="alert" { (message) }
            }
            div.mb-3 {
                label.form-label for="name" { "レシピ名" }
                input #name class=(input_class("form-control", &name_key, errors)) type="text"
                    name=(name_key) value=(form.name);
                (render_field_error(&name_key, errors))
            }
            div.mb-3 {
                label.form-label for="recipeSource" { "レシピの出典" }
                input #recipeSource.form-control type="text" name="recipeSource" value=(form.recipe_source);
            }
            div.mb-3 {
                label.form-label for="servings" { "何人前" }
                input #servings.form-control type="text" name="servings" value=(form.servings);
            }
            div.mb-3 {
                label.form-label for="remark" { "備考" }
                textarea #remark.form-control name="remark" { (form.remark) }
            }
            div class="form-check mb-3" {
                input #favorite.form-check-input type="checkbox" name="favorite" checked[form.favorite];
                label.form-check-label for="favorite" { "お気に入り" }
            }
            div.mb-3 {
                label.form-label for="imageFile" { "画像" }
                @if let Some(path) = &form.image_path {
                    div.current-image { img.img-fit-contain src=(path) alt=(form.name); }
                }
                input #imageFile.form-control type="file" name="imageFile" accept="image/*";
            }

            h4 { "材料" }
            div #ingredientsContainer {
                @for (position, row) in form.ingredients().iter().enumerate() {
                    (render_ingredient_row(position + 1, row, errors))
                }
            }
            button #addIngredient type="button" class="btn btn-secondary btn-sm" { "材料を追加" }

            h4 { "作り方" }
            div #instructionsContainer {
                @for (position, row) in form.instructions().iter().enumerate() {
                    (render_instruction_row(position + 1, row, errors))
                }
            }
            button #addInstruction type="button" class="btn btn-secondary btn-sm" { "手順を追加" }

            button type="submit" class="btn btn-primary" { "保存" }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::validation::INGREDIENT_NAME_REQUIRED;
    use crate::models::FieldError;

    #[test]
    fn test_instruction_row_carries_readonly_step_number() {
        let mut form = RecipeForm::new();
        form.add_instruction_row();
        let html = render_instruction_row(2, &form.instructions()[1], &ValidationErrors::new())
            .into_string();
        assert!(html.contains("name=\"instruction.stepNumber.2\""));
        assert!(html.contains("value=\"2\""));
        assert!(html.contains("readonly"));
        assert!(html.contains("name=\"instruction.content.2\""));
    }

    #[test]
    fn test_field_error_is_rendered_next_to_input() {
        let form = RecipeForm::new();
        let errors = ValidationErrors::from_client(&[FieldError::new(
            "ingredient.name.1",
            INGREDIENT_NAME_REQUIRED,
        )]);
        let html = render_ingredient_row(1, &form.ingredients()[0], &errors).into_string();
        assert!(html.contains("data-error-for=\"ingredient.name.1\""));
        assert!(html.contains("form-control is-invalid"));
        assert!(html.contains(INGREDIENT_NAME_REQUIRED));
    }

    #[test]
    fn test_full_form_lists_every_row_field() {
        let mut form = RecipeForm::new();
        form.add_ingredient_row();
        form.ingredient_mut(1).unwrap().arrange = true;
        let html = render_recipe_form(&form, &ValidationErrors::new()).into_string();

        for name in form.field_names() {
            assert!(html.contains(&format!("name=\"{}\"", name)), "missing {}", name);
        }
        assert!(html.contains("checked"));
    }
}
