pub mod draft;
pub mod error_response;
pub mod loaders;
pub mod recipe;
pub mod search;

pub use draft::{DraftIngredient, DraftInstruction, RecipeDraft};
pub use error_response::{ErrorResponse, FieldError, MessageResponse};
pub use loaders::{load_all_drafts, load_draft};
pub use recipe::{Ingredient, Instruction, Recipe, RecipeDetail, RecipeDetailWithImageData};
pub use search::RecipeSearchCriteria;
