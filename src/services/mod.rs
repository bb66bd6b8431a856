pub mod auth_service;
pub mod recipe_service;
pub mod search_service;
pub mod submission_service;

pub use auth_service::AuthService;
pub use recipe_service::RecipeService;
pub use search_service::{normalize_whitespace, to_criteria, to_query, SearchForm};
pub use submission_service::{SubmissionService, SubmitOutcome, SubmitTarget};
