//! 测试用的假后端
//!
//! 在 127.0.0.1 的随机端口上启动 axum 服务，模拟菜谱接口、CSRF 令牌和登录

#![allow(dead_code)]

use std::sync::{Arc, Mutex, MutexGuard};

use axum::body::Bytes;
use axum::extract::{Path, RawQuery, State};
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{json, Value};

use recipe_notebook_client::models::{
    Ingredient, Instruction, Recipe, RecipeDetail, RecipeDetailWithImageData,
};
use recipe_notebook_client::Config;

pub const CSRF_HEADER: &str = "X-CSRF-TOKEN";
pub const REJECTED_INGREDIENT: &str = "NG";
pub const REJECTED_MESSAGE: &str = "使用できない材料名です";

/// 后端收到的一次请求
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub csrf: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

/// 后端状态
#[derive(Debug, Default)]
pub struct Backend {
    pub recipes: Vec<RecipeDetail>,
    pub next_id: i32,
    pub next_row_id: i32,
    pub token: String,
    pub token_serial: u32,
    pub token_fetches: usize,
    pub requests: Vec<Recorded>,
    pub fail_favorite: bool,
    pub logged_in: Option<String>,
}

pub type Shared = Arc<Mutex<Backend>>;

impl Backend {
    pub fn new() -> Self {
        let mut backend = Self {
            next_id: 1,
            next_row_id: 1000,
            ..Default::default()
        };
        backend.rotate_token();
        backend
    }

    /// 会话切换或令牌过期
    pub fn rotate_token(&mut self) {
        self.token_serial += 1;
        self.token = format!("token-{}", self.token_serial);
    }

    pub fn seed(&mut self, name: &str, favorite: bool) -> i32 {
        let id = self.next_id;
        self.next_id += 1;
        self.recipes.push(RecipeDetail {
            recipe: Recipe {
                id,
                name: name.to_string(),
                favorite,
                servings: Some("2".to_string()),
                image_path: Some(format!("/uploads/{}.png", id)),
                created_at: Some(timestamp(2024, 1, 5)),
                updated_at: Some(timestamp(2024, 2, 10)),
                ..Default::default()
            },
            ingredients: vec![Ingredient {
                id: id * 10,
                recipe_id: id,
                name: "卵".to_string(),
                quantity: Some("2個".to_string()),
                arrange: false,
            }],
            instructions: vec![Instruction {
                id: id * 10,
                recipe_id: id,
                step_number: 1,
                content: "焼く".to_string(),
                arrange: false,
            }],
        });
        id
    }

    pub fn recipe(&self, id: i32) -> Option<&RecipeDetail> {
        self.recipes.iter().find(|d| d.recipe.id == id)
    }

    /// 除 GET 以外的请求
    pub fn mutations(&self) -> Vec<&Recorded> {
        self.requests.iter().filter(|r| r.method != "GET").collect()
    }

    pub fn last_request(&self, method: &str) -> Option<&Recorded> {
        self.requests.iter().rev().find(|r| r.method == method)
    }

    fn row_id(&mut self) -> i32 {
        let id = self.next_row_id;
        self.next_row_id += 1;
        id
    }

    /// ID 为 0 的行视为新行并分配 ID
    fn assign_row_ids(&mut self, detail: &mut RecipeDetail) {
        let recipe_id = detail.recipe.id;
        for row in &mut detail.ingredients {
            row.recipe_id = recipe_id;
            if row.id == 0 {
                row.id = self.row_id();
            }
        }
        for row in &mut detail.instructions {
            row.recipe_id = recipe_id;
            if row.id == 0 {
                row.id = self.row_id();
            }
        }
    }
}

pub fn timestamp(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(9, 0, 0))
        .unwrap()
}

/// 启动假后端，返回地址和共享状态
pub async fn spawn(backend: Backend) -> (String, Shared) {
    let shared: Shared = Arc::new(Mutex::new(backend));
    let app = router(shared.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", address), shared)
}

pub fn config(base_url: &str) -> Config {
    Config::with_base_url(base_url)
}

pub fn lock(shared: &Shared) -> MutexGuard<'_, Backend> {
    shared.lock().unwrap()
}

fn router(shared: Shared) -> Router {
    Router::new()
        .route("/csrf-token", get(csrf_token))
        .route("/api/recipes", get(list))
        .route("/recipes", get(list))
        .route("/api/recipes/new", post(create))
        .route("/api/recipes/:id", get(detail))
        .route("/api/recipes/:id/update", put(update))
        .route("/api/recipes/:id/favorite", put(favorite))
        .route("/api/recipes/:id/delete", delete(remove))
        .route("/api/login/guest", post(guest_login))
        .route("/login", get(login_page).post(login))
        .route("/recipes.html", get(list_page))
        .with_state(shared)
}

// ========== 辅助函数 ==========

/// 按实际收到的方法和 URI 记录请求
fn record(backend: &mut Backend, method: &Method, uri: &Uri, headers: &HeaderMap, body: &[u8]) {
    let header_text = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    backend.requests.push(Recorded {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: parse_pairs(uri.query().unwrap_or_default().as_bytes()),
        csrf: header_text(CSRF_HEADER),
        content_type: header_text(header::CONTENT_TYPE.as_str()),
        body: String::from_utf8_lossy(body).to_string(),
    });
}

fn parse_pairs(raw: &[u8]) -> Vec<(String, String)> {
    url::form_urlencoded::parse(raw)
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn csrf_ok(backend: &Backend, headers: &HeaderMap) -> bool {
    headers.get(CSRF_HEADER).and_then(|v| v.to_str().ok()) == Some(backend.token.as_str())
}

fn forbidden() -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({"status": "FORBIDDEN", "message": "Invalid CSRF token"})),
    )
        .into_response()
}

fn not_found(id: i32) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "status": "NOT_FOUND",
            "message": format!("レシピID「{}」は存在しません", id)
        })),
    )
        .into_response()
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"status": "BAD_REQUEST", "message": message})),
    )
        .into_response()
}

/// 取出 multipart 中 `recipeDetail` 部分的 JSON
fn multipart_json(body: &str) -> Option<&str> {
    let start = body.find("name=\"recipeDetail\"")?;
    let rest = &body[start..];
    let json_start = rest.find("\r\n\r\n")? + 4;
    let rest = &rest[json_start..];
    let end = rest.find("\r\n--")?;
    Some(&rest[..end])
}

/// 请求体 → (菜谱详情, 是否带图片)
fn decode_submission(headers: &HeaderMap, body: &[u8]) -> Result<(RecipeDetail, bool), Response> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if content_type.starts_with("multipart/form-data") {
        let text = String::from_utf8_lossy(body);
        let json = multipart_json(&text).ok_or_else(|| bad_request("recipeDetail がありません"))?;
        let detail: RecipeDetail =
            serde_json::from_str(json).map_err(|e| bad_request(&e.to_string()))?;
        Ok((detail, text.contains("name=\"imageFile\"")))
    } else {
        let payload: RecipeDetailWithImageData =
            serde_json::from_slice(body).map_err(|e| bad_request(&e.to_string()))?;
        let has_image = payload.image_data.is_some();
        Ok((payload.recipe_detail, has_image))
    }
}

/// 更新时引用了不属于该菜谱的行 ID
fn reject_unknown_rows(existing: &RecipeDetail, detail: &RecipeDetail) -> Option<Response> {
    let unknown_ingredient = detail
        .ingredients
        .iter()
        .map(|i| i.id)
        .find(|&id| id != 0 && !existing.ingredients.iter().any(|e| e.id == id));
    let unknown_instruction = detail
        .instructions
        .iter()
        .map(|i| i.id)
        .find(|&id| id != 0 && !existing.instructions.iter().any(|e| e.id == id));

    let message = match (unknown_ingredient, unknown_instruction) {
        (Some(id), _) => format!("材料ID「{}」は存在しません", id),
        (None, Some(id)) => format!("調理手順ID「{}」は存在しません", id),
        (None, None) => return None,
    };
    Some(
        (
            StatusCode::NOT_FOUND,
            Json(json!({"status": "NOT_FOUND", "message": message})),
        )
            .into_response(),
    )
}

fn reject_bad_ingredients(detail: &RecipeDetail) -> Option<Response> {
    let errors: Vec<Value> = detail
        .ingredients
        .iter()
        .enumerate()
        .filter(|(_, i)| i.name == REJECTED_INGREDIENT)
        .map(|(index, _)| {
            json!({
                "field": format!("recipeDetail.ingredients[{}].name", index),
                "message": REJECTED_MESSAGE
            })
        })
        .collect();

    if errors.is_empty() {
        return None;
    }
    Some(
        (
            StatusCode::BAD_REQUEST,
            Json(json!({"status": "BAD_REQUEST", "message": "入力エラー", "errors": errors})),
        )
            .into_response(),
    )
}

// ========== 处理函数 ==========

async fn csrf_token(State(shared): State<Shared>) -> Response {
    let mut backend = lock(&shared);
    backend.token_fetches += 1;
    Json(json!({"token": backend.token, "headerName": CSRF_HEADER})).into_response()
}

async fn list(
    State(shared): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Response {
    let mut backend = lock(&shared);
    record(&mut backend, &method, &uri, &headers, &[]);

    let pairs = parse_pairs(query.unwrap_or_default().as_bytes());
    let names: Vec<&str> = pairs
        .iter()
        .filter(|(k, _)| k == "recipeNames")
        .map(|(_, v)| v.as_str())
        .collect();
    let favorite_only = pairs
        .iter()
        .any(|(k, v)| k == "favoriteRecipe" && v == "true");

    let found: Vec<RecipeDetail> = backend
        .recipes
        .iter()
        .filter(|d| names.is_empty() || names.iter().any(|n| d.recipe.name.contains(n)))
        .filter(|d| !favorite_only || d.recipe.favorite)
        .cloned()
        .collect();
    Json(found).into_response()
}

async fn detail(
    State(shared): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Response {
    let mut backend = lock(&shared);
    record(&mut backend, &method, &uri, &headers, &[]);
    match backend.recipe(id) {
        Some(detail) => Json(detail.clone()).into_response(),
        None => not_found(id),
    }
}

async fn create(
    State(shared): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let mut backend = lock(&shared);
    record(&mut backend, &method, &uri, &headers, &body);
    if !csrf_ok(&backend, &headers) {
        return forbidden();
    }

    let (mut detail, has_image) = match decode_submission(&headers, &body) {
        Ok(decoded) => decoded,
        Err(response) => return response,
    };
    if let Some(response) = reject_bad_ingredients(&detail) {
        return response;
    }

    let id = backend.next_id;
    backend.next_id += 1;
    detail.recipe.id = id;
    if has_image {
        detail.recipe.image_path = Some(format!("/uploads/{}.png", id));
    }
    detail.recipe.created_at = Some(timestamp(2024, 6, 1));
    detail.recipe.updated_at = Some(timestamp(2024, 6, 1));
    backend.assign_row_ids(&mut detail);
    backend.recipes.push(detail.clone());

    (StatusCode::CREATED, Json(detail)).into_response()
}

async fn update(
    State(shared): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Path(id): Path<i32>,
    body: Bytes,
) -> Response {
    let mut backend = lock(&shared);
    record(&mut backend, &method, &uri, &headers, &body);
    if !csrf_ok(&backend, &headers) {
        return forbidden();
    }

    let (mut detail, has_image) = match decode_submission(&headers, &body) {
        Ok(decoded) => decoded,
        Err(response) => return response,
    };
    if detail.recipe.id != id {
        return bad_request("IDが一致しません");
    }
    if let Some(response) = reject_bad_ingredients(&detail) {
        return response;
    }

    let Some(position) = backend.recipes.iter().position(|d| d.recipe.id == id) else {
        return not_found(id);
    };
    if let Some(response) = reject_unknown_rows(&backend.recipes[position], &detail) {
        return response;
    }

    // 请求里没有的行视为删除，图片未重新上传时沿用请求中的路径
    if has_image {
        detail.recipe.image_path = Some(format!("/uploads/{}-updated.png", id));
    }
    detail.recipe.created_at = backend.recipes[position].recipe.created_at;
    detail.recipe.updated_at = Some(timestamp(2024, 7, 1));
    backend.assign_row_ids(&mut detail);
    backend.recipes[position] = detail.clone();

    Json(detail).into_response()
}

async fn favorite(
    State(shared): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Path(id): Path<i32>,
    body: Bytes,
) -> Response {
    let mut backend = lock(&shared);
    record(&mut backend, &method, &uri, &headers, &body);
    if !csrf_ok(&backend, &headers) {
        return forbidden();
    }
    if backend.fail_favorite {
        return (StatusCode::INTERNAL_SERVER_ERROR, "error").into_response();
    }

    let value: Value = serde_json::from_slice(&body).unwrap_or_default();
    let Some(flag) = value["favorite"].as_bool() else {
        return bad_request("favorite がありません");
    };
    match backend.recipes.iter_mut().find(|d| d.recipe.id == id) {
        Some(detail) => {
            detail.recipe.favorite = flag;
            "お気に入りを変更しました".into_response()
        }
        None => not_found(id),
    }
}

async fn remove(
    State(shared): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Response {
    let mut backend = lock(&shared);
    record(&mut backend, &method, &uri, &headers, &[]);
    if !csrf_ok(&backend, &headers) {
        return forbidden();
    }

    let before = backend.recipes.len();
    backend.recipes.retain(|d| d.recipe.id != id);
    if backend.recipes.len() == before {
        return not_found(id);
    }
    "レシピを削除しました".into_response()
}

async fn guest_login(
    State(shared): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let mut backend = lock(&shared);
    record(&mut backend, &method, &uri, &headers, &[]);
    if !csrf_ok(&backend, &headers) {
        return forbidden();
    }
    backend.logged_in = Some("guest".to_string());
    backend.rotate_token();
    Json(json!({"message": "ログイン成功"})).into_response()
}

async fn login(
    State(shared): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let mut backend = lock(&shared);
    record(&mut backend, &method, &uri, &headers, &body);

    let fields = parse_pairs(&body);
    let field = |name: &str| {
        fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
            .unwrap_or_default()
    };
    if field("_csrf") != backend.token {
        return forbidden();
    }

    if field("password") == "secret" {
        backend.logged_in = Some(field("username"));
        backend.rotate_token();
        Redirect::to("/recipes.html").into_response()
    } else {
        Redirect::to("/login?error").into_response()
    }
}

async fn login_page() -> &'static str {
    "login"
}

async fn list_page() -> &'static str {
    "recipes"
}
