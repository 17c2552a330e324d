use super::AppState;
use super::error::{Result, WebError};
use crate::model::{AddItemRequest, BagItem, Order, OrderForm, Product, ProductForm};
use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuantityBody {
    pub bag_item_id: String,
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteItemParams {
    pub bag_item_id: String,
}

pub async fn get_bag(State(state): State<AppState>) -> Json<Vec<BagItem>> {
    let repo = state.repo.read().await;
    Json(repo.bag_snapshot())
}

pub async fn add_to_bag(
    State(state): State<AppState>,
    Json(request): Json<AddItemRequest>,
) -> Result<Json<BagItem>> {
    request.validate()?;

    let mut repo = state.repo.write().await;
    let item = repo
        .add_bag_item(&request)
        .ok_or_else(|| WebError::NotFound("unknown product variant".to_string()))?;

    info!(item = %item.id, product = %item.product_id, "added item to bag");
    Ok(Json(item))
}

pub async fn update_quantity(
    State(state): State<AppState>,
    Json(body): Json<UpdateQuantityBody>,
) -> Result<Json<BagItem>> {
    if body.bag_item_id.is_empty() || body.quantity < 1 {
        return Err(WebError::Input("invalid input".to_string()));
    }

    let mut repo = state.repo.write().await;
    let updated = repo
        .update_quantity(&body.bag_item_id, body.quantity)
        .ok_or_else(|| WebError::NotFound(format!("item '{}' not found", body.bag_item_id)))?;

    Ok(Json(updated))
}

pub async fn delete_item(
    State(state): State<AppState>,
    Query(params): Query<DeleteItemParams>,
) -> Result<StatusCode> {
    if params.bag_item_id.is_empty() {
        return Err(WebError::Input("bagItemId is required".to_string()));
    }

    let mut repo = state.repo.write().await;
    if !repo.remove_item(&params.bag_item_id) {
        return Err(WebError::NotFound(format!(
            "item '{}' not found",
            params.bag_item_id
        )));
    }

    Ok(StatusCode::OK)
}

pub async fn create_order(
    State(state): State<AppState>,
    Json(form): Json<OrderForm>,
) -> Result<(StatusCode, Json<Order>)> {
    form.validate()?;

    let mut repo = state.repo.write().await;
    let order = repo.create_order(form);

    info!(order = %order.id, "order placed");
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn list_products(State(state): State<AppState>) -> Json<Vec<Product>> {
    let repo = state.repo.read().await;
    Json(repo.active_products())
}

pub async fn create_product(
    State(state): State<AppState>,
    Json(form): Json<ProductForm>,
) -> Result<(StatusCode, Json<Product>)> {
    form.validate()?;

    let mut repo = state.repo.write().await;
    let product = repo.create_product(form);

    info!(product = %product.id, sku = %product.form.sku, "product created");
    Ok((StatusCode::CREATED, Json(product)))
}
