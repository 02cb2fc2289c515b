//! Product handlers.

use chrono::Utc;
use emporium_engine::{EnvelopeStyle, Formatted, QueryParams, SortDirection};
use serde::Deserialize;

use super::{find, required_text, save, FilterParam, RangeParam, ResourceListing};
use crate::auth::{AuthenticatedPrincipal, OptionalPrincipal};
use crate::error::{AppError, Result};
use crate::models::{round_money, slugify, Product, ProductStatus};
use crate::AppState;

pub const PRODUCT_LISTING: ResourceListing = ResourceListing {
    default_per_page: 15,
    max_per_page: 100,
    default_sort: ("id", SortDirection::Asc),
    search_fields: &["name", "description", "sku"],
    timestamp_fields: &["created_at", "updated_at"],
    filters: &[
        FilterParam::text("status", "status"),
        FilterParam::number("category", "category_ids"),
        FilterParam::boolean("is_active", "is_active"),
    ],
    ranges: &[RangeParam {
        min: "min_price",
        max: "max_price",
        field: "price",
    }],
    style: EnvelopeStyle::Laravel,
};

/// Fields accepted on create and update. Absent fields keep their value.
#[derive(Debug, Default, Deserialize)]
pub struct ProductInput {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub compare_at_price: Option<f64>,
    pub stock: Option<i64>,
    pub status: Option<ProductStatus>,
    pub is_active: Option<bool>,
    pub category_ids: Option<Vec<u64>>,
    pub images: Option<Vec<String>>,
}

/// Products visible to the viewer. Inactive products are admin-only.
pub async fn list_products(
    state: &AppState,
    viewer: OptionalPrincipal,
    params: &QueryParams,
    path: &str,
) -> Result<Formatted<Product>> {
    let mut products = state.products.all().await?;
    if !viewer.is_admin() {
        products.retain(|p| p.is_active);
    }
    super::list_resource(&products, params, &PRODUCT_LISTING, path)
}

pub async fn get_product(state: &AppState, viewer: OptionalPrincipal, id: u64) -> Result<Product> {
    let product = find(state.products.as_ref(), id).await?;
    if !product.is_active && !viewer.is_admin() {
        return Err(AppError::not_found("Product", id));
    }
    Ok(product)
}

fn check_money(field: &str, amount: f64) -> Result<f64> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(AppError::validation(format!(
            "The {} must be a non-negative amount.",
            field
        )));
    }
    Ok(round_money(amount))
}

async fn check_sku(state: &AppState, sku: &str, except: Option<u64>) -> Result<()> {
    let taken = state
        .products
        .all()
        .await?
        .iter()
        .any(|p| Some(p.id) != except && p.sku.eq_ignore_ascii_case(sku));
    if taken {
        return Err(AppError::validation("The sku has already been taken."));
    }
    Ok(())
}

async fn check_categories(state: &AppState, ids: &[u64]) -> Result<()> {
    for id in ids {
        if state.categories.get(*id).await?.is_none() {
            return Err(AppError::validation(format!(
                "The selected category {} is invalid.",
                id
            )));
        }
    }
    Ok(())
}

pub async fn create_product(
    state: &AppState,
    principal: AuthenticatedPrincipal,
    input: ProductInput,
) -> Result<Product> {
    principal.require_admin()?;

    let name = required_text("name", input.name.as_deref().unwrap_or_default())?;
    let sku = required_text("sku", input.sku.as_deref().unwrap_or_default())?;
    let price = input
        .price
        .ok_or_else(|| AppError::validation("The price field is required."))
        .and_then(|p| check_money("price", p))?;
    let compare_at_price = input
        .compare_at_price
        .map(|p| check_money("compare at price", p))
        .transpose()?;
    let stock = input.stock.unwrap_or_default();
    if stock < 0 {
        return Err(AppError::validation("The stock must be at least 0."));
    }
    let category_ids = input.category_ids.unwrap_or_default();

    check_sku(state, &sku, None).await?;
    check_categories(state, &category_ids).await?;

    let status = input.status.unwrap_or_default();
    let now = Utc::now();
    let product = state
        .products
        .create(Product {
            id: 0,
            slug: slugify(&name),
            name,
            sku,
            description: input.description,
            price,
            compare_at_price,
            stock,
            status,
            is_active: input.is_active.unwrap_or(status == ProductStatus::Active),
            category_ids,
            images: input.images.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        })
        .await?;

    tracing::info!(product_id = product.id, sku = %product.sku, "product created");
    Ok(product)
}

pub async fn update_product(
    state: &AppState,
    principal: AuthenticatedPrincipal,
    id: u64,
    input: ProductInput,
) -> Result<Product> {
    principal.require_admin()?;

    let mut product = find(state.products.as_ref(), id).await?;

    if let Some(name) = input.name {
        product.name = required_text("name", &name)?;
        product.slug = slugify(&product.name);
    }
    if let Some(sku) = input.sku {
        let sku = required_text("sku", &sku)?;
        check_sku(state, &sku, Some(id)).await?;
        product.sku = sku;
    }
    if input.description.is_some() {
        product.description = input.description;
    }
    if let Some(price) = input.price {
        product.price = check_money("price", price)?;
    }
    if let Some(price) = input.compare_at_price {
        product.compare_at_price = Some(check_money("compare at price", price)?);
    }
    if let Some(stock) = input.stock {
        if stock < 0 {
            return Err(AppError::validation("The stock must be at least 0."));
        }
        product.stock = stock;
    }
    if let Some(status) = input.status {
        product.status = status;
    }
    if let Some(is_active) = input.is_active {
        product.is_active = is_active;
    }
    if let Some(category_ids) = input.category_ids {
        check_categories(state, &category_ids).await?;
        product.category_ids = category_ids;
    }
    if let Some(images) = input.images {
        product.images = images;
    }
    product.updated_at = Utc::now();

    let product = save(state.products.as_ref(), product).await?;
    tracing::info!(product_id = id, "product updated");
    Ok(product)
}

pub async fn delete_product(
    state: &AppState,
    principal: AuthenticatedPrincipal,
    id: u64,
) -> Result<()> {
    principal.require_admin()?;

    if !state.products.delete(id).await? {
        return Err(AppError::not_found("Product", id));
    }
    tracing::info!(product_id = id, "product deleted");
    Ok(())
}
