//! Order handlers.
//!
//! Customers see and place their own orders and may cancel them while they
//! are pending. Admins see every order and drive fulfilment.

use std::collections::BTreeMap;

use chrono::Utc;
use emporium_engine::{EnvelopeStyle, Formatted, QueryParams, SortDirection};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::{find, notify, required_text, FilterParam, RangeParam, ResourceListing};
use crate::auth::AuthenticatedPrincipal;
use crate::error::{AppError, Result};
use crate::models::{Address, Order, OrderItem, OrderStatus, PaymentStatus, Product, Totals};
use crate::AppState;

pub const ORDER_LISTING: ResourceListing = ResourceListing {
    default_per_page: 10,
    max_per_page: 100,
    default_sort: ("created_at", SortDirection::Desc),
    search_fields: &["order_number"],
    timestamp_fields: &["created_at", "updated_at"],
    filters: &[
        FilterParam::text("status", "status"),
        FilterParam::text("payment_status", "payment_status"),
        FilterParam::number("product", "product_ids"),
    ],
    ranges: &[RangeParam {
        min: "min_total",
        max: "max_total",
        field: "total",
    }],
    style: EnvelopeStyle::Laravel,
};

#[derive(Debug, Deserialize)]
pub struct OrderLine {
    pub product_id: u64,
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrder {
    pub items: Vec<OrderLine>,
    pub shipping_address: Address,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Fields accepted on update. Only admins may set `payment_status` or move
/// an order anywhere other than `cancelled`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateOrder {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub shipping_address: Option<Address>,
    pub notes: Option<String>,
}

fn order_number() -> String {
    let id = Uuid::new_v4().simple().to_string().to_uppercase();
    format!("ORD-{}", &id[..10])
}

fn check_address(address: &Address) -> Result<()> {
    required_text("shipping address name", &address.name)?;
    required_text("shipping address line1", &address.line1)?;
    required_text("shipping address city", &address.city)?;
    required_text("shipping address country", &address.country)?;
    Ok(())
}

async fn visible_order(
    state: &AppState,
    principal: AuthenticatedPrincipal,
    id: u64,
) -> Result<Order> {
    let order = find(state.orders.as_ref(), id).await?;
    if !principal.can_access(order.user_id) {
        return Err(AppError::Forbidden);
    }
    Ok(order)
}

pub async fn list_orders(
    state: &AppState,
    principal: AuthenticatedPrincipal,
    params: &QueryParams,
    path: &str,
) -> Result<Formatted<Order>> {
    let mut orders = state.orders.all().await?;
    if !principal.is_admin() {
        orders.retain(|o| o.user_id == principal.id);
    }
    super::list_resource(&orders, params, &ORDER_LISTING, path)
}

pub async fn get_order(
    state: &AppState,
    principal: AuthenticatedPrincipal,
    id: u64,
) -> Result<Order> {
    visible_order(state, principal, id).await
}

/// Take `quantity` units of a product in one atomic step.
async fn reserve(state: &AppState, product_id: u64, quantity: u32) -> Result<Product> {
    let reserved = state
        .products
        .modify(
            product_id,
            Box::new(move |product: &mut Product| {
                if !product.is_purchasable() {
                    return Err(format!("Product {} is not available.", product.id));
                }
                if product.stock < i64::from(quantity) {
                    return Err(format!(
                        "Insufficient stock for {}. Only {} left.",
                        product.name, product.stock
                    ));
                }
                product.stock -= i64::from(quantity);
                product.updated_at = Utc::now();
                Ok(())
            }),
        )
        .await?;

    reserved.ok_or_else(|| {
        AppError::validation(format!("Product {} is not available.", product_id))
    })
}

/// Put `quantity` units back. A product deleted in the meantime is skipped.
async fn release(state: &AppState, product_id: u64, quantity: u32) -> Result<()> {
    let restocked = state
        .products
        .modify(
            product_id,
            Box::new(move |product: &mut Product| {
                product.stock += i64::from(quantity);
                product.updated_at = Utc::now();
                Ok(())
            }),
        )
        .await?;

    if restocked.is_none() {
        tracing::warn!(product_id, "cannot restock missing product");
    }
    Ok(())
}

/// Release every reservation of a failed order, logging what cannot be
/// undone.
async fn release_all(state: &AppState, reservations: &BTreeMap<u64, u32>) {
    for (&product_id, &quantity) in reservations {
        if let Err(e) = release(state, product_id, quantity).await {
            tracing::error!(product_id, quantity, error = %e, "failed to release reserved stock");
        }
    }
}

/// Place an order at current catalog prices, reserving stock.
///
/// Each product is checked and decremented atomically, so concurrent
/// orders never sell the same units twice. If any later step fails the
/// reservations already taken are released.
pub async fn create_order(
    state: &AppState,
    principal: AuthenticatedPrincipal,
    input: CreateOrder,
) -> Result<Order> {
    if input.items.is_empty() {
        return Err(AppError::validation("The order must contain at least one item."));
    }
    if input.items.iter().any(|line| line.quantity == 0) {
        return Err(AppError::validation("The quantity must be at least 1."));
    }
    check_address(&input.shipping_address)?;

    let mut wanted: BTreeMap<u64, u32> = BTreeMap::new();
    for line in &input.items {
        let total = wanted.entry(line.product_id).or_default();
        *total = total.saturating_add(line.quantity);
    }

    let mut reservations: BTreeMap<u64, u32> = BTreeMap::new();
    let mut products: BTreeMap<u64, Product> = BTreeMap::new();
    for (&product_id, &quantity) in &wanted {
        match reserve(state, product_id, quantity).await {
            Ok(product) => {
                reservations.insert(product_id, quantity);
                products.insert(product_id, product);
            }
            Err(e) => {
                release_all(state, &reservations).await;
                return Err(e);
            }
        }
    }

    let items: Vec<OrderItem> = input
        .items
        .iter()
        .filter_map(|line| {
            let product = products.get(&line.product_id)?;
            Some(OrderItem::new(
                product.id,
                &product.name,
                &product.sku,
                line.quantity,
                product.price,
            ))
        })
        .collect();

    let now = Utc::now();
    let totals = Totals::for_items(&items);
    let created = state
        .orders
        .create(Order {
            id: 0,
            order_number: order_number(),
            user_id: principal.id,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Unpaid,
            items,
            subtotal: totals.subtotal,
            tax: totals.tax,
            shipping: totals.shipping,
            total: totals.total,
            shipping_address: input.shipping_address,
            notes: input.notes,
            created_at: now,
            updated_at: now,
        })
        .await;

    let order = match created {
        Ok(order) => order,
        Err(e) => {
            release_all(state, &reservations).await;
            return Err(e.into());
        }
    };

    notify(
        state,
        order.user_id,
        "order",
        format!("Order {} placed", order.order_number),
        json!({ "order_id": order.id }),
    )
    .await?;

    tracing::info!(
        order_id = order.id,
        user_id = order.user_id,
        total = order.total,
        "order placed"
    );
    Ok(order)
}

async fn restock(state: &AppState, order: &Order) -> Result<()> {
    for item in &order.items {
        release(state, item.product_id, item.quantity).await?;
    }
    Ok(())
}

/// Whether the order's stock is still held by it, i.e. it has neither
/// shipped nor been cancelled.
fn holds_stock(status: OrderStatus) -> bool {
    matches!(status, OrderStatus::Pending | OrderStatus::Processing)
}

pub async fn update_order(
    state: &AppState,
    principal: AuthenticatedPrincipal,
    id: u64,
    input: UpdateOrder,
) -> Result<Order> {
    let mut order = visible_order(state, principal, id).await?;
    let previous = order.status;

    if !principal.is_admin() {
        if input.payment_status.is_some() {
            return Err(AppError::Forbidden);
        }
        if input.status.is_some_and(|s| s != OrderStatus::Cancelled) {
            return Err(AppError::Forbidden);
        }
        if previous != OrderStatus::Pending {
            return Err(AppError::validation("Only pending orders can be changed."));
        }
    }

    if let Some(address) = input.shipping_address {
        check_address(&address)?;
        order.shipping_address = address;
    }
    if input.notes.is_some() {
        order.notes = input.notes;
    }
    if let Some(payment_status) = input.payment_status {
        order.payment_status = payment_status;
    }
    if let Some(status) = input.status {
        if previous == OrderStatus::Cancelled && status != OrderStatus::Cancelled {
            return Err(AppError::validation("Cancelled orders cannot be reopened."));
        }
        order.status = status;
    }
    order.updated_at = Utc::now();

    // Commits only while the stored status is still `previous`.
    let order = state
        .orders
        .modify(
            id,
            Box::new(move |stored: &mut Order| {
                if stored.status != previous {
                    return Err("The order was changed by another request.".to_string());
                }
                *stored = order;
                Ok(())
            }),
        )
        .await?
        .ok_or_else(|| AppError::not_found("Order", id))?;

    if order.status != previous {
        if order.status == OrderStatus::Cancelled && holds_stock(previous) {
            restock(state, &order).await?;
        }
        notify(
            state,
            order.user_id,
            "order",
            format!(
                "Order {} is now {}",
                order.order_number,
                json!(order.status).as_str().unwrap_or_default()
            ),
            json!({ "order_id": order.id }),
        )
        .await?;
    }

    tracing::info!(order_id = id, status = ?order.status, "order updated");
    Ok(order)
}

/// Remove an order. Stock of an unshipped, uncancelled order is returned
/// to the catalog.
pub async fn delete_order(
    state: &AppState,
    principal: AuthenticatedPrincipal,
    id: u64,
) -> Result<()> {
    principal.require_admin()?;

    let order = find(state.orders.as_ref(), id).await?;
    if !state.orders.delete(id).await? {
        return Err(AppError::not_found("Order", id));
    }
    if holds_stock(order.status) {
        restock(state, &order).await?;
    }
    tracing::info!(order_id = id, "order deleted");
    Ok(())
}
