//! Orders and their line items.

use chrono::{DateTime, Utc};
use emporium_engine::Queryable;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::borrow::Cow;
use std::str::FromStr;

use super::{round_money, Entity};

/// Fulfilment state of an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(format!("unknown order status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    Paid,
    Refunded,
    Failed,
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unpaid" => Ok(PaymentStatus::Unpaid),
            "paid" => Ok(PaymentStatus::Paid),
            "refunded" => Ok(PaymentStatus::Refunded),
            "failed" => Ok(PaymentStatus::Failed),
            other => Err(format!("unknown payment status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Address {
    pub name: String,
    pub line1: String,
    #[serde(default)]
    pub line2: Option<String>,
    pub city: String,
    #[serde(default)]
    pub state: Option<String>,
    pub country: String,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub product_id: u64,
    pub name: String,
    pub sku: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub total: f64,
}

/// Sales tax applied to the subtotal.
pub const TAX_RATE: f64 = 0.075;

/// Flat shipping fee for orders below [`FREE_SHIPPING_THRESHOLD`].
pub const SHIPPING_FEE: f64 = 5.0;

pub const FREE_SHIPPING_THRESHOLD: f64 = 100.0;

/// Monetary totals of an order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    pub subtotal: f64,
    pub tax: f64,
    pub shipping: f64,
    pub total: f64,
}

impl Totals {
    pub fn for_items(items: &[OrderItem]) -> Self {
        let subtotal = round_money(items.iter().map(|i| i.total).sum());
        let tax = round_money(subtotal * TAX_RATE);
        let shipping = if subtotal >= FREE_SHIPPING_THRESHOLD || items.is_empty() {
            0.0
        } else {
            SHIPPING_FEE
        };

        Self {
            subtotal,
            tax,
            shipping,
            total: round_money(subtotal + tax + shipping),
        }
    }
}

impl OrderItem {
    pub fn new(product_id: u64, name: &str, sku: &str, quantity: u32, unit_price: f64) -> Self {
        Self {
            product_id,
            name: name.to_string(),
            sku: sku.to_string(),
            quantity,
            unit_price,
            total: round_money(unit_price * quantity as f64),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: u64,
    pub order_number: String,
    pub user_id: u64,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub items: Vec<OrderItem>,
    pub subtotal: f64,
    pub tax: f64,
    pub shipping: f64,
    pub total: f64,
    pub shipping_address: Address,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Order {
    const COLLECTION: &'static str = "orders";
    const NAME: &'static str = "Order";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }
}

impl Queryable for Order {
    fn field(&self, name: &str) -> Option<Cow<'_, Value>> {
        let value = match name {
            "id" => json!(self.id),
            "order_number" => json!(self.order_number),
            "user_id" => json!(self.user_id),
            "status" => json!(self.status),
            "payment_status" => json!(self.payment_status),
            "subtotal" => json!(self.subtotal),
            "total" => json!(self.total),
            "item_count" => json!(self.items.iter().map(|i| i.quantity as u64).sum::<u64>()),
            "product_ids" => json!(self.items.iter().map(|i| i.product_id).collect::<Vec<_>>()),
            "created_at" => json!(self.created_at),
            "updated_at" => json!(self.updated_at),
            _ => {
                let path = name.strip_prefix("shipping_address.")?;
                let address = serde_json::to_value(&self.shipping_address).ok()?;
                return emporium_engine::value::lookup_path(&address, path)
                    .cloned()
                    .map(Cow::Owned);
            }
        };
        Some(Cow::Owned(value))
    }
}
