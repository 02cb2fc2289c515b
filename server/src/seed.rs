//! Sample records loaded into empty collections at startup.

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::models::{
    slugify, Address, Category, Entity, Notification, Order, OrderItem, OrderStatus,
    PaymentStatus, Product, ProductStatus, Review, ReviewStatus, Role, Totals, User,
};
use crate::store::{Repository, Result};
use crate::AppState;

/// 2024-01-01T00:00:00Z
const EPOCH_2024: i64 = 1_704_067_200;

/// A fixed point in January 2024.
fn jan(day: i64, hour: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(EPOCH_2024 + (day - 1) * 86_400 + hour * 3_600, 0).unwrap_or_default()
}

/// Seed every collection that is still empty.
pub async fn seed(state: &AppState) -> Result<()> {
    seed_collection(state.users.as_ref(), users()).await?;
    seed_collection(state.categories.as_ref(), categories()).await?;
    seed_collection(state.products.as_ref(), products()).await?;
    seed_collection(state.orders.as_ref(), orders()).await?;
    seed_collection(state.reviews.as_ref(), reviews()).await?;
    seed_collection(state.notifications.as_ref(), notifications()).await?;
    Ok(())
}

async fn seed_collection<T: Entity>(repo: &dyn Repository<T>, items: Vec<T>) -> Result<()> {
    if repo.count().await? > 0 {
        tracing::debug!(collection = T::COLLECTION, "collection not empty, skipping seed");
        return Ok(());
    }

    let count = items.len();
    for item in items {
        repo.create(item).await?;
    }
    tracing::info!(collection = T::COLLECTION, count, "seeded collection");
    Ok(())
}

fn users() -> Vec<User> {
    let user = |name: &str, email: &str, role: Role, day: i64| User {
        id: 0,
        name: name.to_string(),
        email: email.to_string(),
        role,
        password_digest: User::digest_password("password"),
        created_at: jan(day, 9),
    };

    vec![
        user("Store Admin", "admin@emporium.test", Role::Admin, 1),
        user("Ada Obi", "ada@example.com", Role::Customer, 2),
        user("Tunde Bello", "tunde@example.com", Role::Customer, 3),
    ]
}

fn categories() -> Vec<Category> {
    let category = |name: &str, parent_id: Option<u64>, is_active: bool, sort_order: i64| {
        Category {
            id: 0,
            name: name.to_string(),
            slug: slugify(name),
            description: Some(format!("Browse our {} range", name.to_lowercase())),
            parent_id,
            is_active,
            sort_order,
            created_at: jan(1, sort_order),
            updated_at: jan(1, sort_order),
        }
    };

    vec![
        category("Electronics", None, true, 1),
        category("Phones", Some(1), true, 2),
        category("Fashion", None, true, 3),
        category("Shoes", Some(3), true, 4),
        category("Home & Kitchen", None, true, 5),
        category("Clearance", None, false, 6),
    ]
}

fn products() -> Vec<Product> {
    let rows: [(&str, &str, f64, i64, ProductStatus, &[u64]); 12] = [
        ("Wireless Earbuds", "EL-001", 49.99, 120, ProductStatus::Active, &[1]),
        ("Smartphone X", "PH-001", 699.0, 15, ProductStatus::Active, &[1, 2]),
        ("Phone Case", "PH-002", 12.5, 300, ProductStatus::Active, &[2]),
        ("Running Shoes", "SH-001", 89.9, 40, ProductStatus::Active, &[3, 4]),
        ("Leather Boots", "SH-002", 149.0, 0, ProductStatus::Active, &[3, 4]),
        ("Denim Jacket", "FA-001", 75.0, 25, ProductStatus::Draft, &[3]),
        ("Chef Knife", "HK-001", 39.95, 60, ProductStatus::Active, &[5]),
        ("Blender Pro", "HK-002", 120.0, 10, ProductStatus::Active, &[1, 5]),
        ("Coffee Mug", "HK-003", 8.99, 500, ProductStatus::Active, &[5]),
        ("USB-C Cable", "EL-002", 9.99, 800, ProductStatus::Active, &[1]),
        ("Vintage Radio", "EL-003", 59.0, 3, ProductStatus::Archived, &[1, 6]),
        ("Yoga Mat", "HK-004", 25.0, 75, ProductStatus::Active, &[5]),
    ];

    rows.iter()
        .zip(1i64..)
        .map(|((name, sku, price, stock, status, cats), day)| Product {
            id: 0,
            name: name.to_string(),
            slug: slugify(name),
            sku: sku.to_string(),
            description: Some(format!("{} from the Emporium catalog.", name)),
            price: *price,
            compare_at_price: (*price > 100.0).then(|| (*price * 1.2).round()),
            stock: *stock,
            status: *status,
            is_active: *status == ProductStatus::Active,
            category_ids: cats.to_vec(),
            images: vec![format!("/images/products/{}.jpg", slugify(name))],
            created_at: jan(day, 10),
            updated_at: jan(day, 10),
        })
        .collect()
}

fn orders() -> Vec<Order> {
    let address = |name: &str, city: &str| Address {
        name: name.to_string(),
        line1: "12 Marina Road".to_string(),
        line2: None,
        city: city.to_string(),
        state: None,
        country: "NG".to_string(),
        postal_code: Some("101001".to_string()),
        phone: None,
    };

    let order = |number: &str,
                 user_id: u64,
                 items: Vec<OrderItem>,
                 status: OrderStatus,
                 payment_status: PaymentStatus,
                 shipping_address: Address,
                 day: i64| {
        let totals = Totals::for_items(&items);
        Order {
            id: 0,
            order_number: number.to_string(),
            user_id,
            status,
            payment_status,
            items,
            subtotal: totals.subtotal,
            tax: totals.tax,
            shipping: totals.shipping,
            total: totals.total,
            shipping_address,
            notes: None,
            created_at: jan(day, 14),
            updated_at: jan(day, 14),
        }
    };

    vec![
        order(
            "ORD-1001",
            2,
            vec![
                OrderItem::new(1, "Wireless Earbuds", "EL-001", 1, 49.99),
                OrderItem::new(3, "Phone Case", "PH-002", 2, 12.5),
            ],
            OrderStatus::Delivered,
            PaymentStatus::Paid,
            address("Ada Obi", "Lagos"),
            10,
        ),
        order(
            "ORD-1002",
            2,
            vec![OrderItem::new(4, "Running Shoes", "SH-001", 1, 89.9)],
            OrderStatus::Pending,
            PaymentStatus::Unpaid,
            address("Ada Obi", "Lagos"),
            20,
        ),
        order(
            "ORD-1003",
            3,
            vec![OrderItem::new(2, "Smartphone X", "PH-001", 1, 699.0)],
            OrderStatus::Processing,
            PaymentStatus::Paid,
            address("Tunde Bello", "Abuja"),
            15,
        ),
        order(
            "ORD-1004",
            3,
            vec![OrderItem::new(9, "Coffee Mug", "HK-003", 4, 8.99)],
            OrderStatus::Cancelled,
            PaymentStatus::Refunded,
            address("Tunde Bello", "Abuja"),
            5,
        ),
    ]
}

fn reviews() -> Vec<Review> {
    let review = |product_id: u64,
                  user_id: u64,
                  rating: u8,
                  title: &str,
                  comment: &str,
                  status: ReviewStatus,
                  day: i64| Review {
        id: 0,
        product_id,
        user_id,
        rating,
        title: title.to_string(),
        comment: comment.to_string(),
        status,
        created_at: jan(day, 16),
        updated_at: jan(day, 16),
    };

    vec![
        review(1, 2, 5, "Great sound", "Crisp audio and the battery lasts all day.", ReviewStatus::Approved, 11),
        review(1, 3, 3, "Decent", "Good value, a little loose in the ear.", ReviewStatus::Approved, 12),
        review(2, 3, 4, "Fast phone", "Snappy, but the charger is sold separately.", ReviewStatus::Pending, 16),
        review(4, 2, 2, "Too small", "Runs a full size small.", ReviewStatus::Rejected, 21),
        review(3, 2, 5, "Fits perfectly", "Solid case, sound buttons.", ReviewStatus::Approved, 13),
        review(7, 3, 4, "Sharp", "Holds an edge well.", ReviewStatus::Pending, 14),
    ]
}

fn notifications() -> Vec<Notification> {
    let notification = |user_id: u64, kind: &str, title: &str, data: serde_json::Value, is_read: bool, day: i64| {
        Notification {
            id: 0,
            user_id,
            kind: kind.to_string(),
            title: title.to_string(),
            message: format!("{}.", title),
            data,
            is_read,
            read_at: is_read.then(|| jan(day, 18)),
            created_at: jan(day, 12),
        }
    };

    vec![
        notification(2, "order", "Your order ORD-1001 has shipped", json!({"order_id": 1}), true, 12),
        notification(2, "order", "Order ORD-1002 placed", json!({"order_id": 2}), false, 20),
        notification(2, "promotion", "Weekend sale on kitchenware", json!({"category_id": 5}), false, 18),
        notification(3, "order", "Order ORD-1003 is being processed", json!({"order_id": 3}), false, 15),
        notification(2, "review", "Your review was approved", json!({"review_id": 1}), false, 13),
        notification(3, "promotion", "Weekend sale on kitchenware", json!({"category_id": 5}), false, 18),
    ]
}
