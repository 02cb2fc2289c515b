//! Review handlers.
//!
//! Everyone sees approved reviews. Authors also see their own pending and
//! rejected reviews, and admins see everything.

use chrono::Utc;
use emporium_engine::{EnvelopeStyle, Formatted, QueryParams, SortDirection};
use serde::Deserialize;
use serde_json::json;

use super::{find, notify, required_text, save, FilterParam, ResourceListing};
use crate::auth::{AuthenticatedPrincipal, OptionalPrincipal};
use crate::error::{AppError, Result};
use crate::models::{Review, ReviewStatus};
use crate::AppState;

pub const REVIEW_LISTING: ResourceListing = ResourceListing {
    default_per_page: 10,
    max_per_page: 100,
    default_sort: ("created_at", SortDirection::Desc),
    search_fields: &["title", "comment"],
    timestamp_fields: &["created_at", "updated_at"],
    filters: &[
        FilterParam::number("product_id", "product_id"),
        FilterParam::text("status", "status"),
        FilterParam::number("rating", "rating"),
    ],
    ranges: &[],
    style: EnvelopeStyle::Laravel,
};

#[derive(Debug, Deserialize)]
pub struct CreateReview {
    pub product_id: u64,
    pub rating: u8,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub comment: String,
}

/// Fields accepted on update. Only admins may change `status`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateReview {
    pub rating: Option<u8>,
    pub title: Option<String>,
    pub comment: Option<String>,
    pub status: Option<ReviewStatus>,
}

fn visible_to(review: &Review, viewer: OptionalPrincipal) -> bool {
    review.status == ReviewStatus::Approved
        || viewer.0.is_some_and(|p| p.can_access(review.user_id))
}

fn check_rating(rating: u8) -> Result<u8> {
    if !(1..=5).contains(&rating) {
        return Err(AppError::validation("The rating must be between 1 and 5."));
    }
    Ok(rating)
}

pub async fn list_reviews(
    state: &AppState,
    viewer: OptionalPrincipal,
    params: &QueryParams,
    path: &str,
) -> Result<Formatted<Review>> {
    let mut reviews = state.reviews.all().await?;
    reviews.retain(|r| visible_to(r, viewer));
    super::list_resource(&reviews, params, &REVIEW_LISTING, path)
}

pub async fn get_review(state: &AppState, viewer: OptionalPrincipal, id: u64) -> Result<Review> {
    let review = find(state.reviews.as_ref(), id).await?;
    if !visible_to(&review, viewer) {
        return Err(AppError::not_found("Review", id));
    }
    Ok(review)
}

pub async fn create_review(
    state: &AppState,
    principal: AuthenticatedPrincipal,
    input: CreateReview,
) -> Result<Review> {
    let rating = check_rating(input.rating)?;
    let comment = required_text("comment", &input.comment)?;

    match state.products.get(input.product_id).await? {
        Some(product) if product.is_active => {}
        _ => return Err(AppError::validation("The selected product id is invalid.")),
    }

    let duplicate = state
        .reviews
        .all()
        .await?
        .iter()
        .any(|r| r.product_id == input.product_id && r.user_id == principal.id);
    if duplicate {
        return Err(AppError::validation("You have already reviewed this product."));
    }

    let now = Utc::now();
    let review = state
        .reviews
        .create(Review {
            id: 0,
            product_id: input.product_id,
            user_id: principal.id,
            rating,
            title: input.title.trim().to_string(),
            comment,
            status: ReviewStatus::Pending,
            created_at: now,
            updated_at: now,
        })
        .await?;

    tracing::info!(review_id = review.id, product_id = review.product_id, "review submitted");
    Ok(review)
}

/// Authors may edit their review, which sends it back to moderation.
/// Admins may also moderate it.
pub async fn update_review(
    state: &AppState,
    principal: AuthenticatedPrincipal,
    id: u64,
    input: UpdateReview,
) -> Result<Review> {
    let mut review = find(state.reviews.as_ref(), id).await?;
    if !principal.can_access(review.user_id) {
        return Err(AppError::Forbidden);
    }
    if input.status.is_some() {
        principal.require_admin()?;
    }

    let mut edited = false;
    if let Some(rating) = input.rating {
        review.rating = check_rating(rating)?;
        edited = true;
    }
    if let Some(title) = input.title {
        review.title = title.trim().to_string();
        edited = true;
    }
    if let Some(comment) = input.comment {
        review.comment = required_text("comment", &comment)?;
        edited = true;
    }

    let previous = review.status;
    match input.status {
        Some(status) => review.status = status,
        None if edited && !principal.is_admin() => review.status = ReviewStatus::Pending,
        None => {}
    }
    review.updated_at = Utc::now();

    let review = save(state.reviews.as_ref(), review).await?;

    if review.status != previous && review.status == ReviewStatus::Approved {
        notify(
            state,
            review.user_id,
            "review",
            "Your review was approved".to_string(),
            json!({ "review_id": review.id, "product_id": review.product_id }),
        )
        .await?;
    }

    tracing::info!(review_id = id, status = ?review.status, "review updated");
    Ok(review)
}

pub async fn delete_review(
    state: &AppState,
    principal: AuthenticatedPrincipal,
    id: u64,
) -> Result<()> {
    let review = find(state.reviews.as_ref(), id).await?;
    if !principal.can_access(review.user_id) {
        return Err(AppError::Forbidden);
    }
    if !state.reviews.delete(id).await? {
        return Err(AppError::not_found("Review", id));
    }
    tracing::info!(review_id = id, "review deleted");
    Ok(())
}
