//! Category handlers.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use emporium_engine::{EnvelopeStyle, Formatted, QueryParams, SortDirection};
use serde::Deserialize;

use super::{find, nullable, required_text, save, FilterParam, ResourceListing};
use crate::auth::AuthenticatedPrincipal;
use crate::error::{AppError, Result};
use crate::models::{slugify, Category};
use crate::AppState;

pub const CATEGORY_LISTING: ResourceListing = ResourceListing {
    default_per_page: 50,
    max_per_page: 100,
    default_sort: ("sort_order", SortDirection::Asc),
    search_fields: &["name", "slug"],
    timestamp_fields: &["created_at", "updated_at"],
    filters: &[
        FilterParam::boolean("is_active", "is_active"),
        FilterParam::number("parent_id", "parent_id"),
    ],
    ranges: &[],
    style: EnvelopeStyle::Simple,
};

/// Fields accepted on create and update. Absent fields keep their value;
/// `"parent_id": null` moves a category to the top level.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryInput {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub parent_id: Option<Option<u64>>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i64>,
}

pub async fn list_categories(
    state: &AppState,
    params: &QueryParams,
    path: &str,
) -> Result<Formatted<Category>> {
    let categories = state.categories.all().await?;
    super::list_resource(&categories, params, &CATEGORY_LISTING, path)
}

pub async fn get_category(state: &AppState, id: u64) -> Result<Category> {
    find(state.categories.as_ref(), id).await
}

/// Validate `parent_id` as the parent of category `id` (`None` while
/// creating). The parent must exist and must not descend from `id`.
async fn check_parent(state: &AppState, id: Option<u64>, parent_id: Option<u64>) -> Result<()> {
    let Some(parent_id) = parent_id else {
        return Ok(());
    };
    if Some(parent_id) == id {
        return Err(AppError::validation("A category cannot be its own parent."));
    }

    let parents: HashMap<u64, Option<u64>> = state
        .categories
        .all()
        .await?
        .into_iter()
        .map(|c| (c.id, c.parent_id))
        .collect();
    if !parents.contains_key(&parent_id) {
        return Err(AppError::validation("The selected parent id is invalid."));
    }

    let Some(id) = id else {
        return Ok(());
    };
    let mut seen = HashSet::new();
    let mut cursor = Some(parent_id);
    while let Some(ancestor) = cursor {
        if ancestor == id {
            return Err(AppError::validation(
                "A category cannot be moved under one of its own subcategories.",
            ));
        }
        if !seen.insert(ancestor) {
            break;
        }
        cursor = parents.get(&ancestor).copied().flatten();
    }
    Ok(())
}

pub async fn create_category(
    state: &AppState,
    principal: AuthenticatedPrincipal,
    input: CategoryInput,
) -> Result<Category> {
    principal.require_admin()?;

    let name = required_text("name", input.name.as_deref().unwrap_or_default())?;
    let parent_id = input.parent_id.flatten();
    check_parent(state, None, parent_id).await?;

    let now = Utc::now();
    let category = state
        .categories
        .create(Category {
            id: 0,
            slug: slugify(&name),
            name,
            description: input.description,
            parent_id,
            is_active: input.is_active.unwrap_or(true),
            sort_order: input.sort_order.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        })
        .await?;

    tracing::info!(category_id = category.id, "category created");
    Ok(category)
}

pub async fn update_category(
    state: &AppState,
    principal: AuthenticatedPrincipal,
    id: u64,
    input: CategoryInput,
) -> Result<Category> {
    principal.require_admin()?;

    let mut category = find(state.categories.as_ref(), id).await?;

    if let Some(name) = input.name {
        category.name = required_text("name", &name)?;
        category.slug = slugify(&category.name);
    }
    if input.description.is_some() {
        category.description = input.description;
    }
    if let Some(parent_id) = input.parent_id {
        check_parent(state, Some(id), parent_id).await?;
        category.parent_id = parent_id;
    }
    if let Some(is_active) = input.is_active {
        category.is_active = is_active;
    }
    if let Some(sort_order) = input.sort_order {
        category.sort_order = sort_order;
    }
    category.updated_at = Utc::now();

    let category = save(state.categories.as_ref(), category).await?;
    tracing::info!(category_id = id, "category updated");
    Ok(category)
}

pub async fn delete_category(
    state: &AppState,
    principal: AuthenticatedPrincipal,
    id: u64,
) -> Result<()> {
    principal.require_admin()?;

    let children = state
        .categories
        .all()
        .await?
        .iter()
        .filter(|c| c.parent_id == Some(id))
        .count();
    if children > 0 {
        return Err(AppError::validation(
            "A category with subcategories cannot be deleted.",
        ));
    }

    if !state.categories.delete(id).await? {
        return Err(AppError::not_found("Category", id));
    }
    tracing::info!(category_id = id, "category deleted");
    Ok(())
}
