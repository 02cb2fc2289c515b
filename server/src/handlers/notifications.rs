//! Notification handlers. Every operation is scoped to the caller's own
//! notifications; someone else's notification is reported as missing.

use chrono::Utc;
use emporium_engine::{EnvelopeStyle, Formatted, QueryParams, SortDirection};
use serde::Serialize;
use serde_json::Value;

use super::{find, save, FilterParam, ResourceListing};
use crate::auth::AuthenticatedPrincipal;
use crate::error::{AppError, Result};
use crate::models::Notification;
use crate::AppState;

pub const NOTIFICATION_LISTING: ResourceListing = ResourceListing {
    default_per_page: 20,
    max_per_page: 100,
    default_sort: ("created_at", SortDirection::Desc),
    search_fields: &["title", "message"],
    timestamp_fields: &["created_at", "read_at"],
    filters: &[
        FilterParam::text("type", "type"),
        FilterParam::boolean("is_read", "is_read"),
    ],
    ranges: &[],
    style: EnvelopeStyle::Simple,
};

/// Result of marking every notification read.
#[derive(Debug, Serialize)]
pub struct ReadAllResponse {
    pub updated: u64,
}

/// Record a notification for `user_id`.
pub(crate) async fn notify(
    state: &AppState,
    user_id: u64,
    kind: &str,
    title: String,
    data: Value,
) -> Result<Notification> {
    let notification = state
        .notifications
        .create(Notification {
            id: 0,
            user_id,
            kind: kind.to_string(),
            message: format!("{}.", title),
            title,
            data,
            is_read: false,
            read_at: None,
            created_at: Utc::now(),
        })
        .await?;

    tracing::debug!(user_id, notification_id = notification.id, kind, "notification sent");
    Ok(notification)
}

async fn own_notification(
    state: &AppState,
    principal: AuthenticatedPrincipal,
    id: u64,
) -> Result<Notification> {
    let notification = find(state.notifications.as_ref(), id).await?;
    if notification.user_id != principal.id {
        return Err(AppError::not_found("Notification", id));
    }
    Ok(notification)
}

pub async fn list_notifications(
    state: &AppState,
    principal: AuthenticatedPrincipal,
    params: &QueryParams,
    path: &str,
) -> Result<Formatted<Notification>> {
    let mut notifications = state.notifications.all().await?;
    notifications.retain(|n| n.user_id == principal.id);
    super::list_resource(&notifications, params, &NOTIFICATION_LISTING, path)
}

pub async fn mark_notification_read(
    state: &AppState,
    principal: AuthenticatedPrincipal,
    id: u64,
) -> Result<Notification> {
    let mut notification = own_notification(state, principal, id).await?;
    if notification.is_read {
        return Ok(notification);
    }
    notification.mark_read(Utc::now());
    save(state.notifications.as_ref(), notification).await
}

pub async fn mark_all_notifications_read(
    state: &AppState,
    principal: AuthenticatedPrincipal,
) -> Result<ReadAllResponse> {
    let now = Utc::now();
    let mut updated = 0;

    for mut notification in state.notifications.all().await? {
        if notification.user_id != principal.id || notification.is_read {
            continue;
        }
        notification.mark_read(now);
        if state.notifications.update(notification).await?.is_some() {
            updated += 1;
        }
    }

    tracing::info!(user_id = principal.id, updated, "notifications marked read");
    Ok(ReadAllResponse { updated })
}

pub async fn delete_notification(
    state: &AppState,
    principal: AuthenticatedPrincipal,
    id: u64,
) -> Result<()> {
    own_notification(state, principal, id).await?;
    if !state.notifications.delete(id).await? {
        return Err(AppError::not_found("Notification", id));
    }
    tracing::info!(notification_id = id, "notification deleted");
    Ok(())
}
