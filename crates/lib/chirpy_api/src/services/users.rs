//! User administration: subscription upgrades and the dev reset.

use chirpy_core::store::UserStore;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::models::WebhookEvent;

/// Webhook event that upgrades a user.
pub const USER_UPGRADED_EVENT: &str = "user.upgraded";

/// Apply a payment-provider webhook event. Other event types are ignored.
pub async fn apply_webhook(store: &dyn UserStore, event: &WebhookEvent) -> AppResult<()> {
    if event.event != USER_UPGRADED_EVENT {
        return Ok(());
    }
    let user_id = event
        .data
        .as_ref()
        .map(|d| d.user_id)
        .ok_or_else(|| AppError::Validation("Missing user_id".into()))?;

    if !store.upgrade_user(user_id).await? {
        warn!(%user_id, "upgrade for unknown user");
        return Err(AppError::NotFound("User not found".into()));
    }
    info!(%user_id, "user upgraded");
    Ok(())
}

/// Delete all users. Only permitted on the dev platform.
pub async fn reset(store: &dyn UserStore, is_dev: bool) -> AppResult<()> {
    if !is_dev {
        return Err(AppError::Forbidden(
            "Reset is only available in dev environments".into(),
        ));
    }
    store.reset_users().await?;
    info!("all users deleted");
    Ok(())
}
