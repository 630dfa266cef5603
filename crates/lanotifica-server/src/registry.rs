//! Registry of active notifications.
//!
//! Maps caller keys to the ids the notification service handed back, so a
//! later dismiss request can close the right notification. The map is the
//! only shared mutable state on the request path and sits behind one
//! reader-writer lock. Backend calls run on the blocking pool and never
//! happen while the lock is held.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use lanotifica_core::{IconResolver, Presentation, TimeoutPolicy, Urgency};
use lanotifica_protocol::NotificationRequest;

use crate::backend::{BackendError, NotificationBackend, NotificationId};
use crate::error::ServerResult;

/// Builds the presentation for a request, given the resolved icon (if any).
pub fn presentation_for(
    request: &NotificationRequest,
    icon: Option<&std::path::Path>,
) -> Presentation {
    let presentation = Presentation::new(request.title.as_str(), request.message.as_str())
        .with_app_name(request.app_name.as_str())
        .with_urgency(Urgency::from_level(request.urgency))
        .with_timeout(TimeoutPolicy::from_millis(request.timeout_ms));

    match icon {
        Some(path) => presentation.with_image(path),
        None => presentation,
    }
}

/// Shared handle to the active notification map and its backend.
///
/// Cloning is cheap; all clones see the same map.
#[derive(Clone)]
pub struct NotificationRegistry {
    active: Arc<RwLock<HashMap<String, NotificationId>>>,
    backend: Arc<dyn NotificationBackend>,
    icons: Arc<dyn IconResolver>,
}

impl NotificationRegistry {
    /// Creates an empty registry.
    pub fn new(backend: Arc<dyn NotificationBackend>, icons: Arc<dyn IconResolver>) -> Self {
        Self {
            active: Arc::new(RwLock::new(HashMap::new())),
            backend,
            icons,
        }
    }

    /// Shows a notification and, when the request carries a key, tracks it.
    ///
    /// Reusing a key replaces the tracked id; the earlier notification is
    /// left to expire on its own. The show and the key write run on their
    /// own task, so dropping the returned future does not leave a shown
    /// notification untracked.
    pub async fn send(&self, request: &NotificationRequest) -> ServerResult<NotificationId> {
        let registry = self.clone();
        let request = request.clone();
        tokio::spawn(async move { registry.show_and_track(request).await })
            .await
            .map_err(|e| BackendError::TaskFailed(e.to_string()))?
    }

    async fn show_and_track(&self, request: NotificationRequest) -> ServerResult<NotificationId> {
        let backend = self.backend.clone();
        let icons = self.icons.clone();
        let owned = request.clone();

        let id = tokio::task::spawn_blocking(move || {
            let icon = icons.resolve(&owned.package_name);
            let presentation = presentation_for(&owned, icon.as_deref());
            backend.show(&presentation)
        })
        .await
        .map_err(|e| BackendError::TaskFailed(e.to_string()))??;

        if request.is_tracked() {
            let previous = self.active.write().await.insert(request.key.clone(), id);
            if let Some(previous) = previous {
                debug!(
                    key = %request.key,
                    previous = previous.get(),
                    "Key reused, previous notification left open"
                );
            }
        }

        info!(
            key = %request.key,
            id = id.get(),
            app = %request.app_name,
            "Notification sent"
        );
        Ok(id)
    }

    /// Closes the notification tracked under `key`.
    ///
    /// Unknown keys succeed without touching the backend. The entry is
    /// removed before the close call and stays removed if the close fails.
    /// Like [`send`](Self::send), removal and close complete even if the
    /// caller goes away.
    pub async fn dismiss(&self, key: &str) -> ServerResult<()> {
        let registry = self.clone();
        let key = key.to_string();
        tokio::spawn(async move { registry.remove_and_close(&key).await })
            .await
            .map_err(|e| BackendError::TaskFailed(e.to_string()))?
    }

    async fn remove_and_close(&self, key: &str) -> ServerResult<()> {
        let Some(id) = self.active.write().await.remove(key) else {
            debug!(key, "Dismiss for unknown key, nothing to do");
            return Ok(());
        };

        let backend = self.backend.clone();
        let result = tokio::task::spawn_blocking(move || backend.close(id))
            .await
            .map_err(|e| BackendError::TaskFailed(e.to_string()))?;

        if let Err(e) = result {
            warn!(key, id = id.get(), error = %e, "Failed to close notification");
            return Err(e.into());
        }

        info!(key, id = id.get(), "Notification dismissed");
        Ok(())
    }

    /// Returns true if `key` is currently tracked.
    pub async fn is_active(&self, key: &str) -> bool {
        self.active.read().await.contains_key(key)
    }

    /// Returns the id tracked under `key`.
    pub async fn get(&self, key: &str) -> Option<NotificationId> {
        self.active.read().await.get(key).copied()
    }

    /// Number of tracked notifications.
    pub async fn active_count(&self) -> usize {
        self.active.read().await.len()
    }
}
