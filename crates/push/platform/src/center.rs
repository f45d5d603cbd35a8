//! In-process notification center.
//!
//! Holds pending and presented notifications, fires delivery timers, and
//! fans presented notifications and user responses out to listeners.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use push_core::{
    DEFAULT_ACTION_IDENTIFIER, Notification, NotificationCategory, NotificationId,
    NotificationRequest, NotificationResponse, PlatformError, Presentation, ScheduledNotification,
    Trigger,
};

/// Presented notifications kept for responses; older ones are forgotten.
pub const PRESENTED_HISTORY: usize = 64;

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Registry<T> {
    entries: Mutex<Vec<(u64, Callback<T>)>>,
}

impl<T> Registry<T> {
    fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    fn insert(&self, id: u64, callback: Callback<T>) {
        lock(&self.entries).push((id, callback));
    }

    fn remove(&self, id: u64) {
        lock(&self.entries).retain(|(entry, _)| *entry != id);
    }

    fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    fn emit(&self, value: &T) {
        // Snapshot so callbacks may add or drop listeners.
        let callbacks: Vec<Callback<T>> = lock(&self.entries)
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();

        for callback in callbacks {
            callback(value);
        }
    }
}

struct Listeners {
    next_id: AtomicU64,
    received: Registry<Notification>,
    responses: Registry<NotificationResponse>,
}

#[derive(Debug, Clone, Copy)]
enum ListenerKind {
    Received,
    Response,
}

/// Handle for a registered listener.
///
/// The listener stays registered until the guard is dropped.
#[must_use = "dropping the guard removes the listener"]
pub struct ListenerGuard {
    listeners: Weak<Listeners>,
    kind: ListenerKind,
    id: u64,
}

impl ListenerGuard {
    /// Remove the listener now.
    pub fn remove(self) {}
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        let Some(listeners) = self.listeners.upgrade() else {
            return;
        };

        match self.kind {
            ListenerKind::Received => listeners.received.remove(self.id),
            ListenerKind::Response => listeners.responses.remove(self.id),
        }

        tracing::trace!(listener = self.id, kind = ?self.kind, "listener removed");
    }
}

/// Notification center shared by a provider and its delivery timers.
pub struct NotificationCenter {
    listeners: Arc<Listeners>,
    pending: Mutex<HashMap<NotificationId, ScheduledNotification>>,
    presented: Mutex<VecDeque<Notification>>,
    categories: Mutex<HashMap<String, NotificationCategory>>,
    badge: AtomicU32,
}

impl NotificationCenter {
    /// Create an empty center.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            listeners: Arc::new(Listeners {
                next_id: AtomicU64::new(1),
                received: Registry::new(),
                responses: Registry::new(),
            }),
            pending: Mutex::new(HashMap::new()),
            presented: Mutex::new(VecDeque::new()),
            categories: Mutex::new(HashMap::new()),
            badge: AtomicU32::new(0),
        })
    }

    /// Schedule a notification to be presented when its trigger fires.
    ///
    /// Immediate notifications are presented before this returns. Delayed ones
    /// need a running tokio runtime.
    pub fn schedule(
        self: &Arc<Self>,
        request: NotificationRequest,
        trigger: Trigger,
        presentation: Presentation,
    ) -> NotificationId {
        let id = NotificationId::new();

        lock(&self.pending).insert(
            id,
            ScheduledNotification {
                id,
                request,
                trigger,
            },
        );

        match trigger {
            Trigger::Immediate => self.fire(id, presentation),
            Trigger::After(delay) => {
                tracing::debug!(id = %id, delay = ?delay, "notification scheduled");

                let center = Arc::clone(self);
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    center.fire(id, presentation);
                });
            }
        }

        id
    }

    fn fire(&self, id: NotificationId, presentation: Presentation) {
        let Some(scheduled) = lock(&self.pending).remove(&id) else {
            return;
        };

        let notification = Notification {
            id,
            request: scheduled.request,
            presentation,
            presented_at: chrono::Utc::now(),
        };

        if presentation.badge {
            self.badge.fetch_add(1, Ordering::Relaxed);
        }

        {
            let mut presented = lock(&self.presented);
            if presented.len() == PRESENTED_HISTORY {
                presented.pop_front();
            }
            presented.push_back(notification.clone());
        }

        tracing::info!(
            id = %id,
            title = %notification.request.title,
            alert = presentation.alert,
            sound = presentation.sound,
            "notification presented"
        );

        self.listeners.received.emit(&notification);
    }

    /// Report a user interaction with a presented notification.
    pub fn respond(
        &self,
        id: NotificationId,
        action_identifier: &str,
    ) -> Result<NotificationResponse, PlatformError> {
        let notification = lock(&self.presented)
            .iter()
            .find(|n| n.id == id)
            .cloned()
            .ok_or(PlatformError::UnknownNotification(id))?;

        if action_identifier != DEFAULT_ACTION_IDENTIFIER {
            let category = notification.request.category.clone().unwrap_or_default();
            let known = lock(&self.categories)
                .get(&category)
                .is_some_and(|c| c.has_action(action_identifier));

            if !known {
                return Err(PlatformError::UnknownAction {
                    category,
                    action: action_identifier.to_string(),
                });
            }
        }

        let response = NotificationResponse {
            notification,
            action_identifier: action_identifier.to_string(),
        };

        self.listeners.responses.emit(&response);

        Ok(response)
    }

    /// Register or replace a category.
    pub fn set_category(&self, category: NotificationCategory) {
        tracing::debug!(category = %category.identifier, "category registered");
        lock(&self.categories).insert(category.identifier.clone(), category);
    }

    /// Notifications waiting for their trigger.
    pub fn pending(&self) -> Vec<ScheduledNotification> {
        lock(&self.pending).values().cloned().collect()
    }

    /// The most recent presented notifications, oldest first.
    ///
    /// At most [`PRESENTED_HISTORY`] are kept.
    pub fn presented(&self) -> Vec<Notification> {
        lock(&self.presented).iter().cloned().collect()
    }

    /// Current app badge count.
    pub fn badge_count(&self) -> u32 {
        self.badge.load(Ordering::Relaxed)
    }

    /// Number of live received-listeners.
    pub fn received_listener_count(&self) -> usize {
        self.listeners.received.len()
    }

    /// Number of live response-listeners.
    pub fn response_listener_count(&self) -> usize {
        self.listeners.responses.len()
    }

    /// Register a listener for presented notifications.
    pub fn add_received_listener<F>(&self, listener: F) -> ListenerGuard
    where
        F: Fn(&Notification) + Send + Sync + 'static,
    {
        let id = self.listeners.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners.received.insert(id, Arc::new(listener));
        self.guard(ListenerKind::Received, id)
    }

    /// Register a listener for user responses.
    pub fn add_response_listener<F>(&self, listener: F) -> ListenerGuard
    where
        F: Fn(&NotificationResponse) + Send + Sync + 'static,
    {
        let id = self.listeners.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners.responses.insert(id, Arc::new(listener));
        self.guard(ListenerKind::Response, id)
    }

    fn guard(&self, kind: ListenerKind, id: u64) -> ListenerGuard {
        ListenerGuard {
            listeners: Arc::downgrade(&self.listeners),
            kind,
            id,
        }
    }
}
