//! Notification store with monotonic read-state.
//!
//! # Responsibility
//! - Hold the current notification collection in source order.
//! - Mark records read and report the derived unread count.
//! - Persist and re-apply read-state across refresh and reload.
//!
//! # Invariants
//! - `unread_count()` is recomputed from the collection on every call.
//! - `read` only moves from `false` to `true`; nothing here clears it.
//! - `refresh()` replaces the collection wholesale from the source.

use crate::model::notification::{Notification, NotificationId};
use crate::repo::state_repo::{get_versioned, put_versioned, RepoError, StateKey, StateRepository};
use crate::service::data_service::DataProvider;
use log::{info, warn};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type NotificationResult<T> = Result<T, NotificationError>;

#[derive(Debug)]
pub enum NotificationError {
    /// The source could not produce a collection.
    Source(String),
    Repo(RepoError),
}

impl Display for NotificationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Source(message) => write!(f, "failed to load notifications: {message}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NotificationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Source(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for NotificationError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Where a [`NotificationStore`] loads its collection from.
pub trait NotificationSource {
    fn load_notifications(&self) -> NotificationResult<Vec<Notification>>;
}

impl<S: NotificationSource + ?Sized> NotificationSource for &S {
    fn load_notifications(&self) -> NotificationResult<Vec<Notification>> {
        (**self).load_notifications()
    }
}

impl NotificationSource for DataProvider {
    fn load_notifications(&self) -> NotificationResult<Vec<Notification>> {
        Ok(self.notifications().to_vec())
    }
}

impl NotificationSource for Vec<Notification> {
    fn load_notifications(&self) -> NotificationResult<Vec<Notification>> {
        Ok(self.clone())
    }
}

/// Notification collection plus read-state operations.
pub struct NotificationStore<S: NotificationSource> {
    source: S,
    notifications: Vec<Notification>,
}

impl<S: NotificationSource> NotificationStore<S> {
    /// Creates the store and performs the initial load.
    pub fn new(source: S) -> NotificationResult<Self> {
        let mut store = Self {
            source,
            notifications: Vec::new(),
        };
        store.refresh()?;
        Ok(store)
    }

    /// Collection in source insertion order.
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Collection sorted by `created_at` descending; ties keep source order.
    pub fn recent_first(&self) -> Vec<&Notification> {
        let mut sorted: Vec<&Notification> = self.notifications.iter().collect();
        sorted.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        sorted
    }

    pub fn get(&self, id: &str) -> Option<&Notification> {
        self.notifications
            .iter()
            .find(|notification| notification.id == id)
    }

    pub fn unread(&self) -> impl Iterator<Item = &Notification> {
        self.notifications
            .iter()
            .filter(|notification| !notification.read)
    }

    pub fn unread_count(&self) -> usize {
        self.unread().count()
    }

    /// Marks one record read.
    ///
    /// Returns `true` only when the record existed and was unread; unknown
    /// ids and already-read records are no-ops.
    pub fn mark_as_read(&mut self, id: &str) -> bool {
        self.notifications
            .iter_mut()
            .find(|notification| notification.id == id)
            .is_some_and(Notification::mark_read)
    }

    /// Marks every record read and returns how many changed.
    pub fn mark_all_as_read(&mut self) -> usize {
        self.notifications
            .iter_mut()
            .map(Notification::mark_read)
            .filter(|changed| *changed)
            .count()
    }

    /// Reloads the collection from the source, replacing it in place.
    pub fn refresh(&mut self) -> NotificationResult<()> {
        match self.source.load_notifications() {
            Ok(notifications) => {
                self.notifications = notifications;
                info!(
                    "event=notifications_refresh module=notifications status=ok total={} unread={}",
                    self.notifications.len(),
                    self.unread_count()
                );
                Ok(())
            }
            Err(err) => {
                warn!("event=notifications_refresh module=notifications status=error error={err}");
                Err(err)
            }
        }
    }

    /// Ids of every record currently marked read, sorted.
    pub fn read_ids(&self) -> BTreeSet<NotificationId> {
        self.notifications
            .iter()
            .filter(|notification| notification.read)
            .map(|notification| notification.id.clone())
            .collect()
    }

    /// Marks every record whose id is in `ids` as read; returns how many changed.
    pub fn apply_read_ids<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) -> usize {
        let ids: BTreeSet<&str> = ids.into_iter().collect();
        self.notifications
            .iter_mut()
            .filter(|notification| ids.contains(notification.id.as_str()))
            .map(Notification::mark_read)
            .filter(|changed| *changed)
            .count()
    }

    /// Persists the read-state so it can be re-applied after a reload.
    pub fn save_read_state(&self, repo: &impl StateRepository) -> NotificationResult<()> {
        put_versioned(repo, StateKey::NotificationReadState, &self.read_ids())?;
        Ok(())
    }

    /// Re-applies persisted read-state.
    ///
    /// An unreadable snapshot is discarded and treated as empty.
    pub fn restore_read_state(&mut self, repo: &impl StateRepository) -> NotificationResult<usize> {
        let ids = match get_versioned::<Vec<NotificationId>>(repo, StateKey::NotificationReadState)
        {
            Ok(ids) => ids.unwrap_or_default(),
            Err(RepoError::InvalidData { message, .. }) => {
                warn!(
                    "event=notifications_restore module=notifications status=discarded reason=invalid_data detail={message}"
                );
                repo.delete_entry(StateKey::NotificationReadState)?;
                Vec::new()
            }
            Err(err) => return Err(err.into()),
        };
        Ok(self.apply_read_ids(ids.iter().map(String::as_str)))
    }
}

#[cfg(test)]
mod tests {
    use super::{NotificationError, NotificationResult, NotificationSource, NotificationStore};
    use crate::model::notification::{Notification, NotificationType};
    use std::cell::Cell;

    /// Serves a fixed collection until told to fail.
    struct FlakySource {
        notifications: Vec<Notification>,
        failing: Cell<bool>,
    }

    impl NotificationSource for FlakySource {
        fn load_notifications(&self) -> NotificationResult<Vec<Notification>> {
            if self.failing.get() {
                return Err(NotificationError::Source("backend offline".to_string()));
            }
            Ok(self.notifications.clone())
        }
    }

    fn notification(id: &str, created_at: i64, read: bool) -> Notification {
        Notification {
            id: id.to_string(),
            title: format!("title {id}"),
            message: "body".to_string(),
            kind: NotificationType::Info,
            read,
            created_at,
            link: None,
            entity_type: None,
            metadata: None,
        }
    }

    #[test]
    fn recent_first_sorts_descending_and_keeps_ties_stable() {
        let store = NotificationStore::new(vec![
            notification("a", 10, false),
            notification("b", 30, false),
            notification("c", 10, true),
        ])
        .unwrap();

        let order: Vec<&str> = store
            .recent_first()
            .into_iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(order, vec!["b", "a", "c"]);
        assert_eq!(store.notifications()[0].id, "a");
    }

    #[test]
    fn mark_all_as_read_counts_only_changes() {
        let mut store = NotificationStore::new(vec![
            notification("a", 1, false),
            notification("b", 2, true),
            notification("c", 3, false),
        ])
        .unwrap();

        assert_eq!(store.mark_all_as_read(), 2);
        assert_eq!(store.unread_count(), 0);
        assert_eq!(store.mark_all_as_read(), 0);
    }

    #[test]
    fn apply_read_ids_ignores_unknown_ids() {
        let mut store =
            NotificationStore::new(vec![notification("a", 1, false), notification("b", 2, false)])
                .unwrap();

        assert_eq!(store.apply_read_ids(["b", "zzz"]), 1);
        assert!(store.get("b").unwrap().read);
        assert!(!store.get("a").unwrap().read);
    }

    #[test]
    fn failed_refresh_keeps_previous_collection_and_read_state() {
        let source = FlakySource {
            notifications: vec![notification("a", 1, false), notification("b", 2, false)],
            failing: Cell::new(false),
        };
        let mut store = NotificationStore::new(&source).unwrap();
        assert!(store.mark_as_read("a"));
        let before = store.notifications().to_vec();

        source.failing.set(true);
        let err = store.refresh().unwrap_err();
        assert!(matches!(err, NotificationError::Source(_)));
        assert_eq!(store.notifications(), before.as_slice());
        assert_eq!(store.unread_count(), 1);
        assert!(store.get("a").unwrap().read);

        source.failing.set(false);
        store.refresh().unwrap();
        assert_eq!(store.unread_count(), 2);
    }
}
