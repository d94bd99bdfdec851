use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::session::models::Session;

/// Upper bound on live sessions; the oldest is dropped when a new one would exceed it.
const MAX_SESSIONS: usize = 1_000;

/// In-memory session map shared by all handlers. Nothing outlives the process.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self) -> Session {
        let session = Session::new();
        let mut sessions = self.inner.write().await;

        if sessions.len() >= MAX_SESSIONS {
            if let Some(oldest) = sessions
                .values()
                .min_by_key(|s| s.created_at)
                .map(|s| s.id)
            {
                sessions.remove(&oldest);
                info!("Session limit reached, dropped oldest session {oldest}");
            }
        }

        sessions.insert(session.id, session.clone());
        info!("Created session {}", session.id);
        session
    }

    /// Runs `f` against a shared borrow of the session.
    pub async fn read<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&Session) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let sessions = self.inner.read().await;
        let session = sessions
            .get(&id)
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
        f(session)
    }

    /// Runs `f` against the session under the write lock. Keep `f` free of awaits.
    pub async fn update<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Session) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let mut sessions = self.inner.write().await;
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
        f(session)
    }

    pub async fn get(&self, id: Uuid) -> Result<Session, AppError> {
        self.read(id, |s| Ok(s.clone())).await
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::models::Phase;

    #[tokio::test]
    async fn test_create_and_get() {
        let store = SessionStore::new();
        let session = store.create().await;
        let fetched = store.get(session.id).await.unwrap();
        assert_eq!(fetched.id, session.id);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_missing_session_is_not_found() {
        let store = SessionStore::new();
        let err = store.get(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_mutates_in_place() {
        let store = SessionStore::new();
        let id = store.create().await.id;
        store
            .update(id, |s| {
                s.end();
                Ok(())
            })
            .await
            .unwrap();
        let phase = store.read(id, |s| Ok(s.phase)).await.unwrap();
        assert_eq!(phase, Phase::Ended);
    }

    #[tokio::test]
    async fn test_update_error_propagates() {
        let store = SessionStore::new();
        let id = store.create().await.id;
        let result: Result<(), AppError> = store
            .update(id, |_| Err(AppError::Conflict("nope".into())))
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }
}
