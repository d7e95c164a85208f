//! Shared application state: the simplifier and the session store

use std::collections::HashMap;
use std::sync::Arc;

use simplify_core::{ContractSession, Simplifier};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::error::ServerError;

/// One session, locked for the duration of an operation on it
pub type SharedSession = Arc<Mutex<ContractSession>>;

#[derive(Clone)]
pub struct AppState {
    pub simplifier: Simplifier,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(simplifier: Simplifier) -> Self {
        Self {
            simplifier,
            sessions: SessionStore::default(),
        }
    }
}

/// In-memory sessions keyed by a random id
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, SharedSession>>>,
}

impl SessionStore {
    pub async fn insert(&self, session: ContractSession) -> String {
        let id = Uuid::new_v4().to_string();
        self.inner
            .write()
            .await
            .insert(id.clone(), Arc::new(Mutex::new(session)));
        id
    }

    pub async fn get(&self, id: &str) -> Result<SharedSession, ServerError> {
        self.inner
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| ServerError::SessionNotFound(id.to_string()))
    }

    pub async fn remove(&self, id: &str) -> Result<(), ServerError> {
        self.inner
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| ServerError::SessionNotFound(id.to_string()))
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}
