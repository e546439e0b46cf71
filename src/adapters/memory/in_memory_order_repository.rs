//! In-memory order repository.
//!
//! Implements the `OrderRepository` port over a `HashMap` guarded by a
//! `tokio::sync::RwLock`. Useful for:
//! - The bundled webhook binary
//! - Unit and integration tests
//!
//! Orders are not persisted across restarts.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{LocalOrderId, RemoteOrderId};
use crate::domain::order::LocalOrder;
use crate::ports::{OrderRepository, RepositoryError};

#[derive(Default)]
struct Store {
    orders: HashMap<LocalOrderId, LocalOrder>,
    by_remote: HashMap<RemoteOrderId, LocalOrderId>,
}

/// In-memory implementation of the `OrderRepository` port.
///
/// # Example
///
/// ```ignore
/// let repo = InMemoryOrderRepository::with_orders([
///     LocalOrder::new(LocalOrderId::new(1), 13000, "EGP"),
/// ]);
/// let order = repo.find_by_id(LocalOrderId::new(1)).await?;
/// ```
#[derive(Default)]
pub struct InMemoryOrderRepository {
    store: RwLock<Store>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository seeded with `orders`.
    ///
    /// Later orders replace earlier ones with the same id. Remote ids are
    /// indexed without conflict checks.
    pub fn with_orders(orders: impl IntoIterator<Item = LocalOrder>) -> Self {
        let mut store = Store::default();
        for order in orders {
            if let Some(remote) = order.remote_order_id() {
                store.by_remote.insert(remote, order.id());
            }
            store.orders.insert(order.id(), order);
        }
        Self {
            store: RwLock::new(store),
        }
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.orders.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn find_by_id(&self, id: LocalOrderId) -> Result<Option<LocalOrder>, RepositoryError> {
        Ok(self.store.read().await.orders.get(&id).cloned())
    }

    async fn find_by_remote_order_id(
        &self,
        remote_order_id: RemoteOrderId,
    ) -> Result<Option<LocalOrder>, RepositoryError> {
        let store = self.store.read().await;
        Ok(store
            .by_remote
            .get(&remote_order_id)
            .and_then(|id| store.orders.get(id))
            .cloned())
    }

    async fn save(&self, order: &LocalOrder) -> Result<(), RepositoryError> {
        let mut store = self.store.write().await;

        if let Some(remote) = order.remote_order_id() {
            match store.by_remote.get(&remote) {
                Some(&owner) if owner != order.id() => {
                    return Err(RepositoryError::RemoteOrderTaken {
                        remote_order_id: remote,
                        owner,
                    });
                }
                _ => {}
            }
        }

        let previous_remote = store
            .orders
            .get(&order.id())
            .and_then(LocalOrder::remote_order_id);
        if let Some(previous) = previous_remote {
            if Some(previous) != order.remote_order_id() {
                store.by_remote.remove(&previous);
            }
        }

        if let Some(remote) = order.remote_order_id() {
            store.by_remote.insert(remote, order.id());
        }
        store.orders.insert(order.id(), order.clone());

        Ok(())
    }
}
