//! Order and recipient collections.
//!
//! Wraps the injected blob store with typed access and a single write
//! lock, so read-modify-write cycles from concurrent requests never
//! interleave.

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use crate::domain::employees::EmployeeRecord;
use crate::domain::orders::OrderRecord;
use crate::services::store::{self, keys, BlobStore};

#[derive(Clone)]
pub struct RecordStore {
    store: Arc<dyn BlobStore>,
    writer: Arc<Mutex<()>>,
}

impl RecordStore {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self {
            store,
            writer: Arc::new(Mutex::new(())),
        }
    }

    /// Hold while loading, changing and saving a collection.
    pub async fn write_lock(&self) -> MutexGuard<'_, ()> {
        self.writer.lock().await
    }

    pub async fn orders(&self) -> Vec<OrderRecord> {
        store::load_list(self.store.as_ref(), keys::ORDERS).await
    }

    /// Orders to change and save back. Fails when the store cannot be read.
    pub async fn orders_for_update(&self) -> Result<Vec<OrderRecord>> {
        store::load_list_for_update(self.store.as_ref(), keys::ORDERS).await
    }

    pub async fn save_orders(&self, orders: &[OrderRecord]) -> Result<()> {
        store::save_list(self.store.as_ref(), keys::ORDERS, orders).await
    }

    pub async fn employees(&self) -> Vec<EmployeeRecord> {
        store::load_list(self.store.as_ref(), keys::EMPLOYEES).await
    }

    /// Recipients to change and save back. Fails when the store cannot be read.
    pub async fn employees_for_update(&self) -> Result<Vec<EmployeeRecord>> {
        store::load_list_for_update(self.store.as_ref(), keys::EMPLOYEES).await
    }

    pub async fn save_employees(&self, employees: &[EmployeeRecord]) -> Result<()> {
        store::save_list(self.store.as_ref(), keys::EMPLOYEES, employees).await
    }

    pub async fn health_check(&self) -> Result<()> {
        self.store.health_check().await
    }
}
