//! Хранилище записей ведомости: SQLite через sea-orm или память (dry-run, тесты).

use std::collections::{HashMap, HashSet};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use tokio::sync::Mutex;

use crate::domain::a001_payroll_record::{
    repository as record_repository, IdentityFields, LedgerEntry, MutableFields, UpsertResult,
};
use crate::projections::p601_payroll_ledger::repository as ledger_repository;

/// Операции записи, которые должны быть атомарными на стороне хранилища
#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn exists_by_hash(&self, content_hash: &str) -> Result<bool>;

    /// `false`, если такой hash уже есть
    async fn insert_if_hash_absent(&self, entry: &LedgerEntry) -> Result<bool>;

    async fn upsert_by_identifier(
        &self,
        identifier: &str,
        set: &MutableFields,
        on_insert: &IdentityFields,
    ) -> Result<UpsertResult>;
}

pub struct SeaOrmSink {
    db: DatabaseConnection,
}

impl SeaOrmSink {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecordSink for SeaOrmSink {
    async fn exists_by_hash(&self, content_hash: &str) -> Result<bool> {
        ledger_repository::exists_by_hash(&self.db, content_hash).await
    }

    async fn insert_if_hash_absent(&self, entry: &LedgerEntry) -> Result<bool> {
        ledger_repository::insert_if_absent(&self.db, entry).await
    }

    async fn upsert_by_identifier(
        &self,
        identifier: &str,
        set: &MutableFields,
        on_insert: &IdentityFields,
    ) -> Result<UpsertResult> {
        record_repository::upsert_by_identifier(&self.db, identifier, set, on_insert).await
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    ledger: Vec<LedgerEntry>,
    hashes: HashSet<String>,
    records: HashMap<String, (IdentityFields, MutableFields)>,
    rejected: HashSet<String>,
}

/// Хранилище в памяти с той же семантикой, что и SQLite
#[derive(Debug, Default)]
pub struct MemorySink {
    state: Mutex<MemoryState>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Записи для этих идентификаторов завершаются ошибкой
    pub fn rejecting<I, S>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let state = MemoryState {
            rejected: identifiers.into_iter().map(Into::into).collect(),
            ..Default::default()
        };
        Self {
            state: Mutex::new(state),
        }
    }

    pub async fn ledger(&self) -> Vec<LedgerEntry> {
        self.state.lock().await.ledger.clone()
    }

    pub async fn record(&self, identifier: &str) -> Option<(IdentityFields, MutableFields)> {
        self.state.lock().await.records.get(identifier).cloned()
    }

    pub async fn record_count(&self) -> usize {
        self.state.lock().await.records.len()
    }
}

#[async_trait]
impl RecordSink for MemorySink {
    async fn exists_by_hash(&self, content_hash: &str) -> Result<bool> {
        Ok(self.state.lock().await.hashes.contains(content_hash))
    }

    async fn insert_if_hash_absent(&self, entry: &LedgerEntry) -> Result<bool> {
        let mut state = self.state.lock().await;
        if state.rejected.contains(&entry.identifier) {
            return Err(anyhow!("write rejected for {}", entry.identifier));
        }
        if !state.hashes.insert(entry.values.content_hash.clone()) {
            return Ok(false);
        }
        state.ledger.push(entry.clone());
        Ok(true)
    }

    async fn upsert_by_identifier(
        &self,
        identifier: &str,
        set: &MutableFields,
        on_insert: &IdentityFields,
    ) -> Result<UpsertResult> {
        let mut state = self.state.lock().await;
        if state.rejected.contains(identifier) {
            return Err(anyhow!("write rejected for {}", identifier));
        }
        if let Some((_, values)) = state.records.get_mut(identifier) {
            *values = set.clone();
            return Ok(UpsertResult {
                inserted: false,
                modified: true,
            });
        }
        state
            .records
            .insert(identifier.to_string(), (on_insert.clone(), set.clone()));
        Ok(UpsertResult {
            inserted: true,
            modified: false,
        })
    }
}
