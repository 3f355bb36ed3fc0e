use super::DataStore;
use crate::error::{Result, WherekitError};
use crate::record::Entity;
use uuid::Uuid;

/// Vec-backed store for tests. Keeps insertion order.
#[derive(Debug, Clone)]
pub struct InMemoryStore<T> {
    records: Vec<T>,
}

impl<T> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<T: Entity> InMemoryStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<T>) -> Self {
        Self { records }
    }
}

impl<T: Entity> DataStore<T> for InMemoryStore<T> {
    fn insert(&mut self, record: T) -> Result<()> {
        match self.records.iter_mut().find(|r| r.id() == record.id()) {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
        Ok(())
    }

    fn get(&self, id: &Uuid) -> Result<T> {
        self.records
            .iter()
            .find(|r| r.id() == *id)
            .cloned()
            .ok_or(WherekitError::RecordNotFound(*id))
    }

    fn all(&self) -> Result<Vec<T>> {
        Ok(self.records.clone())
    }

    fn remove(&mut self, ids: &[Uuid]) -> Result<usize> {
        let before = self.records.len();
        self.records.retain(|r| !ids.contains(&r.id()));
        Ok(before - self.records.len())
    }

    fn clear(&mut self) -> Result<usize> {
        let removed = self.records.len();
        self.records.clear();
        Ok(removed)
    }
}
