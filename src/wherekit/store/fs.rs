use super::DataStore;
use crate::error::{Result, WherekitError};
use crate::record::Entity;
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

/// JSON-file store. Each entity type gets its own `<root>/<NAME>.json`,
/// which is read in full on every access and rewritten on every change.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn data_file<T: Entity>(&self) -> PathBuf {
        self.root.join(format!("{}.json", T::NAME))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(WherekitError::Io)?;
        }
        Ok(())
    }

    fn load<T: Entity>(&self) -> Result<Vec<T>> {
        let data_file = self.data_file::<T>();
        if !data_file.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(data_file).map_err(WherekitError::Io)?;
        let records: Vec<T> =
            serde_json::from_str(&content).map_err(WherekitError::Serialization)?;
        Ok(records)
    }

    fn save<T: Entity>(&self, records: &[T]) -> Result<()> {
        self.ensure_dir()?;
        let content = serde_json::to_string_pretty(records).map_err(WherekitError::Serialization)?;
        fs::write(self.data_file::<T>(), content).map_err(WherekitError::Io)?;
        Ok(())
    }
}

impl<T: Entity> DataStore<T> for FileStore {
    fn insert(&mut self, record: T) -> Result<()> {
        let mut records = self.load::<T>()?;
        match records.iter_mut().find(|r| r.id() == record.id()) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
        self.save(&records)
    }

    fn get(&self, id: &Uuid) -> Result<T> {
        self.load::<T>()?
            .into_iter()
            .find(|r| r.id() == *id)
            .ok_or(WherekitError::RecordNotFound(*id))
    }

    fn all(&self) -> Result<Vec<T>> {
        self.load()
    }

    fn remove(&mut self, ids: &[Uuid]) -> Result<usize> {
        let mut records = self.load::<T>()?;
        let before = records.len();
        records.retain(|r| !ids.contains(&r.id()));
        let removed = before - records.len();
        if removed > 0 {
            self.save(&records)?;
        }
        Ok(removed)
    }

    fn clear(&mut self) -> Result<usize> {
        let removed = self.load::<T>()?.len();
        self.save::<T>(&[])?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clauses::Where;
    use crate::model::{keys, Palette};
    use crate::request::FetchRequest;
    use tempfile::tempdir;

    #[test]
    fn missing_file_is_empty_store() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));
        let all: Vec<Palette> = store.all().unwrap();
        assert!(all.is_empty());
    }

    #[test]
    fn persists_across_instances() {
        let dir = tempdir().unwrap();
        let p = Palette::new("Ochre", 40, 0.7, 0.6);
        {
            let mut store = FileStore::new(dir.path());
            store.insert(p.clone()).unwrap();
        }

        let store = FileStore::new(dir.path());
        assert!(store.data_file::<Palette>().ends_with("Palette.json"));
        let loaded: Palette = store.get(&p.id).unwrap();
        assert_eq!(loaded, p);
    }

    #[test]
    fn delete_request_rewrites_file() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        for (name, hue) in [("Lime", 90), ("Teal", 180), ("Azure", 210)] {
            store.insert(Palette::new(name, hue, 0.5, 0.5)).unwrap();
        }

        let request =
            FetchRequest::delete::<Palette>().with(&Where::format("hue >= %d", vec![150.into()]));
        let removed: Vec<Palette> = store.delete(&request).unwrap();
        assert_eq!(removed.len(), 2);

        let reopened = FileStore::new(dir.path());
        let count = DataStore::<Palette>::count(&reopened, &FetchRequest::query::<Palette>()).unwrap();
        assert_eq!(count, 1);
        let left: Vec<Palette> = reopened
            .fetch(&FetchRequest::fetch::<Palette>().with(&Where::eq(keys::COLOR_NAME, "Lime")))
            .unwrap();
        assert_eq!(left.len(), 1);
    }
}
