//! File-backed registry.
//!
//! Every record kind lives as one array inside a shared JSON settings
//! document that also carries unrelated configuration. Each mutation loads
//! the whole document, rewrites one array and saves the whole document back,
//! all while holding the document's lock. The document is owned by a single
//! process; there is no cross-process locking.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::contract::{Record, Registry, generate_id};
use super::error::{BackendError, RegistryError, RegistryResult};

/// Result of a mutation closure: whether the document must be written back.
pub(crate) enum Outcome<T> {
    Changed(T),
    Unchanged(T),
}

/// Handle to the on-disk settings document.
///
/// Clone the `Arc` to share one handle between the prompt and resource
/// registries; they must serialize on the same lock.
#[derive(Debug)]
pub struct SettingsFile {
    path: PathBuf,
    lock: Mutex<()>,
}

impl SettingsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the whole document. A missing file is an empty document.
    pub async fn load(&self) -> RegistryResult<Map<String, Value>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Settings file {:?} not found, using empty document", self.path);
                return Ok(Map::new());
            }
            Err(e) => return Err(e.into()),
        };

        if raw.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str(&raw)? {
            Value::Object(map) => Ok(map),
            _ => Err(BackendError::InvalidData(format!(
                "settings document {:?} is not a JSON object",
                self.path
            ))
            .into()),
        }
    }

    /// Write the whole document.
    ///
    /// The document goes to a sibling temp file, is synced to disk, and only
    /// then renamed over the target, so readers and later calls never see a
    /// half-written file even if this future is dropped or the host crashes.
    pub async fn save(&self, document: &Map<String, Value>) -> RegistryResult<()> {
        let body = serde_json::to_string_pretty(document)?;
        let tmp = self.temp_path();

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(body.as_bytes()).await?;
        file.flush().await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Read one collection of the document.
    pub(crate) async fn read<R: Record>(&self) -> RegistryResult<Vec<R>> {
        let document = self.load().await?;
        collection_from(&document, R::COLLECTION)
    }

    /// Run a load-modify-save cycle over one collection under the lock.
    ///
    /// The document is only written back when the closure reports a change.
    pub(crate) async fn modify<R, T, F>(&self, f: F) -> RegistryResult<T>
    where
        R: Record,
        F: FnOnce(&mut Vec<R>) -> RegistryResult<Outcome<T>>,
    {
        let _guard = self.lock.lock().await;

        let mut document = self.load().await?;
        let mut records: Vec<R> = collection_from(&document, R::COLLECTION)?;

        match f(&mut records)? {
            Outcome::Changed(value) => {
                document.insert(R::COLLECTION.to_string(), serde_json::to_value(&records)?);
                self.save(&document).await?;
                Ok(value)
            }
            Outcome::Unchanged(value) => Ok(value),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

fn collection_from<R: Record>(
    document: &Map<String, Value>,
    field: &str,
) -> RegistryResult<Vec<R>> {
    match document.get(field) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(value) => Ok(serde_json::from_value(value.clone())?),
    }
}

/// A [`Registry`] persisting one record kind inside the settings document.
pub struct FileRegistry<R> {
    settings: Arc<SettingsFile>,
    _kind: PhantomData<fn() -> R>,
}

impl<R: Record> FileRegistry<R> {
    pub fn new(settings: Arc<SettingsFile>) -> Self {
        info!(
            "Using settings file {:?} for built-in {}s",
            settings.path(),
            R::KIND
        );
        Self {
            settings,
            _kind: PhantomData,
        }
    }
}

#[async_trait]
impl<R: Record> Registry<R> for FileRegistry<R> {
    async fn find_all(&self) -> RegistryResult<Vec<R>> {
        self.settings.read::<R>().await
    }

    async fn find_by_id(&self, id: &str) -> RegistryResult<Option<R>> {
        let records = self.settings.read::<R>().await?;
        Ok(records.into_iter().find(|r| r.id() == id))
    }

    async fn find_by_key(&self, key: &str) -> RegistryResult<Option<R>> {
        let records = self.settings.read::<R>().await?;
        Ok(records.into_iter().find(|r| r.key() == key))
    }

    async fn create(&self, draft: R::Draft) -> RegistryResult<R> {
        let created = self
            .settings
            .modify::<R, _, _>(|records| {
                let key = R::draft_key(&draft);
                if records.iter().any(|r| r.key() == key) {
                    return Err(RegistryError::duplicate::<R>(key));
                }

                let record = R::from_draft(generate_id(), draft);
                records.push(record.clone());
                Ok(Outcome::Changed(record))
            })
            .await?;

        debug!("Created built-in {} '{}'", R::KIND, created.key());
        Ok(created)
    }

    async fn update(&self, id: &str, patch: R::Patch) -> RegistryResult<Option<R>> {
        self.settings
            .modify::<R, _, _>(|records| {
                let Some(index) = records.iter().position(|r| r.id() == id) else {
                    return Ok(Outcome::Unchanged(None));
                };

                if let Some(key) = records[index].key_change(&patch) {
                    if records.iter().any(|r| r.key() == key) {
                        return Err(RegistryError::duplicate::<R>(key));
                    }
                }

                records[index].apply(patch);
                Ok(Outcome::Changed(Some(records[index].clone())))
            })
            .await
    }

    async fn delete(&self, id: &str) -> RegistryResult<bool> {
        self.settings
            .modify::<R, _, _>(|records| {
                let Some(index) = records.iter().position(|r| r.id() == id) else {
                    return Ok(Outcome::Unchanged(false));
                };
                records.remove(index);
                Ok(Outcome::Changed(true))
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::prompts::{NewPrompt, Prompt, PromptPatch};
    use crate::domains::resources::{NewResource, Resource};
    use tempfile::TempDir;

    fn settings_in(dir: &TempDir) -> Arc<SettingsFile> {
        Arc::new(SettingsFile::new(dir.path().join("mcp_settings.json")))
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let registry = FileRegistry::<Prompt>::new(settings_in(&dir));
        assert!(registry.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unrelated_settings_survive_writes() {
        let dir = TempDir::new().unwrap();
        let settings = settings_in(&dir);
        std::fs::write(
            settings.path(),
            r#"{"mcpServers":{"fetch":{"command":"uvx"}},"systemConfig":{"routing":true}}"#,
        )
        .unwrap();

        let prompts = FileRegistry::<Prompt>::new(settings.clone());
        prompts.create(NewPrompt::new("summarize", "Summarize: {{text}}")).await.unwrap();

        let document = settings.load().await.unwrap();
        assert_eq!(document["mcpServers"]["fetch"]["command"], "uvx");
        assert_eq!(document["systemConfig"]["routing"], true);
        assert_eq!(document["prompts"].as_array().unwrap().len(), 1);
        assert!(!dir.path().join("mcp_settings.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_save_replaces_document_without_leftover_temp_file() {
        let dir = TempDir::new().unwrap();
        let settings = Arc::new(SettingsFile::new(dir.path().join("nested/mcp_settings.json")));

        let mut first = Map::new();
        first.insert("systemConfig".into(), serde_json::json!({"routing": true}));
        settings.save(&first).await.unwrap();

        let mut second = first.clone();
        second.insert("prompts".into(), serde_json::json!([]));
        settings.save(&second).await.unwrap();

        assert_eq!(settings.load().await.unwrap(), second);
        assert!(!dir.path().join("nested/mcp_settings.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_kinds_share_one_document() {
        let dir = TempDir::new().unwrap();
        let settings = settings_in(&dir);
        let prompts = FileRegistry::<Prompt>::new(settings.clone());
        let resources = FileRegistry::<Resource>::new(settings.clone());

        let (p, r) = tokio::join!(
            prompts.create(NewPrompt::new("a", "x")),
            resources.create(NewResource::new("res://a", "hi")),
        );
        p.unwrap();
        r.unwrap();

        let document = settings.load().await.unwrap();
        assert_eq!(document["prompts"].as_array().unwrap().len(), 1);
        assert_eq!(document["resources"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_creates_with_same_key_admit_one() {
        let dir = TempDir::new().unwrap();
        let registry = Arc::new(FileRegistry::<Prompt>::new(settings_in(&dir)));

        let mut handles = Vec::new();
        for i in 0..8 {
            let registry = registry.clone();
            handles.push(tokio::spawn(async move {
                registry
                    .create(NewPrompt::new("same", format!("body {i}")))
                    .await
            }));
        }

        let mut created = 0;
        let mut duplicates = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(e) if e.is_duplicate_key() => duplicates += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(duplicates, 7);
        assert_eq!(registry.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_noop_calls_do_not_create_file() {
        let dir = TempDir::new().unwrap();
        let settings = settings_in(&dir);
        let registry = FileRegistry::<Prompt>::new(settings.clone());

        assert!(!registry.delete("missing").await.unwrap());
        assert!(
            registry
                .update("missing", PromptPatch::default())
                .await
                .unwrap()
                .is_none()
        );
        assert!(!settings.path().exists());
    }

    #[tokio::test]
    async fn test_non_object_document_is_backend_failure() {
        let dir = TempDir::new().unwrap();
        let settings = settings_in(&dir);
        std::fs::write(settings.path(), "[1, 2, 3]").unwrap();

        let registry = FileRegistry::<Prompt>::new(settings);
        let err = registry.find_all().await.unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Backend(BackendError::InvalidData(_))
        ));
    }

    #[tokio::test]
    async fn test_hand_written_entries_without_enabled_are_enabled() {
        let dir = TempDir::new().unwrap();
        let settings = settings_in(&dir);
        std::fs::write(
            settings.path(),
            r#"{"resources":[{"id":"r1","uri":"res://a","content":"hi"},
                {"id":"r2","uri":"res://b","content":"off","enabled":false}]}"#,
        )
        .unwrap();

        let registry = FileRegistry::<Resource>::new(settings);
        let enabled = registry.find_enabled().await.unwrap();
        assert_eq!(enabled.len(), 1);
        assert_eq!(enabled[0].uri, "res://a");
        assert_eq!(registry.find_all().await.unwrap().len(), 2);
    }
}
