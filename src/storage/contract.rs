//! The backend-agnostic registry contract.
//!
//! A [`Record`] describes one entity kind (its key field, its draft and patch
//! shapes, where it lives in the settings document). A [`Registry`] is the
//! set of operations every storage backend provides for a record kind.

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use super::error::RegistryResult;

/// An entity kind stored in the registry.
///
/// Both backends create and patch records exclusively through
/// [`Record::from_draft`] and [`Record::apply`], so field defaults and
/// partial-update semantics cannot drift between them.
pub trait Record: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Human-readable kind, used in error messages.
    const KIND: &'static str;

    /// Name of the externally unique key field.
    const KEY_FIELD: &'static str;

    /// Top-level field of the settings document holding this kind.
    const COLLECTION: &'static str;

    /// Creation input: the record without its `id`.
    type Draft: Send + 'static;

    /// Partial update input: only supplied fields change.
    type Patch: Send + 'static;

    fn id(&self) -> &str;

    fn key(&self) -> &str;

    fn is_enabled(&self) -> bool;

    fn draft_key(draft: &Self::Draft) -> &str;

    fn patch_key(patch: &Self::Patch) -> Option<&str>;

    /// Build a new record from a draft and a freshly assigned id.
    fn from_draft(id: String, draft: Self::Draft) -> Self;

    /// Apply a partial patch in place.
    fn apply(&mut self, patch: Self::Patch);

    /// The new key a patch would set, if it differs from the current one.
    fn key_change<'p>(&self, patch: &'p Self::Patch) -> Option<&'p str> {
        Self::patch_key(patch).filter(|key| *key != self.key())
    }
}

/// Storage operations for one record kind.
///
/// Lookups return `None` on a miss and never fail for "not found".
/// Implementations must serialize their check-then-write sections so two
/// concurrent creates with the same key cannot both succeed.
#[async_trait]
pub trait Registry<R: Record>: Send + Sync {
    /// All records, in insertion order.
    async fn find_all(&self) -> RegistryResult<Vec<R>>;

    /// Records whose `enabled` flag is true (or absent).
    async fn find_enabled(&self) -> RegistryResult<Vec<R>> {
        let records = self.find_all().await?;
        Ok(records.into_iter().filter(|r| r.is_enabled()).collect())
    }

    async fn find_by_id(&self, id: &str) -> RegistryResult<Option<R>>;

    async fn find_by_key(&self, key: &str) -> RegistryResult<Option<R>>;

    /// Create a record, assigning a new id.
    ///
    /// Fails with `DuplicateKey` if the key is already taken.
    async fn create(&self, draft: R::Draft) -> RegistryResult<R>;

    /// Patch a record. Returns `Ok(None)` if `id` does not exist.
    async fn update(&self, id: &str, patch: R::Patch) -> RegistryResult<Option<R>>;

    /// Hard-delete a record. Returns whether a record was removed.
    async fn delete(&self, id: &str) -> RegistryResult<bool>;
}

/// Generate an opaque record identifier.
pub(crate) fn generate_id() -> String {
    Uuid::new_v4().to_string()
}
