//! Persistent store for per-instance indicator parameters.
//!
//! The store exclusively owns the in-memory document and writes every
//! mutation through to durable storage immediately. A failed write leaves
//! the in-memory document unchanged, so readers never observe a partial
//! mutation.

pub mod defaults;
pub mod document;

pub use defaults::default_document;

use crate::models::{Category, IndicatorKey, ParamKind, ParameterDescriptor};
use document::{Document, InstanceNode};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing::{debug, info};

/// Store-level errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Document unreadable or unwritable
    #[error("document I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Document present but structurally malformed; fatal at open time
    #[error("document schema error: {0}")]
    Schema(String),

    /// Key or parameter absent from the document; recoverable
    #[error("not configured: {0}")]
    NotConfigured(String),

    /// Instance-id allocation collided; indicates a serialization bug
    #[error("duplicate id race for type {0}")]
    DuplicateIdRace(String),
}

struct StoreState {
    document: Document,
    path: PathBuf,
}

/// Reads and writes the hierarchical indicator configuration document.
///
/// All mutation goes through the internal mutex, which serializes
/// `duplicate` against concurrent `duplicate`/`set` calls so `max id + 1`
/// allocation never collides.
pub struct ParameterStore {
    state: Mutex<StoreState>,
}

impl ParameterStore {
    /// Open the document at `path`.
    ///
    /// A missing file is not an error: the store initializes empty so a
    /// first run can populate it from the shipped defaults. A malformed
    /// file is fatal here and only here.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let document = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            serde_json::from_str(&raw).map_err(|e| StoreError::Schema(e.to_string()))?
        } else {
            info!(path = %path.display(), "no configuration document, starting empty");
            Document::default()
        };
        Ok(Self {
            state: Mutex::new(StoreState { document, path }),
        })
    }

    /// Build a store from an in-memory document, persisting it immediately
    pub fn create(path: impl AsRef<Path>, document: Document) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        persist(&path, &document)?;
        Ok(Self {
            state: Mutex::new(StoreState { document, path }),
        })
    }

    /// Populate an empty store with `defaults`; no-op when the document
    /// already has content. Returns whether defaults were written.
    pub fn populate_if_empty(&self, defaults: Document) -> Result<bool, StoreError> {
        let mut state = self.lock();
        if !state.document.indicators.is_empty() {
            return Ok(false);
        }
        persist(&state.path, &defaults)?;
        state.document = defaults;
        info!("populated configuration document with shipped defaults");
        Ok(true)
    }

    /// Point lookup of a raw parameter value
    pub fn get(&self, key: &IndicatorKey, name: &str) -> Result<String, StoreError> {
        let state = self.lock();
        state
            .document
            .instance(key)
            .and_then(|i| i.param(name))
            .map(|p| p.value.clone())
            .ok_or_else(|| StoreError::NotConfigured(format!("{key}/{name}")))
    }

    /// Point write with immediate flush to durable storage.
    ///
    /// Mutates a clone of the document, persists it, and only then commits
    /// the clone to memory. An existing descriptor keeps its kind; a new
    /// name is stored as a string descriptor. The instance itself must
    /// already exist.
    pub fn set(&self, key: &IndicatorKey, name: &str, value: &str) -> Result<(), StoreError> {
        let mut state = self.lock();
        let mut candidate = state.document.clone();
        let instance = candidate
            .instance_mut(key)
            .ok_or_else(|| StoreError::NotConfigured(key.to_string()))?;
        match instance.param_mut(name) {
            Some(param) => param.value = value.to_string(),
            None => instance
                .params
                .push(ParameterDescriptor::new(name, ParamKind::String, value)),
        }
        persist(&state.path, &candidate)?;
        state.document = candidate;
        debug!(indicator = %key, param = name, "parameter written");
        Ok(())
    }

    /// Category attribute of an instance's type node, `Default` when the
    /// document carries none. Never errors for a missing node.
    pub fn category(&self, key: &IndicatorKey) -> Category {
        let state = self.lock();
        state
            .document
            .indicator(&key.type_id)
            .and_then(|n| n.category.as_deref())
            .map(Category::parse)
            .unwrap_or(Category::Default)
    }

    /// Every configured `(type, id)` pair, in document order
    pub fn all_keys(&self) -> Vec<IndicatorKey> {
        self.lock().document.all_keys()
    }

    /// Whether the document has an instance node for `key`
    pub fn contains(&self, key: &IndicatorKey) -> bool {
        self.lock().document.instance(key).is_some()
    }

    /// Clone the full instance node, assign `max(existing ids) + 1` for the
    /// type, persist, and return the new key.
    pub fn duplicate(&self, key: &IndicatorKey) -> Result<IndicatorKey, StoreError> {
        let mut state = self.lock();
        let mut candidate = state.document.clone();
        let node = candidate
            .indicator_mut(&key.type_id)
            .ok_or_else(|| StoreError::NotConfigured(key.to_string()))?;
        let source = node
            .instances
            .iter()
            .find(|i| i.id == key.instance_id)
            .cloned()
            .ok_or_else(|| StoreError::NotConfigured(key.to_string()))?;
        let next_id = node
            .instances
            .iter()
            .map(|i| i.id)
            .max()
            .map_or(1, |max| max + 1);
        if node.instances.iter().any(|i| i.id == next_id) {
            // Unreachable while mutation stays behind the store mutex.
            debug_assert!(false, "instance id collision for {}", key.type_id);
            return Err(StoreError::DuplicateIdRace(key.type_id.clone()));
        }
        node.instances.push(InstanceNode {
            id: next_id,
            ..source
        });
        persist(&state.path, &candidate)?;
        state.document = candidate;
        let new_key = IndicatorKey::new(key.type_id.clone(), next_id);
        info!(source = %key, duplicated = %new_key, "instance duplicated");
        Ok(new_key)
    }

    /// All descriptors for one instance, including a synthesized `id`
    /// descriptor so editors can display the id uniformly with the rest.
    pub fn parameters_for(
        &self,
        key: &IndicatorKey,
    ) -> Result<BTreeMap<String, ParameterDescriptor>, StoreError> {
        let state = self.lock();
        let instance = state
            .document
            .instance(key)
            .ok_or_else(|| StoreError::NotConfigured(key.to_string()))?;
        let mut map: BTreeMap<String, ParameterDescriptor> = instance
            .params
            .iter()
            .map(|p| (p.name.clone(), p.clone()))
            .collect();
        map.insert(
            "id".to_string(),
            ParameterDescriptor::new("id", ParamKind::Integer, instance.id.to_string()),
        );
        Ok(map)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreState> {
        // Store state stays valid even if a writer panicked mid-call: the
        // in-memory document is only committed after a successful persist.
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Serialize and flush the document: write to a sibling temp file, then
/// rename over the target so readers never see a torn document.
fn persist(path: &Path, document: &Document) -> Result<(), StoreError> {
    let raw = serde_json::to_string_pretty(document)
        .map_err(|e| StoreError::Schema(e.to_string()))?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, raw)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
