//! In-memory collection
//!
//! Keeps documents in insertion order behind a shared `RwLock` and executes
//! finds and counts against them.

use super::document::{generate_id, project, Document, Record, ID_FIELD};
use super::filter::{compare_optional, get_path, get_path_mut, Filter};
use crate::collection::Collection;
use crate::error::{Error, Result};
use crate::query::{FindQuery, SortSpec};
use crate::types::{JsonObject, JsonValue};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, trace};

/// A cloneable handle to an in-memory document collection
///
/// Clones share the same documents. Reference fields registered with
/// [`MemoryCollection::with_reference`] can be populated from another
/// collection.
#[derive(Debug, Clone)]
pub struct MemoryCollection {
    /// Collection name
    name: Arc<str>,
    /// Documents in insertion order
    documents: Arc<RwLock<Vec<Document>>>,
    /// Reference field -> target collection
    references: HashMap<String, MemoryCollection>,
}

impl MemoryCollection {
    /// Create an empty collection
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Arc::from(name.into()),
            documents: Arc::new(RwLock::new(Vec::new())),
            references: HashMap::new(),
        }
    }

    /// Declare that `field` (dotted paths allowed) holds ids of documents in
    /// `target`
    #[must_use]
    pub fn with_reference(mut self, field: impl Into<String>, target: &MemoryCollection) -> Self {
        self.references.insert(field.into(), target.clone());
        self
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Insert one document and return its id
    pub async fn insert(&self, document: JsonValue) -> Result<String> {
        let mut documents = self.documents.write().await;
        let document = prepare(&documents, document)?;
        let id = document.id().to_string();
        documents.push(document);
        Ok(id)
    }

    /// Insert several documents in order and return their ids
    ///
    /// Nothing is inserted if any document is rejected.
    pub async fn insert_many<I>(&self, batch: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = JsonValue>,
    {
        let mut documents = self.documents.write().await;
        let start = documents.len();

        for value in batch {
            match prepare(&documents, value) {
                Ok(document) => documents.push(document),
                Err(e) => {
                    documents.truncate(start);
                    return Err(e);
                }
            }
        }

        Ok(documents[start..]
            .iter()
            .map(|d| d.id().to_string())
            .collect())
    }

    /// Remove every document matching `filter` and return how many went
    pub async fn remove(&self, filter: &JsonValue) -> Result<u64> {
        let filter = Filter::parse(filter)?;
        let mut documents = self.documents.write().await;
        let before = documents.len();
        documents.retain(|d| !filter.matches(d.data()));
        Ok((before - documents.len()) as u64)
    }

    /// Remove every document
    pub async fn clear(&self) {
        self.documents.write().await.clear();
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Number of stored documents
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    /// Check if no documents are stored
    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }

    /// Look up a document by id
    pub async fn get(&self, id: &str) -> Option<Document> {
        self.documents
            .read()
            .await
            .iter()
            .find(|d| d.id() == id)
            .cloned()
    }

    fn parse_filter(&self, filter: &JsonValue) -> Result<Filter> {
        Filter::parse(filter).inspect_err(|e| debug!("Rejected filter for {}: {}", self.name, e))
    }

    /// Replace the ids held in `field` (a dotted path) with the referenced
    /// documents
    async fn populate(&self, field: &str, page: &mut [JsonObject]) -> Result<()> {
        let target = self
            .references
            .get(field)
            .ok_or_else(|| Error::populate(field, "no reference registered for this field"))?;

        let documents = target.documents.read().await;
        let by_id: HashMap<&str, &Document> = documents.iter().map(|d| (d.id(), d)).collect();
        let resolve = |id: &str| by_id.get(id).map(|d| JsonValue::Object(d.data().clone()));

        for data in page.iter_mut() {
            let Some(value) = get_path_mut(data, field) else {
                continue;
            };
            let resolved = match &*value {
                JsonValue::String(id) => resolve(id).unwrap_or_else(|| {
                    trace!("Dangling reference {}.{} -> {}", self.name, field, id);
                    JsonValue::Null
                }),
                JsonValue::Array(ids) => JsonValue::Array(
                    ids.iter()
                        .filter_map(|id| id.as_str().and_then(resolve))
                        .collect(),
                ),
                _ => continue,
            };
            *value = resolved;
        }

        Ok(())
    }
}

/// Validate a new document and assign its id
fn prepare(existing: &[Document], value: JsonValue) -> Result<Document> {
    let JsonValue::Object(mut fields) = value else {
        return Err(Error::InvalidDocument {
            message: "documents must be JSON objects".to_string(),
        });
    };

    let id = match fields.remove(ID_FIELD) {
        None => generate_id(),
        Some(JsonValue::String(id)) => id,
        Some(_) => {
            return Err(Error::InvalidDocument {
                message: format!("{ID_FIELD} must be a string"),
            })
        }
    };
    if existing.iter().any(|d| d.id() == id) {
        return Err(Error::DuplicateId { id });
    }

    let mut data = JsonObject::with_capacity(fields.len() + 1);
    data.insert(ID_FIELD.to_string(), JsonValue::String(id.clone()));
    data.extend(fields);
    Ok(Document::new(id, data))
}

/// Stable multi-key sort
fn sort_documents(documents: &mut [&Document], sort: &SortSpec) {
    documents.sort_by(|a, b| {
        sort.keys()
            .iter()
            .map(|key| {
                let ordering =
                    compare_optional(get_path(a.data(), &key.field), get_path(b.data(), &key.field));
                key.direction.apply(ordering)
            })
            .find(|o| o.is_ne())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

fn to_usize(n: u64) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}

#[async_trait]
impl Collection for MemoryCollection {
    type Filter = JsonValue;
    type Document = Record;
    type Error = Error;

    fn name(&self) -> &str {
        &self.name
    }

    async fn find(&self, query: FindQuery<'_, JsonValue>) -> Result<Vec<Record>> {
        let filter = self.parse_filter(query.filter)?;

        // Copy the page out so populate never reads while this lock is held
        let page: Vec<Document> = {
            let documents = self.documents.read().await;
            let mut matched: Vec<&Document> =
                documents.iter().filter(|d| filter.matches(d.data())).collect();
            if let Some(sort) = &query.sort {
                sort_documents(&mut matched, sort);
            }
            matched
                .into_iter()
                .skip(to_usize(query.skip))
                .take(query.limit.map_or(usize::MAX, to_usize))
                .cloned()
                .collect()
        };

        let mut data: Vec<JsonObject> = page
            .iter()
            .map(|d| match &query.projection {
                Some(projection) => project(d.data(), projection),
                None => d.data().clone(),
            })
            .collect();

        for field in &query.populate {
            self.populate(field, &mut data).await?;
        }

        Ok(if query.lean {
            data.into_iter().map(Record::Lean).collect()
        } else {
            page.iter()
                .zip(data)
                .map(|(document, data)| Record::Document(document.with_data(data)))
                .collect()
        })
    }

    async fn count(&self, filter: &JsonValue) -> Result<u64> {
        let filter = self.parse_filter(filter)?;
        let documents = self.documents.read().await;
        Ok(documents.iter().filter(|d| filter.matches(d.data())).count() as u64)
    }
}
