use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value;

use super::{Document, DocumentCollection, StoreError};

#[derive(Debug)]
struct Slot<D> {
    seq: u64,
    doc: D,
}

#[derive(Debug)]
struct Inner<D: Document> {
    next_seq: u64,
    docs: HashMap<D::Id, Slot<D>>,
}

/// In-memory document collection.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug)]
pub struct InMemoryCollection<D: Document> {
    inner: RwLock<Inner<D>>,
}

impl<D: Document> InMemoryCollection<D> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_seq: 0,
                docs: HashMap::new(),
            }),
        }
    }

    /// Seed a collection with existing documents (duplicates overwrite).
    pub fn with_documents(docs: impl IntoIterator<Item = D>) -> Self {
        let collection = Self::new();
        if let Ok(mut inner) = collection.inner.write() {
            for doc in docs {
                let seq = inner.next_seq;
                inner.next_seq += 1;
                inner.docs.insert(*doc.id(), Slot { seq, doc });
            }
        }
        collection
    }

    fn ordered(&self, mut keep: impl FnMut(&D) -> Result<bool, StoreError>) -> Result<Vec<D>, StoreError> {
        let inner = self.inner.read().map_err(|_| poisoned("list"))?;
        let mut hits = Vec::new();
        for slot in inner.docs.values() {
            if keep(&slot.doc)? {
                hits.push((slot.seq, slot.doc.clone()));
            }
        }
        hits.sort_by_key(|(seq, _)| *seq);
        Ok(hits.into_iter().map(|(_, doc)| doc).collect())
    }

    /// Rewrite one array field of a stored document under a single write guard.
    fn edit_array(
        &self,
        operation: &'static str,
        id: &D::Id,
        field: &str,
        edit: impl FnOnce(&mut Vec<Value>),
    ) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().map_err(|_| poisoned(operation))?;
        let Some(slot) = inner.docs.get_mut(id) else {
            return Ok(false);
        };

        let mut json = serde_json::to_value(&slot.doc)?;
        let Some(object) = json.as_object_mut() else {
            return Err(StoreError::Database {
                operation,
                message: "document is not a JSON object".to_string(),
            });
        };
        let mut items = match object.remove(field) {
            Some(Value::Array(items)) => items,
            None | Some(Value::Null) => Vec::new(),
            Some(_) => {
                return Err(StoreError::Database {
                    operation,
                    message: format!("field {field:?} is not an array"),
                });
            }
        };
        edit(&mut items);
        object.insert(field.to_string(), Value::Array(items));

        slot.doc = serde_json::from_value(json)?;
        Ok(true)
    }
}

impl<D: Document> Default for InMemoryCollection<D> {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned(operation: &'static str) -> StoreError {
    StoreError::Database {
        operation,
        message: "in-memory collection lock poisoned".to_string(),
    }
}

#[async_trait::async_trait]
impl<D: Document> DocumentCollection<D> for InMemoryCollection<D> {
    async fn find_by_id(&self, id: &D::Id) -> Result<Option<D>, StoreError> {
        let inner = self.inner.read().map_err(|_| poisoned("find_by_id"))?;
        Ok(inner.docs.get(id).map(|slot| slot.doc.clone()))
    }

    async fn insert(&self, doc: D) -> Result<D, StoreError> {
        let mut inner = self.inner.write().map_err(|_| poisoned("insert"))?;
        let id = *doc.id();
        if inner.docs.contains_key(&id) {
            return Err(StoreError::Duplicate {
                collection: D::COLLECTION,
                id: id.to_string(),
            });
        }
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.docs.insert(id, Slot { seq, doc: doc.clone() });
        Ok(doc)
    }

    async fn find_by_id_and_delete(&self, id: &D::Id) -> Result<Option<D>, StoreError> {
        let mut inner = self.inner.write().map_err(|_| poisoned("find_by_id_and_delete"))?;
        Ok(inner.docs.remove(id).map(|slot| slot.doc))
    }

    async fn push_reference(&self, id: &D::Id, field: &str, reference: &str) -> Result<bool, StoreError> {
        self.edit_array("push_reference", id, field, |items| {
            items.push(Value::String(reference.to_string()));
        })
    }

    async fn pull_reference(&self, id: &D::Id, field: &str, reference: &str) -> Result<bool, StoreError> {
        self.edit_array("pull_reference", id, field, |items| {
            items.retain(|item| item.as_str() != Some(reference));
        })
    }

    async fn find_where(
        &self,
        field: &str,
        value: &serde_json::Value,
    ) -> Result<Vec<D>, StoreError> {
        self.ordered(|doc| {
            let json = serde_json::to_value(doc)?;
            Ok(json.get(field) == Some(value))
        })
    }

    async fn list(&self) -> Result<Vec<D>, StoreError> {
        self.ordered(|_| Ok(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use storefront_catalog::{Firm, NewFirm, NewProduct, Product};
    use storefront_core::{Entity, FirmId, ProductId, VendorId};

    fn product(firm: FirmId, name: &str) -> Product {
        Product::create(
            ProductId::new(),
            firm,
            NewProduct {
                product_name: name.to_string(),
                price: "10".to_string(),
                ..NewProduct::default()
            },
        )
        .unwrap()
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_id() {
        let store = InMemoryCollection::<Product>::new();
        let p = product(FirmId::new(), "Idli");
        store.insert(p.clone()).await.unwrap();

        let err = store.insert(p).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { collection: "products", .. }));
    }

    #[tokio::test]
    async fn find_where_matches_field_in_insertion_order() {
        let store = InMemoryCollection::<Product>::new();
        let firm = FirmId::new();
        let a = store.insert(product(firm, "Idli")).await.unwrap();
        store.insert(product(FirmId::new(), "Vada")).await.unwrap();
        let b = store.insert(product(firm, "Dosa")).await.unwrap();

        let hits = store
            .find_where("firm", &serde_json::json!(firm.to_string()))
            .await
            .unwrap();
        assert_eq!(hits, vec![a, b]);
    }

    #[tokio::test]
    async fn find_by_id_and_delete_removes_once() {
        let store = InMemoryCollection::<Product>::new();
        let p = store.insert(product(FirmId::new(), "Idli")).await.unwrap();

        let removed = store.find_by_id_and_delete(p.id()).await.unwrap();
        assert_eq!(removed, Some(p.clone()));
        assert_eq!(store.find_by_id_and_delete(p.id()).await.unwrap(), None);
        assert_eq!(store.find_by_id(p.id()).await.unwrap(), None);
    }

    fn firm() -> Firm {
        Firm::create(
            FirmId::new(),
            VendorId::new(),
            NewFirm {
                firm_name: "Udupi Corner".to_string(),
                area: "Jayanagar".to_string(),
                ..NewFirm::default()
            },
        )
        .unwrap()
    }

    #[tokio::test]
    async fn push_and_pull_reference_edit_the_array_in_place() {
        let store = InMemoryCollection::<Firm>::new();
        let f = store.insert(firm()).await.unwrap();
        let a = ProductId::new();
        let b = ProductId::new();

        assert!(store.push_reference(f.id(), "products", &a.to_string()).await.unwrap());
        assert!(store.push_reference(f.id(), "products", &b.to_string()).await.unwrap());
        assert!(store.pull_reference(f.id(), "products", &a.to_string()).await.unwrap());

        let stored = store.find_by_id(f.id()).await.unwrap().unwrap();
        assert_eq!(stored.products(), &[b]);
        assert_eq!(stored.firm_name(), "Udupi Corner");
    }

    #[tokio::test]
    async fn push_reference_reports_missing_document() {
        let store = InMemoryCollection::<Firm>::new();
        let pushed = store
            .push_reference(&FirmId::new(), "products", &ProductId::new().to_string())
            .await
            .unwrap();
        assert!(!pushed);
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_pushes_are_all_kept() {
        let store = Arc::new(InMemoryCollection::<Firm>::new());
        let f = store.insert(firm()).await.unwrap();
        let id = *f.id();

        let tasks: Vec<_> = (0..20)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    let product = ProductId::new();
                    store.push_reference(&id, "products", &product.to_string()).await.unwrap();
                    product
                })
            })
            .collect();
        let mut pushed = Vec::new();
        for task in tasks {
            pushed.push(task.await.unwrap());
        }

        let stored = store.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.products().len(), 20);
        for product in pushed {
            assert!(stored.products().contains(&product));
        }
    }
}
