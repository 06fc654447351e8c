use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::items::{ItemInput, SectionItem};
use crate::common::{ServiceError, ServiceResult};
use crate::kernel::{BaseDocumentStore, StoreError, StoredDocument};

pub const SECTION_COLLECTION: &str = "sections";

/// Constant natural key of the one permitted section row. The store's unique
/// key on it is what makes concurrent first-time creation safe.
pub const SINGLETON_KEY: &str = "singleton";

/// Section - the singleton marketing panel
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: Uuid,
    pub title: String,
    pub subtitle: String,
    pub is_active: bool,
    pub items: Vec<SectionItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update as sent by the admin dashboard.
///
/// `None` means "leave unchanged". `is_active: Some(false)` and
/// `items: Some(vec![])` are real values and are applied.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionPatch {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub is_active: Option<bool>,
    pub items: Option<Vec<Value>>,
}

/// A patch whose items already passed validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionChanges {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub is_active: Option<bool>,
    pub items: Option<Vec<ItemInput>>,
}

/// Stored body of the singleton document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionBody {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub items: Vec<SectionItem>,
}

fn default_active() -> bool {
    true
}

impl Default for SectionBody {
    fn default() -> Self {
        SectionBody {
            title: String::new(),
            subtitle: String::new(),
            is_active: true,
            items: Vec::new(),
        }
    }
}

impl SectionBody {
    /// Apply changes field by field. Supplied items replace the whole
    /// sequence and receive fresh ids; untouched items keep theirs.
    pub fn apply(mut self, changes: &SectionChanges) -> Self {
        if let Some(title) = &changes.title {
            self.title = title.clone();
        }
        if let Some(subtitle) = &changes.subtitle {
            self.subtitle = subtitle.clone();
        }
        if let Some(is_active) = changes.is_active {
            self.is_active = is_active;
        }
        if let Some(items) = &changes.items {
            self.items = items.iter().cloned().map(ItemInput::into_item).collect();
        }
        self
    }
}

// =============================================================================
// Store access - ALL section queries live here
// =============================================================================

impl Section {
    fn from_document(doc: StoredDocument) -> ServiceResult<Self> {
        let body: SectionBody = doc.decode()?;
        Ok(Section {
            id: doc.id,
            title: body.title,
            subtitle: body.subtitle,
            is_active: body.is_active,
            items: body.items,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        })
    }

    pub fn body(&self) -> SectionBody {
        SectionBody {
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
            is_active: self.is_active,
            items: self.items.clone(),
        }
    }

    /// Load the singleton.
    ///
    /// Every row in the collection is a candidate; more than one is a
    /// corruption that is reported, never resolved by picking a row.
    pub async fn find_singleton(store: &dyn BaseDocumentStore) -> ServiceResult<Option<Self>> {
        let mut docs = store.find_all(SECTION_COLLECTION).await?;

        if docs.len() > 1 {
            let ids: Vec<String> = docs.iter().map(|d| d.id.to_string()).collect();
            tracing::error!(count = docs.len(), ids = ?ids, "Multiple section rows found");
            return Err(ServiceError::Integrity(format!(
                "expected at most one section, found {}",
                docs.len()
            )));
        }

        docs.pop().map(Self::from_document).transpose()
    }

    /// Create the singleton. Fails with `DuplicateKey` if another writer
    /// created it first.
    pub async fn create(body: &SectionBody, store: &dyn BaseDocumentStore) -> Result<Self, ServiceError> {
        let value = serde_json::to_value(body).map_err(StoreError::from)?;
        let doc = store
            .insert(SECTION_COLLECTION, Some(SINGLETON_KEY), value)
            .await?;
        Self::from_document(doc)
    }

    /// Write a merged body over this row, in place, if nobody else wrote it
    /// since it was loaded. `None` when the row changed or disappeared.
    pub async fn save(
        &self,
        body: &SectionBody,
        store: &dyn BaseDocumentStore,
    ) -> ServiceResult<Option<Self>> {
        let value = serde_json::to_value(body).map_err(StoreError::from)?;
        store
            .update_if(SECTION_COLLECTION, self.id, self.updated_at, value)
            .await?
            .map(Self::from_document)
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::SectionItemId;
    use serde_json::Map;

    fn input(label: &str, value: &str) -> ItemInput {
        ItemInput {
            label: label.to_string(),
            value: value.to_string(),
            details: Map::new(),
        }
    }

    fn populated() -> SectionBody {
        SectionBody {
            title: "Why shop with us".to_string(),
            subtitle: "Benefits".to_string(),
            is_active: true,
            items: vec![SectionItem {
                id: SectionItemId::new(),
                label: "Shipping".to_string(),
                value: "Free over $50".to_string(),
                details: Map::new(),
            }],
        }
    }

    #[test]
    fn test_absent_fields_are_left_unchanged() {
        let before = populated();
        let after = before.clone().apply(&SectionChanges::default());
        assert_eq!(before, after);
    }

    #[test]
    fn test_explicit_false_overwrites() {
        let after = populated().apply(&SectionChanges {
            is_active: Some(false),
            ..Default::default()
        });
        assert!(!after.is_active);
    }

    #[test]
    fn test_empty_items_clear() {
        let after = populated().apply(&SectionChanges {
            items: Some(vec![]),
            ..Default::default()
        });
        assert!(after.items.is_empty());
    }

    #[test]
    fn test_items_replaced_wholesale_with_new_ids() {
        let before = populated();
        let old_id = before.items[0].id;

        let after = before.apply(&SectionChanges {
            items: Some(vec![input("Shipping", "Free over $50"), input("Returns", "30 days")]),
            ..Default::default()
        });

        assert_eq!(after.items.len(), 2);
        assert!(after.items.iter().all(|item| item.id != old_id));
        assert_eq!(after.items[1].label, "Returns");
    }

    #[test]
    fn test_title_only_keeps_items() {
        let before = populated();
        let after = before.clone().apply(&SectionChanges {
            title: Some("New title".to_string()),
            ..Default::default()
        });
        assert_eq!(after.title, "New title");
        assert_eq!(after.items, before.items);
        assert_eq!(after.subtitle, before.subtitle);
    }

    #[test]
    fn test_patch_distinguishes_absent_from_false() {
        let absent: SectionPatch = serde_json::from_str(r#"{"title":"x"}"#).unwrap();
        assert_eq!(absent.is_active, None);

        let falsy: SectionPatch = serde_json::from_str(r#"{"isActive":false,"items":[]}"#).unwrap();
        assert_eq!(falsy.is_active, Some(false));
        assert_eq!(falsy.items, Some(vec![]));
    }
}
