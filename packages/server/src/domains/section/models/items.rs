//! Section items: validation and identity stripping for caller input.
//!
//! Items are value objects. Whatever identity a caller attaches is dropped;
//! ids on stored items are minted here on every replacement.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::common::{SectionItemId, ServiceError, ServiceResult};

/// Keys a caller may use to smuggle identity onto an item.
pub const IDENTITY_FIELDS: [&str; 2] = ["id", "_id"];

/// A stored item. `details` holds descriptive extras (icon, description...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionItem {
    pub id: SectionItemId,
    pub label: String,
    pub value: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// A validated item from caller input, not yet given an identity.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemInput {
    pub label: String,
    pub value: String,
    pub details: Map<String, Value>,
}

impl ItemInput {
    pub fn into_item(self) -> SectionItem {
        SectionItem {
            id: SectionItemId::new(),
            label: self.label,
            value: self.value,
            details: self.details,
        }
    }
}

/// Validate a raw item sequence. Fails on the first bad entry, naming it.
pub fn sanitize_items(raw: Vec<Value>) -> ServiceResult<Vec<ItemInput>> {
    raw.into_iter()
        .enumerate()
        .map(|(index, item)| sanitize_item(index, item))
        .collect()
}

fn sanitize_item(index: usize, raw: Value) -> ServiceResult<ItemInput> {
    let Value::Object(mut fields) = raw else {
        return Err(ServiceError::validation(
            format!("items[{}]", index),
            "must be an object",
        ));
    };

    for key in IDENTITY_FIELDS {
        fields.remove(key);
    }

    let label = match fields.remove("label") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(_) => {
            return Err(ServiceError::validation(
                format!("items[{}].label", index),
                "must be a non-empty string",
            ))
        }
        None => {
            return Err(ServiceError::validation(
                format!("items[{}].label", index),
                "is required",
            ))
        }
    };

    let value = match fields.remove("value") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(_) => {
            return Err(ServiceError::validation(
                format!("items[{}].value", index),
                "must be a non-empty string or a number",
            ))
        }
        None => {
            return Err(ServiceError::validation(
                format!("items[{}].value", index),
                "is required",
            ))
        }
    };

    Ok(ItemInput {
        label,
        value,
        details: fields,
    })
}
