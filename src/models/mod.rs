use crate::storage::StorageError;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

const ID_PREFIX: &str = "bc";
const ID_RANDOM_LEN: usize = 10;
const ID_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// A term and its translation.
pub type Pair = (String, String);

/// A flashcard deck as stored on disk.
///
/// Fields other than `id`, `title` and `pairs` only appear when a replace
/// payload carried them; they are kept verbatim in `extra`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Category {
    pub id: String,
    pub title: String,
    #[serde(deserialize_with = "deserialize_pairs")]
    pub pairs: Vec<Pair>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Category {
    pub fn new(id: String, title: String, pairs: Vec<Pair>) -> Self {
        Self {
            id,
            title,
            pairs,
            extra: Map::new(),
        }
    }

    pub fn summary(&self) -> CategorySummary {
        CategorySummary {
            id: self.id.clone(),
            title: self.title.clone(),
            length: self.pairs.len(),
        }
    }

    /// Shallow merge of a validated payload onto this record. The id never changes.
    pub fn apply(&mut self, payload: CategoryPayload) {
        self.title = payload.title;
        self.pairs = payload.pairs;
        for (key, value) in payload.extra {
            self.extra.insert(key, value);
        }
    }
}

/// The `{id, title, length}` projection returned by every list-producing operation.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CategorySummary {
    pub id: String,
    pub title: String,
    pub length: usize,
}

pub fn summarize(categories: &[Category]) -> Vec<CategorySummary> {
    categories.iter().map(Category::summary).collect()
}

/// Produces `bc` followed by ten base-36 characters.
///
/// The v4 UUID is only a source of random bits; its low 52 bits are all
/// random, which covers the ten digits taken here.
pub fn generate_id() -> String {
    let mut value = Uuid::new_v4().as_u128();
    let mut id = String::with_capacity(ID_PREFIX.len() + ID_RANDOM_LEN);
    id.push_str(ID_PREFIX);
    for _ in 0..ID_RANDOM_LEN {
        id.push(ID_ALPHABET[(value % 36) as usize] as char);
        value /= 36;
    }
    id
}

/// Ids end up as the last segment of an item URL, so they cannot carry
/// path or query delimiters.
pub fn is_addressable_id(id: &str) -> bool {
    !id.contains(['/', '?', '#'])
}

/// A create/replace body that passed shape validation.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryPayload {
    pub id: Option<String>,
    pub title: String,
    pub pairs: Vec<Pair>,
    pub extra: Map<String, Value>,
}

impl CategoryPayload {
    /// Validates an untyped JSON body.
    ///
    /// Checks run in a fixed order and the first failure wins: title type,
    /// pairs is an array, first pair is an array, then the full pair shape.
    /// A non-string `id` is treated as absent.
    pub fn parse(value: Value) -> Result<Self, PayloadError> {
        let mut fields = match value {
            Value::Object(fields) => fields,
            _ => return Err(PayloadError::TitleRequired),
        };

        let title = match fields.remove("title") {
            Some(Value::String(title)) => title,
            _ => return Err(PayloadError::TitleRequired),
        };

        let raw_pairs = match fields.remove("pairs") {
            Some(Value::Array(items)) => items,
            _ => return Err(PayloadError::PairsNotArray),
        };

        if let Some(first) = raw_pairs.first() {
            if !first.is_array() {
                return Err(PayloadError::PairsNotNested);
            }
        }

        let pairs = raw_pairs
            .iter()
            .map(parse_pair)
            .collect::<Option<Vec<_>>>()
            .ok_or(PayloadError::PairsShape)?;

        let id = match fields.remove("id") {
            Some(Value::String(id)) => Some(id),
            _ => None,
        };

        Ok(Self {
            id,
            title,
            pairs,
            extra: fields,
        })
    }
}

// Members past the second are accepted and dropped.
fn parse_pair(item: &Value) -> Option<Pair> {
    let members = item.as_array()?;
    match (members.first(), members.get(1)) {
        (Some(Value::String(term)), Some(Value::String(translation))) => {
            Some((term.clone(), translation.clone()))
        }
        _ => None,
    }
}

// Files written by older servers may hold pairs with extra members.
fn deserialize_pairs<'de, D>(deserializer: D) -> Result<Vec<Pair>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<Value>::deserialize(deserializer)?;
    raw.iter()
        .map(|item| {
            parse_pair(item)
                .ok_or_else(|| D::Error::custom("pair must start with two strings"))
        })
        .collect()
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PayloadError {
    #[error("title is a required string property")]
    TitleRequired,
    #[error("pairs must be an array")]
    PairsNotArray,
    #[error("pairs may only contain arrays")]
    PairsNotNested,
    #[error("pairs must contain arrays of two strings")]
    PairsShape,
}

#[derive(Debug, Error)]
pub enum CategoryError {
    #[error(transparent)]
    Invalid(#[from] PayloadError),
    #[error("Item Not Found")]
    NotFound(String),
    #[error("Category id already exists: {0}")]
    DuplicateId(String),
    #[error("Category id cannot contain '/', '?' or '#': {0}")]
    InvalidId(String),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
