//! Row types for every content table and their editable draft forms

mod about;
mod collaborator;
mod home;
mod message;
mod project;
mod skill;

use serde::{de, de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ValidationError;
use crate::store::Query;

pub use about::*;
pub use collaborator::*;
pub use home::*;
pub use message::*;
pub use project::*;
pub use skill::*;

/// Binds one table to its row type and its form.
pub trait Entity: Send + Sync + 'static {
    /// A persisted row
    type Record: DeserializeOwned + Clone + Send + Sync;
    /// The form state while creating or editing
    type Draft: Default + Clone + Send + Sync;
    /// What a submit writes
    type Payload: Serialize + Send;

    const TABLE: &'static str;
    /// Lower-case noun used in notices
    const LABEL: &'static str;
    /// Whether the admin screen can insert new rows
    const ALLOWS_CREATE: bool = true;
    /// Whether the admin screen can rewrite existing rows
    const ALLOWS_EDIT: bool = true;
    /// Whether the admin screen can delete rows
    const ALLOWS_DELETE: bool = true;

    fn id(record: &Self::Record) -> &str;

    /// How the admin list is fetched
    fn list_query() -> Query {
        Query::new()
    }

    /// Copy a row into its editable form
    fn to_draft(record: &Self::Record) -> Self::Draft;

    /// Validate a draft and turn it into a write. Parses each JSON field once.
    fn to_payload(draft: &Self::Draft) -> Result<Self::Payload, ValidationError>;
}

/// Keys arrive as strings or integers depending on the table; both are kept
/// as opaque strings.
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(id) => Ok(id),
        Value::Number(id) => Ok(id.to_string()),
        other => Err(de::Error::custom(format!("unsupported key: {}", other))),
    }
}

/// Treat a stored `null` like a missing value
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
