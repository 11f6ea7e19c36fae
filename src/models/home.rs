use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{deserialize_id, Entity};
use crate::error::ValidationError;
use crate::form::{require, StructuredDocument};
use crate::postgrest::Order;
use crate::store::Query;

/// One block of the home page; its content shape is section-specific
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeSection {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub section_name: String,
    pub title: String,
    #[serde(default)]
    pub content: StructuredDocument,
    pub is_active: bool,
    pub display_order: i32,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomeSectionDraft {
    /// Shown for context; never written
    pub section_name: String,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomeSectionPayload {
    pub title: String,
    pub content: StructuredDocument,
    pub updated_at: DateTime<Utc>,
}

impl HomeSection {
    /// Public view: active sections only, in display order
    pub fn active_query() -> Query {
        Self::list_query().eq("is_active", true)
    }
}

impl Entity for HomeSection {
    type Record = HomeSection;
    type Draft = HomeSectionDraft;
    type Payload = HomeSectionPayload;

    const TABLE: &'static str = "home_sections";
    const LABEL: &'static str = "section";
    const ALLOWS_CREATE: bool = false;
    const ALLOWS_DELETE: bool = false;

    fn id(record: &HomeSection) -> &str {
        &record.id
    }

    fn list_query() -> Query {
        Query::new().order(Order::asc("display_order"))
    }

    fn to_draft(record: &HomeSection) -> HomeSectionDraft {
        HomeSectionDraft {
            section_name: record.section_name.clone(),
            title: record.title.clone(),
            content: record.content.to_text(),
        }
    }

    fn to_payload(draft: &HomeSectionDraft) -> Result<HomeSectionPayload, ValidationError> {
        Ok(HomeSectionPayload {
            title: require("title", &draft.title)?,
            content: StructuredDocument::parse("content", &draft.content)?,
            updated_at: Utc::now(),
        })
    }
}
