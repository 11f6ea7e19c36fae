use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{deserialize_id, Entity};
use crate::error::ValidationError;
use crate::form::{optional, require};

/// The single row behind the hero and about pages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AboutContent {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub hero_tagline: String,
    pub about_text: String,
    pub projects_completed: u32,
    pub clients_count: u32,
    pub years_experience: u32,
    #[serde(default)]
    pub profile_image_url: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AboutDraft {
    pub hero_tagline: String,
    pub about_text: String,
    pub projects_completed: u32,
    pub clients_count: u32,
    pub years_experience: u32,
    pub profile_image_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AboutPayload {
    pub hero_tagline: String,
    pub about_text: String,
    pub projects_completed: u32,
    pub clients_count: u32,
    pub years_experience: u32,
    pub profile_image_url: Option<String>,
}

impl Entity for AboutContent {
    type Record = AboutContent;
    type Draft = AboutDraft;
    type Payload = AboutPayload;

    const TABLE: &'static str = "about_content";
    const LABEL: &'static str = "about content";
    const ALLOWS_DELETE: bool = false;

    fn id(record: &AboutContent) -> &str {
        &record.id
    }

    fn to_draft(record: &AboutContent) -> AboutDraft {
        AboutDraft {
            hero_tagline: record.hero_tagline.clone(),
            about_text: record.about_text.clone(),
            projects_completed: record.projects_completed,
            clients_count: record.clients_count,
            years_experience: record.years_experience,
            profile_image_url: record.profile_image_url.clone().unwrap_or_default(),
        }
    }

    fn to_payload(draft: &AboutDraft) -> Result<AboutPayload, ValidationError> {
        Ok(AboutPayload {
            hero_tagline: require("hero_tagline", &draft.hero_tagline)?,
            about_text: require("about_text", &draft.about_text)?,
            projects_completed: draft.projects_completed,
            clients_count: draft.clients_count,
            years_experience: draft.years_experience,
            profile_image_url: optional(&draft.profile_image_url),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_blank_image_is_stored_as_null() {
        let row: AboutContent = serde_json::from_value(json!({
            "id": 1,
            "hero_tagline": "Building for the web",
            "about_text": "Ten years of shipping",
            "projects_completed": 40,
            "clients_count": 12,
            "years_experience": 10,
            "profile_image_url": "http://x/me.png"
        }))
        .unwrap();

        let mut draft = AboutContent::to_draft(&row);
        assert_eq!(draft.profile_image_url, "http://x/me.png");

        draft.profile_image_url = "  ".to_string();
        let payload = AboutContent::to_payload(&draft).unwrap();
        assert_eq!(payload.profile_image_url, None);
        assert_eq!(payload.projects_completed, 40);
    }

    #[test]
    fn test_tagline_is_required() {
        let err = AboutContent::to_payload(&AboutDraft::default()).unwrap_err();
        assert_eq!(err, ValidationError::Required("hero_tagline"));
    }
}
