use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{deserialize_id, null_as_default, Entity};
use crate::error::ValidationError;
use crate::facet::Faceted;
use crate::form::{join_list, optional, parse_json, require, required_list, to_json_text};
use crate::postgrest::Order;
use crate::store::Query;

/// Someone else's part in a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub name: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub technologies: Vec<String>,
    pub team_size: u32,
    pub my_role: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub other_contributions: Vec<Contribution>,
    pub image_url: String,
    #[serde(default)]
    pub live_url: Option<String>,
    #[serde(default)]
    pub case_study: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Project form. `technologies` is comma text, `other_contributions` JSON text.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    pub technologies: String,
    pub team_size: u32,
    pub my_role: String,
    pub other_contributions: String,
    pub image_url: String,
    pub live_url: String,
    pub case_study: String,
}

impl Default for ProjectDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            technologies: String::new(),
            team_size: 1,
            my_role: String::new(),
            other_contributions: String::new(),
            image_url: String::new(),
            live_url: String::new(),
            case_study: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectPayload {
    pub title: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub team_size: u32,
    pub my_role: String,
    pub other_contributions: Vec<Contribution>,
    pub image_url: String,
    pub live_url: Option<String>,
    pub case_study: Option<String>,
}

impl Entity for Project {
    type Record = Project;
    type Draft = ProjectDraft;
    type Payload = ProjectPayload;

    const TABLE: &'static str = "projects";
    const LABEL: &'static str = "project";

    fn id(record: &Project) -> &str {
        &record.id
    }

    fn list_query() -> Query {
        Query::new().order(Order::desc("created_at"))
    }

    fn to_draft(record: &Project) -> ProjectDraft {
        ProjectDraft {
            title: record.title.clone(),
            description: record.description.clone(),
            technologies: join_list(&record.technologies),
            team_size: record.team_size,
            my_role: record.my_role.clone(),
            other_contributions: to_json_text(&record.other_contributions),
            image_url: record.image_url.clone(),
            live_url: record.live_url.clone().unwrap_or_default(),
            case_study: record.case_study.clone().unwrap_or_default(),
        }
    }

    fn to_payload(draft: &ProjectDraft) -> Result<ProjectPayload, ValidationError> {
        Ok(ProjectPayload {
            title: require("title", &draft.title)?,
            description: require("description", &draft.description)?,
            technologies: required_list("technologies", &draft.technologies)?,
            team_size: draft.team_size,
            my_role: require("my_role", &draft.my_role)?,
            other_contributions: parse_json("other_contributions", &draft.other_contributions)?,
            image_url: require("image_url", &draft.image_url)?,
            live_url: optional(&draft.live_url),
            case_study: optional(&draft.case_study),
        })
    }
}

impl Faceted for Project {
    fn facets(&self) -> &[String] {
        &self.technologies
    }
}
