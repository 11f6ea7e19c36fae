use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{deserialize_id, Entity};
use crate::error::ValidationError;
use crate::form::require;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillCategory {
    Frontend,
    Backend,
    Tools,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 3] = [
        SkillCategory::Frontend,
        SkillCategory::Backend,
        SkillCategory::Tools,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SkillCategory::Frontend => "frontend",
            SkillCategory::Backend => "backend",
            SkillCategory::Tools => "tools",
        }
    }
}

impl Default for SkillCategory {
    fn default() -> Self {
        SkillCategory::Frontend
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    pub category: SkillCategory,
    /// 0 to 100, bounded by the input widget
    pub percentage: u8,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillDraft {
    pub name: String,
    pub category: SkillCategory,
    pub percentage: u8,
}

impl Default for SkillDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            category: SkillCategory::Frontend,
            percentage: 50,
        }
    }
}

impl Entity for Skill {
    type Record = Skill;
    type Draft = SkillDraft;
    type Payload = SkillDraft;

    const TABLE: &'static str = "skills";
    const LABEL: &'static str = "skill";

    fn id(record: &Skill) -> &str {
        &record.id
    }

    fn to_draft(record: &Skill) -> SkillDraft {
        SkillDraft {
            name: record.name.clone(),
            category: record.category,
            percentage: record.percentage,
        }
    }

    fn to_payload(draft: &SkillDraft) -> Result<SkillDraft, ValidationError> {
        Ok(SkillDraft {
            name: require("name", &draft.name)?,
            ..draft.clone()
        })
    }
}
