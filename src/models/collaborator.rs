use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{deserialize_id, null_as_default, Entity};
use crate::error::ValidationError;
use crate::form::{join_list, optional, parse_json, require, required_list, split_list, to_json_text};
use crate::store::Query;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Testimonial {
    pub client: String,
    pub text: String,
    pub rating: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collaborator {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    pub role: String,
    pub description: String,
    pub image_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub social_links: Vec<SocialLink>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub portfolio_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub services: Vec<Service>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub technologies: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub testimonials: Vec<Testimonial>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Collaborator list screen form; `social_links` is JSON text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollaboratorDraft {
    pub name: String,
    pub role: String,
    pub description: String,
    pub image_url: String,
    pub social_links: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollaboratorPayload {
    pub name: String,
    pub role: String,
    pub description: String,
    pub image_url: String,
    pub social_links: Vec<SocialLink>,
}

impl Entity for Collaborator {
    type Record = Collaborator;
    type Draft = CollaboratorDraft;
    type Payload = CollaboratorPayload;

    const TABLE: &'static str = "collaborators";
    const LABEL: &'static str = "collaborator";

    fn id(record: &Collaborator) -> &str {
        &record.id
    }

    fn to_draft(record: &Collaborator) -> CollaboratorDraft {
        CollaboratorDraft {
            name: record.name.clone(),
            role: record.role.clone(),
            description: record.description.clone(),
            image_url: record.image_url.clone(),
            social_links: to_json_text(&record.social_links),
        }
    }

    fn to_payload(draft: &CollaboratorDraft) -> Result<CollaboratorPayload, ValidationError> {
        Ok(CollaboratorPayload {
            name: require("name", &draft.name)?,
            role: require("role", &draft.role)?,
            description: require("description", &draft.description)?,
            image_url: require("image_url", &draft.image_url)?,
            social_links: parse_json("social_links", &draft.social_links)?,
        })
    }
}

/// The portfolio details of a collaborator, edited on its own screen.
///
/// Shares the `collaborators` table but only ever updates existing rows.
pub struct CollaboratorProfile;

/// Portfolio form: contact details, JSON `services`/`testimonials`, comma
/// `technologies`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileDraft {
    pub bio: String,
    pub email: String,
    pub phone: String,
    pub portfolio_url: String,
    pub services: String,
    pub technologies: String,
    pub testimonials: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfilePayload {
    pub bio: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub portfolio_url: Option<String>,
    pub services: Vec<Service>,
    pub technologies: Vec<String>,
    pub testimonials: Vec<Testimonial>,
}

impl Entity for CollaboratorProfile {
    type Record = Collaborator;
    type Draft = ProfileDraft;
    type Payload = ProfilePayload;

    const TABLE: &'static str = "collaborators";
    const LABEL: &'static str = "portfolio";
    const ALLOWS_CREATE: bool = false;
    const ALLOWS_DELETE: bool = false;

    fn id(record: &Collaborator) -> &str {
        &record.id
    }

    fn to_draft(record: &Collaborator) -> ProfileDraft {
        ProfileDraft {
            bio: record.bio.clone().unwrap_or_default(),
            email: record.email.clone().unwrap_or_default(),
            phone: record.phone.clone().unwrap_or_default(),
            portfolio_url: record.portfolio_url.clone().unwrap_or_default(),
            services: to_json_text(&record.services),
            technologies: join_list(&record.technologies),
            testimonials: to_json_text(&record.testimonials),
        }
    }

    fn to_payload(draft: &ProfileDraft) -> Result<ProfilePayload, ValidationError> {
        Ok(ProfilePayload {
            bio: optional(&draft.bio),
            email: optional(&draft.email),
            phone: optional(&draft.phone),
            portfolio_url: optional(&draft.portfolio_url),
            services: parse_json("services", &draft.services)?,
            technologies: split_list(&draft.technologies),
            testimonials: parse_json("testimonials", &draft.testimonials)?,
        })
    }
}

/// Work shown on a collaborator's portfolio page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollaboratorProject {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub collaborator_id: String,
    pub title: String,
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub technologies: Vec<String>,
    pub image_url: String,
    #[serde(default)]
    pub live_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Owned-project form; `collaborator_id` is filled in by the owning screen
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollaboratorProjectDraft {
    pub collaborator_id: String,
    pub title: String,
    pub description: String,
    pub technologies: String,
    pub image_url: String,
    pub live_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollaboratorProjectPayload {
    pub collaborator_id: String,
    pub title: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub image_url: String,
    pub live_url: Option<String>,
}

impl CollaboratorProject {
    /// The owned projects of one collaborator
    pub fn owned_by(collaborator_id: &str) -> Query {
        Query::new().eq("collaborator_id", collaborator_id)
    }
}

impl Entity for CollaboratorProject {
    type Record = CollaboratorProject;
    type Draft = CollaboratorProjectDraft;
    type Payload = CollaboratorProjectPayload;

    const TABLE: &'static str = "collaborator_projects";
    const LABEL: &'static str = "project";

    fn id(record: &CollaboratorProject) -> &str {
        &record.id
    }

    fn to_draft(record: &CollaboratorProject) -> CollaboratorProjectDraft {
        CollaboratorProjectDraft {
            collaborator_id: record.collaborator_id.clone(),
            title: record.title.clone(),
            description: record.description.clone(),
            technologies: join_list(&record.technologies),
            image_url: record.image_url.clone(),
            live_url: record.live_url.clone().unwrap_or_default(),
        }
    }

    fn to_payload(
        draft: &CollaboratorProjectDraft,
    ) -> Result<CollaboratorProjectPayload, ValidationError> {
        Ok(CollaboratorProjectPayload {
            collaborator_id: require("collaborator_id", &draft.collaborator_id)?,
            title: require("title", &draft.title)?,
            description: require("description", &draft.description)?,
            technologies: required_list("technologies", &draft.technologies)?,
            image_url: require("image_url", &draft.image_url)?,
            live_url: optional(&draft.live_url),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn collaborator() -> Collaborator {
        serde_json::from_value(json!({
            "id": "c1",
            "name": "Ahmad",
            "role": "Backend",
            "description": "APIs",
            "image_url": "http://x/a.png",
            "social_links": [{"platform": "LinkedIn", "url": "https://l.in/a"}],
            "services": [{"title": "APIs", "description": "REST and GraphQL"}],
            "technologies": null,
            "testimonials": [{"client": "Acme", "text": "Solid", "rating": 4.5}]
        }))
        .unwrap()
    }

    #[test]
    fn test_profile_round_trip() {
        let record = collaborator();
        let draft = CollaboratorProfile::to_draft(&record);
        assert!(draft.services.contains("GraphQL"));
        assert_eq!(draft.technologies, "");

        let payload = CollaboratorProfile::to_payload(&draft).unwrap();
        assert_eq!(payload.services, record.services);
        assert_eq!(payload.testimonials, record.testimonials);
        assert!(payload.technologies.is_empty());
        assert_eq!(payload.bio, None);
    }

    #[test]
    fn test_profile_rejects_bad_services() {
        let mut draft = CollaboratorProfile::to_draft(&collaborator());
        draft.services = "not json".to_string();
        let err = CollaboratorProfile::to_payload(&draft).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { field: "services", .. }));
    }

    #[test]
    fn test_social_links_round_trip() {
        let record = collaborator();
        let payload = Collaborator::to_payload(&Collaborator::to_draft(&record)).unwrap();
        assert_eq!(payload.social_links, record.social_links);
    }

    #[test]
    fn test_owned_project_needs_owner() {
        let draft = CollaboratorProjectDraft {
            title: "Site".to_string(),
            description: "d".to_string(),
            technologies: "Vue".to_string(),
            image_url: "i".to_string(),
            ..Default::default()
        };
        assert_eq!(
            CollaboratorProject::to_payload(&draft),
            Err(ValidationError::Required("collaborator_id"))
        );
    }
}
