//! Read views behind the public pages, plus the contact form

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::error::{Error, Operation, SyncError};
use crate::facet::FacetFilter;
use crate::models::{
    AboutContent, Collaborator, CollaboratorProject, ContactForm, Entity, HomeSection, Message,
    Project, Skill, SkillCategory,
};
use crate::notify::{Notice, Notifier};
use crate::postgrest::Order;
use crate::store::{Query, TableStore, ID_COLUMN};

/// Result of a detail-page fetch
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}

impl<T> Lookup<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::NotFound => None,
        }
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Lookup::NotFound, Lookup::Found)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkillGroup {
    pub category: SkillCategory,
    pub skills: Vec<Skill>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    pub collaborator: Collaborator,
    pub projects: Vec<CollaboratorProject>,
}

/// The public site over a table store
pub struct Site<S: TableStore + ?Sized> {
    store: Arc<S>,
    notifier: Arc<dyn Notifier>,
}

impl<S: TableStore + ?Sized> Site<S> {
    pub fn new(store: Arc<S>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    async fn fetch<T: DeserializeOwned>(&self, table: &str, query: &Query) -> Result<Vec<T>, Error> {
        let rows = self.store.select(table, query).await.map_err(|err| {
            warn!(table, error = %err, "Public fetch failed");
            err
        })?;
        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(Error::from))
            .collect()
    }

    async fn fetch_one<T: DeserializeOwned>(&self, table: &str, query: &Query) -> Result<Option<T>, Error> {
        let row = self.store.select_one(table, query).await.map_err(|err| {
            warn!(table, error = %err, "Public fetch failed");
            err
        })?;
        row.map(serde_json::from_value)
            .transpose()
            .map_err(Error::from)
    }

    async fn fetch_by_id<T: DeserializeOwned>(&self, table: &str, id: &str) -> Result<Lookup<T>, Error> {
        let query = Query::new().eq(ID_COLUMN, id);
        Ok(self.fetch_one(table, &query).await?.into())
    }

    /// Hero and about copy; `None` before anything was saved
    pub async fn about(&self) -> Result<Option<AboutContent>, Error> {
        self.fetch_one(AboutContent::TABLE, &Query::new()).await
    }

    pub async fn home_sections(&self) -> Result<Vec<HomeSection>, Error> {
        self.fetch(HomeSection::TABLE, &HomeSection::active_query())
            .await
    }

    /// Newest projects first, ready for technology filtering
    pub async fn projects(&self) -> Result<FacetFilter<Project>, Error> {
        let projects = self.fetch(Project::TABLE, &Project::list_query()).await?;
        Ok(FacetFilter::new(projects))
    }

    pub async fn project(&self, id: &str) -> Result<Lookup<Project>, Error> {
        self.fetch_by_id(Project::TABLE, id).await
    }

    /// Every category, each with its skills strongest first
    pub async fn skills(&self) -> Result<Vec<SkillGroup>, Error> {
        let query = Query::new().order(Order::desc("percentage"));
        let skills: Vec<Skill> = self.fetch(Skill::TABLE, &query).await?;

        Ok(SkillCategory::ALL
            .iter()
            .map(|category| SkillGroup {
                category: *category,
                skills: skills
                    .iter()
                    .filter(|skill| skill.category == *category)
                    .cloned()
                    .collect(),
            })
            .collect())
    }

    pub async fn collaborators(&self) -> Result<Vec<Collaborator>, Error> {
        let query = Query::new().order(Order::asc("created_at"));
        self.fetch(Collaborator::TABLE, &query).await
    }

    /// One collaborator with their own projects; both are fetched together
    pub async fn collaborator_portfolio(&self, id: &str) -> Result<Lookup<Portfolio>, Error> {
        let owned = CollaboratorProject::owned_by(id);
        let (collaborator, projects) = tokio::join!(
            self.fetch_by_id::<Collaborator>(Collaborator::TABLE, id),
            self.fetch::<CollaboratorProject>(CollaboratorProject::TABLE, &owned),
        );

        Ok(match collaborator? {
            Lookup::Found(collaborator) => Lookup::Found(Portfolio {
                collaborator,
                projects: projects?,
            }),
            Lookup::NotFound => Lookup::NotFound,
        })
    }

    /// Store a contact message. The form is cleared only once it is stored.
    pub async fn send_message(&self, form: &mut ContactForm) -> Result<(), SyncError> {
        let payload = match Message::to_payload(form) {
            Ok(payload) => payload,
            Err(err) => {
                self.notifier
                    .notify(Notice::error(format!("Invalid input: {}", err)));
                return Err(err.into());
            }
        };

        let sent = match serde_json::to_value(&payload) {
            Ok(row) => self.store.insert(Message::TABLE, row).await,
            Err(err) => Err(err.into()),
        };
        if let Err(err) = sent {
            self.notifier.notify(Notice::error(
                "Failed to send message. Please try again.",
            ));
            return Err(SyncError::remote(Operation::Create, err));
        }

        info!(email = %form.email, "Contact message stored");
        self.notifier
            .notify(Notice::success("Message sent successfully!"));
        *form = ContactForm::default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::notify::NoticeLog;
    use crate::testing::{Call, MemoryStore};

    fn site(store: MemoryStore) -> (Site<MemoryStore>, Arc<MemoryStore>, NoticeLog) {
        let store = Arc::new(store);
        let log = NoticeLog::new();
        (Site::new(store.clone(), Arc::new(log.clone())), store, log)
    }

    fn project(id: &str, technologies: &[&str], created_at: &str) -> serde_json::Value {
        json!({
            "id": id,
            "title": format!("Project {}", id),
            "description": "",
            "technologies": technologies,
            "team_size": 2,
            "my_role": "Dev",
            "other_contributions": null,
            "image_url": "",
            "created_at": created_at,
        })
    }

    #[tokio::test]
    async fn test_projects_newest_first_with_facets() {
        let (site, _, _) = site(MemoryStore::new().with_rows(
            "projects",
            vec![
                project("1", &["React", "Node"], "2024-01-01T00:00:00Z"),
                project("2", &["Rust"], "2024-03-01T00:00:00Z"),
                project("3", &["Node"], "2024-02-01T00:00:00Z"),
            ],
        ));

        let mut projects = site.projects().await.unwrap();
        let ids: Vec<_> = projects.all().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3", "1"]);
        assert_eq!(projects.vocabulary(), vec!["All", "Rust", "Node", "React"]);

        projects.select("Node");
        let ids: Vec<_> = projects.visible().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1"]);
    }

    #[tokio::test]
    async fn test_project_not_found() {
        let (site, _, _) = site(MemoryStore::new().with_rows(
            "projects",
            vec![project("1", &["Rust"], "2024-01-01T00:00:00Z")],
        ));
        assert!(matches!(site.project("1").await.unwrap(), Lookup::Found(p) if p.team_size == 2));
        assert_eq!(site.project("99").await.unwrap(), Lookup::NotFound);
    }

    #[tokio::test]
    async fn test_skills_grouped_strongest_first() {
        let (site, _, _) = site(MemoryStore::new().with_rows(
            "skills",
            vec![
                json!({"id": 1, "name": "CSS", "category": "frontend", "percentage": 70}),
                json!({"id": 2, "name": "Rust", "category": "backend", "percentage": 80}),
                json!({"id": 3, "name": "React", "category": "frontend", "percentage": 90}),
            ],
        ));

        let groups = site.skills().await.unwrap();
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].category, SkillCategory::Frontend);
        let names: Vec<_> = groups[0].skills.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["React", "CSS"]);
        assert_eq!(groups[1].skills.len(), 1);
        assert!(groups[2].skills.is_empty());
    }

    #[tokio::test]
    async fn test_inactive_sections_hidden() {
        let (site, _, _) = site(MemoryStore::new().with_rows(
            "home_sections",
            vec![
                json!({"id": "b", "section_name": "services", "title": "Services", "content": [], "is_active": true, "display_order": 2}),
                json!({"id": "a", "section_name": "hero", "title": "Hero", "content": {"cta": "Hire me"}, "is_active": true, "display_order": 1}),
                json!({"id": "c", "section_name": "faq", "title": "FAQ", "content": {}, "is_active": false, "display_order": 0}),
            ],
        ));

        let sections = site.home_sections().await.unwrap();
        let names: Vec<_> = sections.iter().map(|s| s.section_name.as_str()).collect();
        assert_eq!(names, vec!["hero", "services"]);
        assert_eq!(sections[0].content.get("cta"), Some(&json!("Hire me")));
    }

    #[tokio::test]
    async fn test_portfolio_joins_owned_projects() {
        let (site, _, _) = site(
            MemoryStore::new()
                .with_rows(
                    "collaborators",
                    vec![json!({"id": "c1", "name": "Ada", "role": "Designer", "description": "", "image_url": ""})],
                )
                .with_rows(
                    "collaborator_projects",
                    vec![
                        json!({"id": "p1", "collaborator_id": "c1", "title": "Logo", "description": "", "image_url": ""}),
                        json!({"id": "p2", "collaborator_id": "c2", "title": "Other", "description": "", "image_url": ""}),
                    ],
                ),
        );

        let portfolio = site.collaborator_portfolio("c1").await.unwrap().found().unwrap();
        assert_eq!(portfolio.collaborator.name, "Ada");
        assert_eq!(portfolio.projects.len(), 1);
        assert_eq!(portfolio.projects[0].title, "Logo");
        assert_eq!(site.collaborator_portfolio("c9").await.unwrap(), Lookup::NotFound);
    }

    #[tokio::test]
    async fn test_about_absent() {
        let (site, _, _) = site(MemoryStore::new());
        assert_eq!(site.about().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_about_reads_first_row() {
        let (site, store, _) = site(MemoryStore::new().with_rows(
            "about_content",
            vec![json!({
                "id": 1,
                "hero_tagline": "Hello",
                "about_text": "About me",
                "projects_completed": 5,
                "clients_count": 2,
                "years_experience": 3,
            })],
        ));

        let about = site.about().await.unwrap().unwrap();
        assert_eq!(about.hero_tagline, "Hello");
        assert_eq!(store.calls(), vec![Call::Select("about_content".into())]);
    }

    #[tokio::test]
    async fn test_send_message_clears_form() {
        let (site, store, log) = site(MemoryStore::new());
        let mut form = ContactForm {
            name: "Bo".to_string(),
            email: "bo@example.com".to_string(),
            message: "Can we talk?".to_string(),
        };

        site.send_message(&mut form).await.unwrap();

        assert_eq!(form, ContactForm::default());
        let rows = store.rows("messages");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["is_read"], json!(false));
        assert_eq!(log.drain(), vec![Notice::success("Message sent successfully!")]);
    }

    #[tokio::test]
    async fn test_failed_message_keeps_form() {
        let (site, store, log) = site(MemoryStore::new());
        store.fail("insert");
        let mut form = ContactForm {
            name: "Bo".to_string(),
            email: "bo@example.com".to_string(),
            message: "Can we talk?".to_string(),
        };

        assert!(site.send_message(&mut form).await.is_err());
        assert_eq!(form.name, "Bo");
        assert!(log.drain()[0].is_error());
    }

    #[tokio::test]
    async fn test_blank_message_is_not_sent() {
        let (site, store, _) = site(MemoryStore::new());
        let mut form = ContactForm::default();
        let err = site.send_message(&mut form).await.unwrap_err();
        assert!(err.is_invalid());
        assert_eq!(store.writes(), 0);
    }
}
