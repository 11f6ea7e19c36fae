//! Admin panel screens bound to the shared controllers

use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

use crate::auth::Auth;
use crate::crud::CrudController;
use crate::error::{Error, SyncError};
use crate::models::{
    AboutContent, Collaborator, CollaboratorProfile, CollaboratorProject, CollaboratorProjectDraft,
    Entity, HomeSection, Message, Project, Skill,
};
use crate::notify::{Notice, Notifier};
use crate::routes::Route;
use crate::singleton::SingletonEditor;
use crate::site::Lookup;
use crate::store::{Query, TableStore, ID_COLUMN};

/// Row counts shown on the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub projects: u64,
    pub collaborators: u64,
    pub skills: u64,
    pub messages: u64,
}

async fn count_or_zero<S: TableStore + ?Sized>(store: &S, table: &str) -> u64 {
    match store.count(table).await {
        Ok(count) => count,
        Err(err) => {
            warn!(table, error = %err, "Count failed");
            0
        }
    }
}

/// Count every content table at once; a failed count reads as zero
pub async fn dashboard_stats<S: TableStore + ?Sized>(store: &S) -> DashboardStats {
    let (projects, collaborators, skills, messages) = tokio::join!(
        count_or_zero(store, Project::TABLE),
        count_or_zero(store, Collaborator::TABLE),
        count_or_zero(store, Skill::TABLE),
        count_or_zero(store, Message::TABLE),
    );
    DashboardStats {
        projects,
        collaborators,
        skills,
        messages,
    }
}

/// Sign in from the login screen and return where to go next
pub async fn sign_in(
    auth: &Auth,
    notifier: &dyn Notifier,
    email: &str,
    password: &str,
) -> Result<Route, Error> {
    match auth.sign_in_with_password(email, password).await {
        Ok(session) => {
            info!(user = %session.user.id, "Admin signed in");
            notifier.notify(Notice::success("Logged in successfully"));
            Ok(Route::AdminDashboard)
        }
        Err(err) => {
            notifier.notify(Notice::error(format!("Login failed: {}", err)));
            Err(err)
        }
    }
}

/// Sign out and return to the login screen. The local session is dropped
/// even when the server call fails.
pub async fn sign_out(auth: &Auth) -> Route {
    if let Err(err) = auth.sign_out().await {
        warn!(error = %err, "Remote sign out failed");
    }
    Route::AdminLogin
}

/// Every admin list screen over one store
pub struct AdminPanel<S: TableStore + ?Sized> {
    store: Arc<S>,
    notifier: Arc<dyn Notifier>,
    pub projects: CrudController<Project, S>,
    pub collaborators: CrudController<Collaborator, S>,
    pub skills: CrudController<Skill, S>,
    pub messages: CrudController<Message, S>,
    pub home: CrudController<HomeSection, S>,
    pub about: SingletonEditor<AboutContent, S>,
}

impl<S: TableStore + ?Sized> AdminPanel<S> {
    pub fn new(store: Arc<S>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            projects: CrudController::new(store.clone(), notifier.clone()),
            collaborators: CrudController::new(store.clone(), notifier.clone()),
            skills: CrudController::new(store.clone(), notifier.clone()),
            messages: CrudController::new(store.clone(), notifier.clone()),
            home: CrudController::new(store.clone(), notifier.clone()),
            about: SingletonEditor::new(store.clone(), notifier.clone()),
            store,
            notifier,
        }
    }

    pub async fn dashboard(&self) -> DashboardStats {
        dashboard_stats(self.store.as_ref()).await
    }

    /// Editor for one collaborator's portfolio page
    pub fn portfolio(&self, collaborator_id: &str) -> PortfolioEditor<S> {
        PortfolioEditor::new(self.store.clone(), self.notifier.clone(), collaborator_id)
    }
}

impl<S: TableStore + ?Sized> CrudController<Message, S> {
    pub async fn toggle_read(&self, message: &Message) -> Result<(), SyncError> {
        self.patch(&message.id, json!({ "is_read": !message.is_read }))
            .await
    }
}

impl<S: TableStore + ?Sized> CrudController<HomeSection, S> {
    /// Show or hide a section on the public home page
    pub async fn toggle_active(&self, section: &HomeSection) -> Result<(), SyncError> {
        self.patch(&section.id, json!({ "is_active": !section.is_active }))
            .await
    }
}

/// The collaborator portfolio screen: profile fields plus owned projects
pub struct PortfolioEditor<S: TableStore + ?Sized> {
    collaborator_id: String,
    pub profile: CrudController<CollaboratorProfile, S>,
    pub projects: CrudController<CollaboratorProject, S>,
}

impl<S: TableStore + ?Sized> PortfolioEditor<S> {
    pub fn new(store: Arc<S>, notifier: Arc<dyn Notifier>, collaborator_id: &str) -> Self {
        let profile = CrudController::new(store.clone(), notifier.clone())
            .scoped(Query::new().eq(ID_COLUMN, collaborator_id).limit(1));
        let projects = CrudController::new(store, notifier)
            .scoped(CollaboratorProject::owned_by(collaborator_id))
            .with_template(CollaboratorProjectDraft {
                collaborator_id: collaborator_id.to_string(),
                ..CollaboratorProjectDraft::default()
            });

        Self {
            collaborator_id: collaborator_id.to_string(),
            profile,
            projects,
        }
    }

    pub fn collaborator_id(&self) -> &str {
        &self.collaborator_id
    }

    /// Load the profile into its form and the owned projects into the list
    pub async fn load(&self) -> Result<Lookup<Collaborator>, SyncError> {
        let (profile, projects) = tokio::join!(self.profile.load(), self.projects.load());
        profile?;
        projects?;

        let collaborator = self.profile.find(&self.collaborator_id);
        if let Some(collaborator) = &collaborator {
            self.profile.begin_edit(collaborator);
        }
        Ok(collaborator.into())
    }

    /// Write the profile form and keep it open on the saved values
    pub async fn save_profile(&self) -> Result<(), SyncError> {
        let draft = self.profile.draft();
        self.profile
            .submit_draft(&draft, Some(&self.collaborator_id))
            .await?;
        match self.profile.find(&self.collaborator_id) {
            Some(collaborator) => self.profile.begin_edit(&collaborator),
            None => self.profile.set_draft(draft),
        }
        Ok(())
    }
}
