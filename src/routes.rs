//! Navigation paths for the public site and the admin panel

use std::fmt;

/// Every screen reachable by path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    About,
    Collaborators,
    CollaboratorPortfolio(String),
    Projects,
    ProjectDetail(String),
    Skills,
    Contact,
    AdminLogin,
    AdminDashboard,
    AdminHome,
    AdminProjects,
    AdminCollaborators,
    AdminCollaboratorPortfolio(String),
    AdminSkills,
    AdminMessages,
    AdminAbout,
}

impl Route {
    /// Match a path to its screen; unknown paths yield `None`
    pub fn parse(path: &str) -> Option<Route> {
        let path = path.split(|c: char| c == '?' || c == '#').next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let route = match segments.as_slice() {
            [] => Route::Home,
            ["about"] => Route::About,
            ["collaborators"] => Route::Collaborators,
            ["collaborator", id] => Route::CollaboratorPortfolio(id.to_string()),
            ["projects"] => Route::Projects,
            ["projects", id] => Route::ProjectDetail(id.to_string()),
            ["skills"] => Route::Skills,
            ["contact"] => Route::Contact,
            ["admin", "login"] => Route::AdminLogin,
            ["admin", "dashboard"] => Route::AdminDashboard,
            ["admin", "home"] => Route::AdminHome,
            ["admin", "projects"] => Route::AdminProjects,
            ["admin", "collaborators"] => Route::AdminCollaborators,
            ["admin", "collaborators", id, "portfolio"] => {
                Route::AdminCollaboratorPortfolio(id.to_string())
            }
            ["admin", "skills"] => Route::AdminSkills,
            ["admin", "messages"] => Route::AdminMessages,
            ["admin", "about"] => Route::AdminAbout,
            _ => return None,
        };
        Some(route)
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::About => "/about".to_string(),
            Route::Collaborators => "/collaborators".to_string(),
            Route::CollaboratorPortfolio(id) => format!("/collaborator/{}", id),
            Route::Projects => "/projects".to_string(),
            Route::ProjectDetail(id) => format!("/projects/{}", id),
            Route::Skills => "/skills".to_string(),
            Route::Contact => "/contact".to_string(),
            Route::AdminLogin => "/admin/login".to_string(),
            Route::AdminDashboard => "/admin/dashboard".to_string(),
            Route::AdminHome => "/admin/home".to_string(),
            Route::AdminProjects => "/admin/projects".to_string(),
            Route::AdminCollaborators => "/admin/collaborators".to_string(),
            Route::AdminCollaboratorPortfolio(id) => {
                format!("/admin/collaborators/{}/portfolio", id)
            }
            Route::AdminSkills => "/admin/skills".to_string(),
            Route::AdminMessages => "/admin/messages".to_string(),
            Route::AdminAbout => "/admin/about".to_string(),
        }
    }

    /// Admin screens other than the login page sit behind the session guard
    pub fn requires_session(&self) -> bool {
        !matches!(
            self,
            Route::Home
                | Route::About
                | Route::Collaborators
                | Route::CollaboratorPortfolio(_)
                | Route::Projects
                | Route::ProjectDetail(_)
                | Route::Skills
                | Route::Contact
                | Route::AdminLogin
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
