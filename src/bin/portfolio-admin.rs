use std::sync::Arc;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use portfolio_supabase::admin::{self, DashboardStats};
use portfolio_supabase::facet::FacetFilter;
use portfolio_supabase::models::Message;
use portfolio_supabase::notify::{Notice, NoticeLog};
use portfolio_supabase::prelude::*;
use portfolio_supabase::site::{Lookup, Site};

#[derive(Parser, Debug)]
#[clap(name = "portfolio-admin", version)]
#[clap(about = "Inspect and manage portfolio content", long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,

    /// Admin email, needed for admin-only commands
    #[clap(long, env = "ADMIN_EMAIL")]
    email: Option<String>,

    /// Admin password
    #[clap(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Output debug logs to stderr
    #[clap(long)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List projects, newest first
    Projects {
        /// Only projects using this technology
        #[clap(long)]
        tech: Option<String>,
    },
    /// Show one project
    Project { id: String },
    /// List skills by category
    Skills,
    /// Show hero and about copy
    About,
    /// Row counts per table (admin)
    Stats,
    /// List contact messages (admin)
    Messages,
    /// Mark a message as read (admin)
    MarkRead { id: String },
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("portfolio_supabase=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn sign_in(cli: &Cli, backend: &Backend, log: &NoticeLog) -> anyhow::Result<()> {
    let (email, password) = match (&cli.email, &cli.password) {
        (Some(email), Some(password)) => (email, password),
        _ => return Err(anyhow!("This command needs --email and --password (or ADMIN_EMAIL / ADMIN_PASSWORD)")),
    };
    admin::sign_in(backend.auth(), log, email, password)
        .await
        .context("Sign in failed")?;
    Ok(())
}

fn print_notices(log: &NoticeLog) {
    for Notice { level, message } in log.drain() {
        eprintln!("[{:?}] {}", level, message);
    }
}

async fn run() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let config = BackendConfig::from_env()?;
    let backend = Arc::new(Backend::from_config(config)?);
    let log = NoticeLog::new();
    let notifier: Arc<dyn Notifier> = Arc::new(log.clone());
    let site = Site::new(backend.clone(), notifier.clone());

    match &cli.command {
        Commands::Projects { tech } => {
            let mut projects = site.projects().await?;
            if let Some(tech) = tech {
                projects.select(tech.as_str());
            }
            print_projects(&projects);
        }
        Commands::Project { id } => match site.project(id).await? {
            Lookup::Found(project) => {
                println!("{} ({})", project.title, project.id);
                println!("{}", project.description);
                println!("Role: {} in a team of {}", project.my_role, project.team_size);
                println!("Technologies: {}", project.technologies.join(", "));
                for contribution in &project.other_contributions {
                    println!("  {} - {}", contribution.name, contribution.role);
                }
                if let Some(url) = &project.live_url {
                    println!("Live: {}", url);
                }
            }
            Lookup::NotFound => println!("Project not found"),
        },
        Commands::Skills => {
            for group in site.skills().await? {
                println!("{}", group.category);
                for skill in group.skills {
                    println!("  {:<24} {:>3}%", skill.name, skill.percentage);
                }
            }
        }
        Commands::About => match site.about().await? {
            Some(about) => {
                println!("{}", about.hero_tagline);
                println!("{}", about.about_text);
                println!(
                    "{} projects, {} clients, {} years",
                    about.projects_completed, about.clients_count, about.years_experience
                );
            }
            None => println!("No about content yet"),
        },
        Commands::Stats => {
            sign_in(&cli, &backend, &log).await?;
            let DashboardStats {
                projects,
                collaborators,
                skills,
                messages,
            } = admin::dashboard_stats(backend.as_ref()).await;
            println!("projects:      {}", projects);
            println!("collaborators: {}", collaborators);
            println!("skills:        {}", skills);
            println!("messages:      {}", messages);
        }
        Commands::Messages => {
            sign_in(&cli, &backend, &log).await?;
            let messages: CrudController<Message, Backend> =
                CrudController::new(backend.clone(), notifier.clone());
            messages.load().await?;
            for message in messages.records() {
                let marker = if message.is_read { " " } else { "*" };
                println!(
                    "{} {} <{}> {}",
                    marker,
                    message.name,
                    message.email,
                    message.preview(60)
                );
            }
        }
        Commands::MarkRead { id } => {
            sign_in(&cli, &backend, &log).await?;
            let messages: CrudController<Message, Backend> =
                CrudController::new(backend.clone(), notifier.clone());
            messages.patch(id, json!({ "is_read": true })).await?;
        }
    }

    print_notices(&log);
    Ok(())
}

fn print_projects(projects: &FacetFilter<portfolio_supabase::models::Project>) {
    if projects.is_empty() {
        println!("No projects yet");
        return;
    }
    println!("Filter: {} (of {})", projects.selected(), projects.vocabulary().join(", "));
    for project in projects.visible() {
        println!("{:<8} {:<32} {}", project.id, project.title, project.technologies.join(", "));
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
