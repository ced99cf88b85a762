use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use manager_assistant::config::Config;
use manager_assistant::logging;
use manager_assistant::projects::Project;
use manager_assistant::rest::{self, ApiState};
use manager_assistant::session::SessionStatus;
use manager_assistant::wizard::{NavigationOutcome, StepRegistry, Transition};

#[derive(Parser)]
#[command(name = "manager-assistant")]
#[command(about = "Project wizard and session tooling for the Manager Assistant dashboard")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the effective configuration to .manager-assistant/config.toml
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// List the wizard steps
    Steps,

    /// Manage projects and move them through the wizard
    Project {
        #[command(subcommand)]
        action: ProjectCommand,
    },

    /// Exchange an authorization code for a session
    Login {
        /// Authorization code issued by the identity provider
        #[arg(long)]
        code: String,
    },

    /// Drop the current session
    Logout,

    /// Check whether the current session is still valid
    Status,

    /// Start the REST API server
    Serve {
        /// Port to listen on (default: from config or 7010)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[derive(Subcommand)]
enum ProjectCommand {
    /// Create a project on the first step
    Create {
        name: String,
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// List projects
    List,
    /// Show a project and its wizard progress
    Show { id: String },
    /// Move to the next step
    Advance { id: String },
    /// Move to the previous step
    Retreat { id: String },
    /// Jump directly to a step
    Jump { id: String, step: u32 },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (needed for logging setup)
    let config = Config::load(cli.config.as_deref())?;

    let server_mode = matches!(cli.command, Commands::Serve { .. });
    let logging_handle = logging::init_logging(&config, server_mode, cli.debug)?;

    let state = ApiState::from_config(config)?;

    match cli.command {
        Commands::Steps => cmd_steps(state.wizard.registry()),
        Commands::Init { force } => cmd_init(&state.config, force)?,
        Commands::Project { action } => cmd_project(&state, action).await?,
        Commands::Login { code } => {
            let user = state.session.login(&code).await?;
            println!("Logged in as {} <{}>", user.name, user.email);
        }
        Commands::Logout => {
            state.session.logout()?;
            println!("Logged out");
        }
        Commands::Status => cmd_status(&state).await,
        Commands::Serve { port } => {
            if let Some(log_path) = &logging_handle.log_file_path {
                println!("Logging to {}", log_path.display());
            }
            cmd_serve(state, port).await?;
        }
    }

    Ok(())
}

fn cmd_init(config: &Config, force: bool) -> Result<()> {
    let path = Config::local_config_path();
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    config.save()?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn cmd_steps(registry: &StepRegistry) {
    println!("Wizard steps ({})", registry.total_steps());
    println!("{}", "─".repeat(60));
    for step in registry.steps() {
        println!("{:>2}. {:<24} {}", step.id, step.key, step.title);
    }
}

fn print_project(project: &Project, registry: &StepRegistry) {
    println!("{} ({})", project.project_name, project.project_id);
    if !project.description.is_empty() {
        println!("  {}", project.description);
    }
    let progress = registry.progress(project.current_step);
    println!(
        "  Step {}/{}: {}",
        progress.current,
        progress.total,
        registry.format_progress(progress.current)
    );
}

fn print_transition(transition: &Transition, registry: &StepRegistry) {
    match transition.outcome {
        NavigationOutcome::Moved { from, to } => println!("Moved from step {} to {}", from, to),
        NavigationOutcome::Stayed { step } => println!("Already on step {}", step),
        NavigationOutcome::Rejected { target, reason, .. } => {
            println!("Cannot go to step {}: {}", target, reason);
        }
    }
    print_project(&transition.project, registry);
}

async fn cmd_project(state: &ApiState, action: ProjectCommand) -> Result<()> {
    if let Err(e) = state.session.require_manager().await {
        bail!("{e}; run `manager-assistant login --code <code>` first");
    }

    let wizard = &state.wizard;
    let registry = wizard.registry();

    match action {
        ProjectCommand::Create { name, description } => {
            let project = wizard.create_project(&name, &description)?;
            print_project(&project, registry);
        }
        ProjectCommand::List => {
            let projects = wizard.list_projects()?;
            if projects.is_empty() {
                println!("No projects");
                return Ok(());
            }
            for project in &projects {
                println!(
                    "{}  {:<30} step {}/{}",
                    project.project_id,
                    project.project_name,
                    project.current_step,
                    registry.total_steps()
                );
            }
        }
        ProjectCommand::Show { id } => {
            let project = wizard.project(&id)?;
            print_project(&project, registry);
        }
        ProjectCommand::Advance { id } => print_transition(&wizard.advance(&id)?, registry),
        ProjectCommand::Retreat { id } => print_transition(&wizard.retreat(&id)?, registry),
        ProjectCommand::Jump { id, step } => {
            let transition = wizard.jump_to(&id, step)?;
            print_transition(&transition, registry);
            if !transition.outcome.is_accepted() {
                bail!("navigation rejected");
            }
        }
    }

    Ok(())
}

async fn cmd_status(state: &ApiState) {
    match state.session.ensure_valid().await {
        SessionStatus::Valid { user: Some(user) } => {
            println!("Session valid: {} <{}>", user.name, user.email);
        }
        SessionStatus::Valid { user: None } => println!("Session valid"),
        SessionStatus::LoggedOut => println!("Not logged in"),
    }
}

async fn cmd_serve(state: ApiState, port: Option<u16>) -> Result<()> {
    let port = port.unwrap_or(state.config.rest_api.port);

    println!("Starting REST API server...");
    println!("  Port: {}", port);
    println!("  Endpoints:");
    println!("    GET   /api/v1/health                    Health check");
    println!("    GET   /api/v1/openapi.json              OpenAPI document");
    println!("    GET   /api/v1/steps                     List wizard steps");
    println!("    GET   /api/v1/steps/:key                Get step");
    println!("  Session:");
    println!("    GET   /api/v1/session                   Session status");
    println!("    POST  /api/v1/session/login             Log in with authorization code");
    println!("    POST  /api/v1/session/logout            Log out");
    println!("  Projects (valid session with manager permission):");
    println!("    GET   /api/v1/projects                  List projects");
    println!("    POST  /api/v1/projects                  Create project");
    println!("    GET   /api/v1/projects/:id              Get project");
    println!("    PATCH /api/v1/projects/:id              Update project");
    println!("    POST  /api/v1/projects/:id/advance      Next step");
    println!("    POST  /api/v1/projects/:id/retreat      Previous step");
    println!("    POST  /api/v1/projects/:id/jump         Jump to step");
    println!("    GET   /api/v1/projects/:id/navigation   Step navigability");
    println!();

    rest::serve(state, port).await
}
