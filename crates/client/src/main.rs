//! `huddle-admin`: manage attendee groups and product categories from the terminal.

use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use huddle_client::{
    ClientConfig, Coordinator, HttpGateway, InMemoryGateway, NotificationKind, NotificationSink,
    RemoteGateway,
};
use huddle_core::{CategoryId, EmailSet, GroupId};
use huddle_directory::{NewCategory, NewGroup};
use huddle_infra::seed;

#[derive(Parser, Debug)]
#[command(name = "huddle-admin", version, about = "Admin client for the huddle attendee directory")]
struct Cli {
    /// Work against a seeded in-process directory instead of the remote API.
    #[arg(long, global = true)]
    in_memory: bool,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(about = "List attendee groups")]
    Groups,
    #[command(about = "List product categories with their required groups")]
    Categories,
    #[command(about = "List everyone a meeting of the category must invite")]
    Attendees {
        /// Category id.
        category: String,
    },
    #[command(about = "Create an attendee group")]
    AddGroup(AddGroupArgs),
    #[command(about = "Delete an attendee group")]
    RmGroup {
        /// Group id.
        id: String,
    },
    #[command(about = "Create a product category")]
    AddCategory(AddCategoryArgs),
    #[command(about = "Delete a product category")]
    RmCategory {
        /// Category id.
        id: String,
    },
}

#[derive(Args, Debug)]
struct AddGroupArgs {
    /// Stable identifier, e.g. `design-team`.
    #[arg(long)]
    id: String,
    #[arg(long)]
    name: String,
    #[arg(long)]
    department: String,
    /// Member email; repeat or comma-separate.
    #[arg(long = "email", value_delimiter = ',')]
    emails: Vec<String>,
}

#[derive(Args, Debug)]
struct AddCategoryArgs {
    #[arg(long)]
    id: String,
    #[arg(long)]
    name: String,
    /// Required group id; repeat or comma-separate.
    #[arg(long = "group", value_delimiter = ',')]
    groups: Vec<String>,
}

/// Renders notifications on stderr so stdout stays machine-readable.
struct TerminalSink;

impl NotificationSink for TerminalSink {
    fn notify(&self, message: &str, kind: NotificationKind) {
        match kind {
            NotificationKind::Success => eprintln!("ok: {message}"),
            NotificationKind::Error => eprintln!("error: {message}"),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    huddle_observability::init();
    let cli = Cli::parse();

    let gateway: Arc<dyn RemoteGateway> = if cli.in_memory {
        let directory = seed::seeded().context("failed to seed in-memory directory")?;
        Arc::new(InMemoryGateway::new(Arc::new(directory)))
    } else {
        let config = ClientConfig::from_env()?;
        Arc::new(HttpGateway::new(&config).context("failed to build HTTP client")?)
    };

    let coordinator = Coordinator::connect(gateway, Arc::new(TerminalSink))
        .await
        .context("failed to load admin data")?;

    run(&coordinator, cli.command, cli.json).await
}

async fn run(coordinator: &Coordinator, command: Command, json: bool) -> anyhow::Result<()> {
    match command {
        Command::Groups => {
            let groups = coordinator.groups();
            if json {
                println!("{}", serde_json::to_string_pretty(&groups)?);
            } else {
                for g in groups {
                    let emails: Vec<&str> = g.emails.iter().map(|e| e.as_str()).collect();
                    println!("{}\t{}\t{}\t{}", g.id, g.name, g.department, emails.join(", "));
                }
            }
        }
        Command::Categories => {
            let categories = coordinator.categories();
            if json {
                println!("{}", serde_json::to_string_pretty(&categories)?);
            } else {
                for c in categories {
                    let groups: Vec<&str> = c.required_groups.iter().map(|g| g.name.as_str()).collect();
                    println!("{}\t{}\t{}", c.id, c.name, groups.join(", "));
                }
            }
        }
        Command::Attendees { category } => {
            let id = CategoryId::new(&category)?;
            let attendees = coordinator.required_attendees(&id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&attendees)?);
            } else {
                for email in attendees {
                    println!("{email}");
                }
            }
        }
        Command::AddGroup(args) => {
            let new = NewGroup::new(
                GroupId::new(&args.id)?,
                args.name,
                args.department,
                EmailSet::parse(&args.emails)?,
            )?;
            let group = coordinator.create_group(new).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&group)?);
            }
        }
        Command::RmGroup { id } => {
            let id = GroupId::new(&id)?;
            let still_required = coordinator.categories_requiring(&id);
            coordinator.delete_group(&id).await?;
            if !still_required.is_empty() {
                tracing::warn!(group_id = %id, categories = ?still_required, "deleted group was still required by categories");
            }
        }
        Command::AddCategory(args) => {
            let groups = args
                .groups
                .iter()
                .map(GroupId::new)
                .collect::<Result<Vec<_>, _>>()?;
            let new = NewCategory::new(CategoryId::new(&args.id)?, args.name, groups)?;
            let category = coordinator.create_category(new).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&category)?);
            }
        }
        Command::RmCategory { id } => {
            coordinator.delete_category(&CategoryId::new(&id)?).await?;
        }
    }
    Ok(())
}
