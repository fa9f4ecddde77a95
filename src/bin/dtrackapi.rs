//! Dependency-Track API CLI binary.
//!
//! A command-line interface for interacting with the Dependency-Track API.

use clap::Parser;
use dtrackapi::cli::{Cli, Command};
use dtrackapi::{
    About, Create, Delete, DtrackClient, DtrackError, Get, List, Page, PageOptions, ParentRef, Patch,
    PrettyPrint, Project, ProjectListQuery, ProjectPatch, Tag,
};
use serde::Serialize;
use std::process::ExitCode;
use tabled::{Table, Tabled};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let client = match build_client(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Set DTRACK_API_KEY environment variable or pass --api-key");
            return ExitCode::FAILURE;
        }
    };

    match run(client, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Build the client against `--url`. The API key (flag or `DTRACK_API_KEY`)
/// wins over `DTRACK_BEARER_TOKEN`.
fn build_client(cli: &Cli) -> dtrackapi::Result<DtrackClient> {
    if let Some(key) = cli.api_key.as_deref() {
        return DtrackClient::new(key, &cli.url);
    }
    match std::env::var("DTRACK_BEARER_TOKEN") {
        Ok(token) => DtrackClient::with_bearer_token(&token, &cli.url),
        Err(_) => Err(DtrackError::ConfigMissing(
            "DTRACK_API_KEY or DTRACK_BEARER_TOKEN".to_string(),
        )),
    }
}

async fn run(mut client: DtrackClient, cli: Cli) -> dtrackapi::Result<()> {
    match cli.command {
        Command::Version => {
            let about = About::get(&client).await?;
            output_single(&about, cli.json)
        }
        Command::Get { uuid } => {
            let project = Project::get(&client, uuid).await?;
            output_single(&project, cli.json)
        }
        Command::List {
            page,
            page_size,
            tag,
            name,
            exclude_inactive,
            only_root,
        } => {
            let options = PageOptions::for_page(page.unwrap_or(1), page_size.unwrap_or(20));

            if let Some(name) = name {
                let projects =
                    Project::for_name(&client, &name, exclude_inactive, only_root).await?;
                return output_list(&projects, cli.json);
            }

            let page = match tag {
                Some(tag) => {
                    Project::list_by_tag(&client, &tag, exclude_inactive, only_root, &options)
                        .await?
                }
                None => {
                    let query = ProjectListQuery {
                        name: None,
                        exclude_inactive: exclude_inactive.then_some(true),
                        only_root: only_root.then_some(true),
                    };
                    Project::list_page(&client, &query, &options).await?
                }
            };
            output_page(&page, &options, cli.json)
        }
        Command::Lookup { name, version } => {
            let project = Project::lookup(&client, &name, &version).await?;
            output_single(&project, cli.json)
        }
        Command::Create {
            name,
            version,
            description,
            classifier,
            tags,
            parent,
            inactive,
        } => {
            let project = Project {
                version,
                description,
                classifier,
                tags: tags.iter().map(|t| Tag::from(t.as_str())).collect(),
                parent: parent.map(ParentRef::from),
                active: !inactive,
                ..Project::new(name)
            };
            let project = Project::create(&client, project).await?;
            output_single(&project, cli.json)
        }
        Command::Patch {
            uuid,
            name,
            version,
            description,
            active,
        } => {
            let patch = ProjectPatch {
                name,
                version,
                description,
                active,
                ..Default::default()
            };
            if patch.is_empty() {
                eprintln!("Hint: pass at least one of --name, --version, --description, --active");
            }
            let project = Project::patch(&client, uuid, patch).await?;
            output_single(&project, cli.json)
        }
        Command::Delete { uuid } => {
            Project::delete(&client, uuid).await?;
            if !cli.json {
                println!("Deleted project {uuid}");
            }
            Ok(())
        }
        Command::Clone(args) => {
            // Whether a token comes back depends on the server version.
            if let Err(e) = client.detect_server_version().await {
                tracing::warn!(error = %e, "could not detect server version");
            }
            match Project::clone_project(&client, &args.to_request()).await? {
                Some(token) if cli.json => {
                    println!("{}", serde_json::to_string_pretty(&token)?);
                }
                Some(token) => println!("Clone started, event token: {token}"),
                None => println!("Clone requested (server does not report progress)"),
            }
            Ok(())
        }
    }
}

fn output_single<T: Serialize + PrettyPrint>(item: &T, json: bool) -> dtrackapi::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(item)?);
    } else {
        println!("{}", item.pretty_print());
    }
    Ok(())
}

fn output_list(projects: &[Project], json: bool) -> dtrackapi::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(projects)?);
    } else {
        let rows: Vec<ProjectRow> = projects.iter().map(ProjectRow::from).collect();
        println!("{}", Table::new(rows));
        println!("\n{} projects", projects.len());
    }
    Ok(())
}

fn output_page(page: &Page<Project>, options: &PageOptions, json: bool) -> dtrackapi::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&page.items)?);
        return Ok(());
    }

    let rows: Vec<ProjectRow> = page.items.iter().map(ProjectRow::from).collect();
    println!("{}", Table::new(rows));

    let number = options.page_number.unwrap_or(1);
    let size = u64::from(options.page_size.unwrap_or(1).max(1));
    let total_pages = page.total_count.div_ceil(size);
    if page.has_more(options) {
        println!(
            "\nPage {}/{} ({} total items, more available)",
            number, total_pages, page.total_count
        );
    } else {
        println!("\nPage {}/{} ({} total items)", number, total_pages, page.total_count);
    }
    Ok(())
}

// Table row types for non-JSON output

#[derive(Tabled)]
struct ProjectRow {
    uuid: String,
    name: String,
    version: String,
    active: String,
    tags: String,
    vulns: String,
}

impl From<&Project> for ProjectRow {
    fn from(p: &Project) -> Self {
        Self {
            uuid: p.uuid.to_string(),
            name: p.name.clone().unwrap_or_default(),
            version: p.version.clone().unwrap_or_default(),
            active: if p.active { "yes" } else { "no" }.to_string(),
            tags: p
                .tags
                .iter()
                .map(|t| t.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            vulns: p
                .metrics
                .as_ref()
                .map(|m| m.vulnerabilities.to_string())
                .unwrap_or_default(),
        }
    }
}
