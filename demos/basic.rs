//! Basic example demonstrating the Dependency-Track API client.
//!
//! Run with:
//! ```
//! DTRACK_API_KEY=your-key DTRACK_API_URL=http://localhost:8081 cargo run --example basic
//! ```

use dtrackapi::{DtrackClient, Get, List, PageOptions, Project, ProjectListQuery};

#[tokio::main]
async fn main() -> dtrackapi::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    // Create client from environment variables
    println!("Creating Dependency-Track client...");
    let mut client = DtrackClient::from_env()?;
    println!("Connected to: {}", client.base_url());

    let version = client.detect_server_version().await?;
    println!("Server version: {version}");

    // List first page of active projects
    println!("\n--- Listing Projects (first page) ---");
    let query = ProjectListQuery {
        exclude_inactive: Some(true),
        ..Default::default()
    };
    let page = Project::list_page(&client, &query, &PageOptions::for_page(1, 10)).await?;
    println!("Found {} projects (total: {})", page.len(), page.total_count);

    for project in &page {
        println!("  - {} ({})", project.display_name(), project.uuid);
    }

    // Get a specific project (using the first one from the list)
    if let Some(first) = page.items.first() {
        println!("\n--- Getting Project Details ---");
        let project = Project::get(&client, first.uuid).await?;
        println!("Project: {}", project.display_name());
        println!("  Classifier: {}", project.classifier.as_deref().unwrap_or("unknown"));
        println!("  Active: {}", project.active);
        match project.last_bom_import_at() {
            Some(at) => println!("  Last BOM import: {at}"),
            None => println!("  Last BOM import: never"),
        }
        if let Some(metrics) = &project.metrics {
            println!(
                "  Vulnerabilities: {} ({} critical, {} high)",
                metrics.vulnerabilities, metrics.critical, metrics.high
            );
        }

        // Every version of the same project
        if let Some(name) = project.name.as_deref() {
            println!("\n--- Other Versions ---");
            let versions = Project::for_name(&client, name, false, false).await?;
            for other in versions.iter().filter(|p| p.uuid != project.uuid) {
                let latest = if other.is_latest == Some(true) { " (latest)" } else { "" };
                println!("  - {}{}", other.display_name(), latest);
            }
        }

        // Children, for project hierarchies
        let children = project.children(&client, &PageOptions::default()).await?;
        if !children.is_empty() {
            println!("\n--- Child Projects ---");
            for child in &children {
                println!("  - {}", child.display_name());
            }
        }
    }

    println!("\nDone!");
    Ok(())
}
