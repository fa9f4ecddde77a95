//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the dtrackapi binary.

use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

use crate::ProjectCloneRequest;

/// Dependency-Track API command-line interface.
#[derive(Parser, Debug)]
#[command(name = "dtrackapi", about = "Dependency-Track API CLI", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Base URL of the Dependency-Track server.
    #[arg(
        long,
        global = true,
        env = "DTRACK_API_URL",
        default_value = "http://localhost:8081"
    )]
    pub url: String,

    /// API key. Falls back to `DTRACK_BEARER_TOKEN` when not given.
    #[arg(long, global = true, env = "DTRACK_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the server's version information.
    Version,

    /// Get a project by UUID.
    Get {
        /// The project UUID.
        uuid: Uuid,
    },

    /// List projects with optional filtering and pagination.
    List {
        /// Page number (1-indexed).
        #[arg(long)]
        page: Option<u32>,

        /// Number of items per page.
        #[arg(long)]
        page_size: Option<u32>,

        /// Only projects carrying this tag.
        #[arg(long, conflicts_with = "name")]
        tag: Option<String>,

        /// Only projects with exactly this name (all versions, unpaginated).
        #[arg(long)]
        name: Option<String>,

        /// Leave out inactive projects.
        #[arg(long)]
        exclude_inactive: bool,

        /// Leave out child projects.
        #[arg(long)]
        only_root: bool,
    },

    /// Find a project by exact name and version.
    Lookup {
        /// Project name.
        name: String,

        /// Project version.
        version: String,
    },

    /// Create a project.
    Create {
        /// Project name.
        #[arg(long)]
        name: String,

        /// Project version.
        #[arg(long)]
        version: Option<String>,

        /// Project description.
        #[arg(long)]
        description: Option<String>,

        /// Classifier, e.g. APPLICATION or LIBRARY.
        #[arg(long)]
        classifier: Option<String>,

        /// Tag to attach (repeatable).
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// UUID of the parent project.
        #[arg(long)]
        parent: Option<Uuid>,

        /// Create the project as inactive.
        #[arg(long)]
        inactive: bool,
    },

    /// Change selected fields of a project.
    Patch {
        /// The project UUID.
        uuid: Uuid,

        /// New name.
        #[arg(long)]
        name: Option<String>,

        /// New version.
        #[arg(long)]
        version: Option<String>,

        /// New description.
        #[arg(long)]
        description: Option<String>,

        /// Mark the project active (true) or inactive (false).
        #[arg(long)]
        active: Option<bool>,
    },

    /// Delete a project.
    Delete {
        /// The project UUID.
        uuid: Uuid,
    },

    /// Clone a project as a new version.
    Clone(CloneArgs),
}

/// Arguments of the `clone` command.
#[derive(Args, Debug)]
pub struct CloneArgs {
    /// UUID of the project to clone.
    pub uuid: Uuid,

    /// Version of the clone.
    #[arg(long)]
    pub version: String,

    /// Copy everything: ACL, audit history, components, properties,
    /// services and tags.
    #[arg(long)]
    pub all: bool,

    #[arg(long)]
    pub include_acl: bool,

    #[arg(long)]
    pub include_audit_history: bool,

    #[arg(long)]
    pub include_components: bool,

    #[arg(long)]
    pub include_properties: bool,

    #[arg(long)]
    pub include_services: bool,

    #[arg(long)]
    pub include_tags: bool,

    /// Copy policy violations (server 4.11.0+). `--include-policy-violations`
    /// alone means true; `=false` sends an explicit false.
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub include_policy_violations: Option<bool>,

    /// Mark the clone as the latest version (server 4.12.0+). `--make-latest`
    /// alone means true; `=false` sends an explicit false.
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub make_latest: Option<bool>,
}

impl CloneArgs {
    /// Build the clone request these arguments describe.
    ///
    /// Flags for optional server features are sent only when given, with
    /// whatever value was given.
    pub fn to_request(&self) -> ProjectCloneRequest {
        let mut request = ProjectCloneRequest::new(self.uuid, self.version.clone());
        if self.all {
            request = request.including_everything();
        }
        request.include_acl |= self.include_acl;
        request.include_audit_history |= self.include_audit_history;
        request.include_components |= self.include_components;
        request.include_properties |= self.include_properties;
        request.include_services |= self.include_services;
        request.include_tags |= self.include_tags;
        request.include_policy_violations = self.include_policy_violations;
        request.make_clone_latest = self.make_latest;
        request
    }
}
