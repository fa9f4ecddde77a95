//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization.

use crate::{About, Project};

/// Trait for human-readable key-value output.
///
/// Implemented by entity types to provide formatted output
/// suitable for terminal display when `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

impl PrettyPrint for Project {
    fn pretty_print(&self) -> String {
        let header = format!("Project: {}", self.display_name());
        let divider = "─".repeat(header.chars().count().max(30));

        let mut lines = vec![
            header,
            divider,
            format!("UUID:           {}", self.uuid),
            format!("Active:         {}", if self.active { "yes" } else { "no" }),
        ];

        if let Some(is_latest) = self.is_latest {
            lines.push(format!(
                "Latest:         {}",
                if is_latest { "yes" } else { "no" }
            ));
        }

        if let Some(ref group) = self.group {
            lines.push(format!("Group:          {}", group));
        }

        if let Some(ref classifier) = self.classifier {
            lines.push(format!("Classifier:     {}", classifier));
        }

        if let Some(ref description) = self.description {
            lines.push(format!("Description:    {}", description));
        }

        if let Some(ref purl) = self.purl {
            lines.push(format!("PURL:           {}", purl));
        }

        if !self.tags.is_empty() {
            let tags: Vec<&str> = self.tags.iter().map(|t| t.name.as_str()).collect();
            lines.push(format!("Tags:           {}", tags.join(", ")));
        }

        if let Some(ref parent) = self.parent {
            lines.push(format!("Parent:         {}", parent.uuid));
        }

        if let Some(ref metrics) = self.metrics {
            lines.push(format!(
                "Vulns:          {} ({} critical, {} high, {} medium, {} low)",
                metrics.vulnerabilities, metrics.critical, metrics.high, metrics.medium, metrics.low
            ));
            lines.push(format!("Risk Score:     {}", metrics.inherited_risk_score));
        }

        if let Some(imported) = self.last_bom_import_at() {
            lines.push(format!(
                "Last BOM:       {}",
                imported.format("%Y-%m-%d %H:%M:%S UTC")
            ));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for About {
    fn pretty_print(&self) -> String {
        let application = self.application.as_deref().unwrap_or("Dependency-Track");
        let header = format!("{} {}", application, self.version);
        let divider = "─".repeat(header.chars().count().max(30));

        let mut lines = vec![header, divider];

        if let Some(ref timestamp) = self.timestamp {
            lines.push(format!("Built:          {}", timestamp));
        }

        if let Some(ref framework) = self.framework {
            lines.push(format!(
                "Framework:      {} {}",
                framework.name, framework.version
            ));
        }

        if let Some(ref system_uuid) = self.system_uuid {
            lines.push(format!("System UUID:    {}", system_uuid));
        }

        lines.join("\n")
    }
}
