//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic test data.

use uuid::Uuid;

use crate::{
    ExternalReference, ParentRef, Project, ProjectMetrics, ProjectProperty, Tag,
};

/// Collection of fixture factories for test data.
pub struct Fixtures;

/// A set of related entities for a test scenario.
pub struct DefaultScenario {
    pub projects: Vec<Project>,
}

impl Fixtures {
    /// `payments@2.1.0`: active, latest, tagged `critical` and `pci`.
    pub const PAYMENTS_UUID: Uuid = Uuid::from_u128(0x6e1f3a52_0b7d_4c1e_9a3b_2f4d5e6a7b01);
    /// `payments@2.0.0`: inactive, tagged `critical`.
    pub const PAYMENTS_OLD_UUID: Uuid = Uuid::from_u128(0x6e1f3a52_0b7d_4c1e_9a3b_2f4d5e6a7b02);
    /// `storefront@1.0.0`: root project tagged `web`.
    pub const STOREFRONT_UUID: Uuid = Uuid::from_u128(0x6e1f3a52_0b7d_4c1e_9a3b_2f4d5e6a7b03);
    /// `storefront-ui@1.0.0`: child of storefront.
    pub const STOREFRONT_UI_UUID: Uuid = Uuid::from_u128(0x6e1f3a52_0b7d_4c1e_9a3b_2f4d5e6a7b04);

    // =========================================================================
    // Project Fixtures
    // =========================================================================

    /// Create a minimal active project with a random UUID.
    pub fn minimal_project(name: &str, version: &str) -> Project {
        Project {
            uuid: Uuid::new_v4(),
            ..Project::new(name).with_version(version)
        }
    }

    /// Create a project carrying the given tags.
    pub fn tagged_project(name: &str, version: &str, tags: &[&str]) -> Project {
        let mut project = Self::minimal_project(name, version);
        project.tags = tags.iter().map(|t| Tag::from(*t)).collect();
        project
    }

    /// Create a project nested under `parent`.
    pub fn child_project(name: &str, version: &str, parent: Uuid) -> Project {
        let mut project = Self::minimal_project(name, version);
        project.parent = Some(ParentRef::from(parent));
        project
    }

    /// Create a project with vulnerability metrics and a BOM import time.
    pub fn analyzed_project(name: &str, version: &str, critical: u32, high: u32) -> Project {
        let mut project = Self::minimal_project(name, version);
        project.classifier = Some("APPLICATION".to_string());
        project.last_bom_import = 1_717_171_717_000;
        project.metrics = Some(ProjectMetrics {
            critical,
            high,
            vulnerabilities: critical + high,
            vulnerable_components: (critical + high).min(1),
            components: 42,
            inherited_risk_score: f64::from(critical * 10 + high * 5),
            ..Default::default()
        });
        project
    }

    // =========================================================================
    // Scenarios
    // =========================================================================

    /// A small portfolio: two versions of a service, and a parent/child pair.
    pub fn default_scenario() -> DefaultScenario {
        let mut payments = Self::analyzed_project("payments", "2.1.0", 1, 3);
        payments.uuid = Self::PAYMENTS_UUID;
        payments.tags = vec![Tag::from("critical"), Tag::from("pci")];
        payments.is_latest = Some(true);
        payments.description = Some("Payments backend".to_string());
        payments.purl = Some("pkg:maven/com.acme/payments@2.1.0".to_string());
        payments.properties = vec![ProjectProperty {
            group: Some("ci".to_string()),
            name: Some("pipeline".to_string()),
            value: Some("main".to_string()),
            property_type: Some("STRING".to_string()),
            description: None,
        }];
        payments.external_references = vec![ExternalReference {
            reference_type: Some("vcs".to_string()),
            url: Some("https://git.example.com/acme/payments".to_string()),
            comment: None,
        }];

        let mut payments_old = Self::tagged_project("payments", "2.0.0", &["critical"]);
        payments_old.uuid = Self::PAYMENTS_OLD_UUID;
        payments_old.active = false;
        payments_old.is_latest = Some(false);

        let mut storefront = Self::tagged_project("storefront", "1.0.0", &["web"]);
        storefront.uuid = Self::STOREFRONT_UUID;

        let mut storefront_ui =
            Self::child_project("storefront-ui", "1.0.0", Self::STOREFRONT_UUID);
        storefront_ui.uuid = Self::STOREFRONT_UI_UUID;

        DefaultScenario {
            projects: vec![payments, payments_old, storefront, storefront_ui],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scenario_uuids_are_distinct() {
        let scenario = Fixtures::default_scenario();
        let mut uuids: Vec<Uuid> = scenario.projects.iter().map(|p| p.uuid).collect();
        uuids.sort();
        uuids.dedup();
        assert_eq!(uuids.len(), scenario.projects.len());
    }

    #[test]
    fn test_analyzed_project_has_metrics() {
        let project = Fixtures::analyzed_project("a", "1", 2, 1);
        let metrics = project.metrics.as_ref().unwrap();
        assert_eq!(metrics.vulnerabilities, 3);
        assert!(project.last_bom_import_at().is_some());
    }
}
