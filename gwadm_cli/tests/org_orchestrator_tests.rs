//! Integration tests for the org-unit orchestrator
//!
//! These tests verify member-source assembly and the full update flow against
//! mock directory and org-unit services.

use gwadm_cli::orchestrators::{MemberSource, OrgOrchestrator};
use gwadm_client_core::{ClientConfig, MemberId, OrgUnitChanges};
use gwadm_test_utils::{MockDirectory, MockOrgUnits};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

fn ids(raw: &[&str]) -> Vec<MemberId> {
    raw.iter().map(|r| MemberId::parse(r).unwrap()).collect()
}

fn orchestrator(
    directory: Arc<MockDirectory>,
    org_units: Arc<MockOrgUnits>,
) -> OrgOrchestrator {
    OrgOrchestrator::new(directory, org_units, ClientConfig::test())
}

#[tokio::test]
async fn test_literal_source_update_moves_members() {
    let directory = Arc::new(MockDirectory::new());
    directory.authorize_domain("example.com");
    directory.add_accounts(["alice@example.com", "bob@example.com"]);

    let org_units = Arc::new(MockOrgUnits::new());
    let orchestrator = orchestrator(directory, org_units.clone());

    let source = MemberSource::Literal(vec!["alice".to_string(), "bob@example.com".to_string()]);
    let report = orchestrator
        .update("/Engineering", Some(&source), &OrgUnitChanges::default())
        .await
        .unwrap();

    assert_eq!(report.moved, 2);
    assert!(report.skipped.is_empty());

    let updates = org_units.updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].unit, "/Engineering");
    assert_eq!(updates[0].members, ids(&["alice", "bob@example.com"]));
}

#[tokio::test]
async fn test_file_source_reads_last_csv_column() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Alice,Anderson,alice@example.com").unwrap();
    writeln!(file, "Bob,Brown,bob@example.com").unwrap();
    file.flush().unwrap();

    let directory = Arc::new(MockDirectory::new());
    let org_units = Arc::new(MockOrgUnits::new());
    let orchestrator = orchestrator(directory, org_units);

    let source = MemberSource::File(file.path().to_path_buf());
    let members = orchestrator.assemble_members(&source).await.unwrap();

    assert_eq!(members, ids(&["alice@example.com", "bob@example.com"]));
}

#[tokio::test]
async fn test_missing_file_source_is_an_error() {
    let directory = Arc::new(MockDirectory::new());
    let org_units = Arc::new(MockOrgUnits::new());
    let orchestrator = orchestrator(directory, org_units);

    let source = MemberSource::File("/nonexistent/members.csv".into());
    assert!(orchestrator.assemble_members(&source).await.is_err());
}

#[tokio::test]
async fn test_group_source_uses_group_membership() {
    let directory = Arc::new(MockDirectory::new());
    directory.set_group("eng-all", ids(&["alice@example.com", "bob@example.com"]));

    let org_units = Arc::new(MockOrgUnits::new());
    let orchestrator = orchestrator(directory, org_units);

    let source = MemberSource::Group("eng-all".to_string());
    let members = orchestrator.assemble_members(&source).await.unwrap();

    assert_eq!(members, ids(&["alice@example.com", "bob@example.com"]));
}

#[tokio::test]
async fn test_unknown_group_source_is_an_error() {
    let directory = Arc::new(MockDirectory::new());
    let org_units = Arc::new(MockOrgUnits::new());
    let orchestrator = orchestrator(directory, org_units);

    let source = MemberSource::Group("no-such-group".to_string());
    let err = orchestrator.assemble_members(&source).await.unwrap_err();
    assert!(err.to_string().contains("no-such-group"));
}

#[tokio::test]
async fn test_not_in_group_source_is_the_complement() {
    let directory = Arc::new(MockDirectory::new());
    directory.set_group("eng-all", ids(&["alice@example.com"]));
    directory.set_all_users(ids(&[
        "alice@example.com",
        "bob@example.com",
        "carol@example.com",
    ]));

    let org_units = Arc::new(MockOrgUnits::new());
    let orchestrator = orchestrator(directory, org_units);

    let source = MemberSource::NotInGroup("eng-all".to_string());
    let members = orchestrator.assemble_members(&source).await.unwrap();

    assert_eq!(members, ids(&["bob@example.com", "carol@example.com"]));
}

#[tokio::test]
async fn test_not_in_group_matches_bare_group_identifiers() {
    // Group membership may come back bare while the user listing is qualified
    let directory = Arc::new(MockDirectory::new());
    directory.set_group("eng-all", ids(&["alice"]));
    directory.set_all_users(ids(&["alice@example.com", "bob@example.com"]));

    let org_units = Arc::new(MockOrgUnits::new());
    let orchestrator = orchestrator(directory, org_units);

    let source = MemberSource::NotInGroup("eng-all".to_string());
    let members = orchestrator.assemble_members(&source).await.unwrap();

    assert_eq!(members, ids(&["bob@example.com"]));
}

#[tokio::test]
async fn test_invalid_literal_identifier_is_an_error() {
    let directory = Arc::new(MockDirectory::new());
    let org_units = Arc::new(MockOrgUnits::new());
    let orchestrator = orchestrator(directory, org_units);

    let source = MemberSource::Literal(vec!["alice@one.com@two.com".to_string()]);
    let err = orchestrator.assemble_members(&source).await.unwrap_err();
    assert!(err.to_string().contains("alice@one.com@two.com"));
}

#[tokio::test]
async fn test_metadata_only_update() {
    let directory = Arc::new(MockDirectory::new());
    let org_units = Arc::new(MockOrgUnits::new());
    let orchestrator = orchestrator(directory, org_units.clone());

    let changes = OrgUnitChanges {
        description: Some("Product engineering".to_string()),
        ..Default::default()
    };
    let report = orchestrator.update("/Engineering", None, &changes).await.unwrap();

    assert_eq!(report.moved, 0);
    assert!(report.metadata_applied);
    assert_eq!(org_units.updates().len(), 1);
}

#[tokio::test]
async fn test_update_skips_invalid_members() {
    let directory = Arc::new(MockDirectory::new());
    directory.authorize_domain("example.com");
    directory.add_account("alice@example.com");

    let org_units = Arc::new(MockOrgUnits::new());
    org_units.reject_member(&MemberId::parse("ghost").unwrap());

    let orchestrator = orchestrator(directory, org_units.clone());

    let source = MemberSource::Literal(vec!["alice".to_string(), "ghost".to_string()]);
    let report = orchestrator
        .update("/Engineering", Some(&source), &OrgUnitChanges::default())
        .await
        .unwrap();

    assert_eq!(report.moved, 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].member.as_str(), "ghost");

    // Failed submission plus pruned resubmission
    assert_eq!(org_units.updates().len(), 2);
    assert_eq!(org_units.updates()[1].members, ids(&["alice"]));
}

#[tokio::test]
async fn test_create_and_info() {
    let directory = Arc::new(MockDirectory::new());
    let org_units = Arc::new(MockOrgUnits::new());
    let orchestrator = orchestrator(directory, org_units.clone());

    orchestrator
        .create("Engineering", Some("Product engineering"), "/", false)
        .await
        .unwrap();

    assert_eq!(org_units.created(), vec!["Engineering".to_string()]);

    let info = orchestrator.info("Engineering").await.unwrap();
    assert_eq!(info.name, "Engineering");
    assert_eq!(info.description.as_deref(), Some("Product engineering"));
    assert_eq!(info.parent_path.as_deref(), Some("/"));
    assert!(!info.block_inheritance);
}

#[tokio::test]
async fn test_info_for_missing_unit_is_an_error() {
    let directory = Arc::new(MockDirectory::new());
    let org_units = Arc::new(MockOrgUnits::new());
    let orchestrator = orchestrator(directory, org_units);

    let err = orchestrator.info("/Nope").await.unwrap_err();
    assert!(err.to_string().contains("/Nope"));
}
