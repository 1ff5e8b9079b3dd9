use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn gwadm(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("gwadm").unwrap();
    // Isolate from the host configuration and environment
    cmd.env("XDG_CONFIG_HOME", config_dir.path())
        .env_remove("GWADM_TOKEN")
        .env_remove("GWADM_CLIENT__DOMAIN");
    cmd
}

#[test]
fn test_version() {
    let config_dir = TempDir::new().unwrap();
    gwadm(&config_dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_lists_commands() {
    let config_dir = TempDir::new().unwrap();
    gwadm(&config_dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("org"))
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_unknown_command_is_usage_error() {
    let config_dir = TempDir::new().unwrap();
    gwadm(&config_dir).arg("frobnicate").assert().code(2);
}

#[test]
fn test_missing_domain_is_usage_error() {
    let config_dir = TempDir::new().unwrap();
    gwadm(&config_dir)
        .args(["org", "info", "/Engineering"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No default domain configured"));
}

#[test]
fn test_missing_token_is_usage_error() {
    let config_dir = TempDir::new().unwrap();
    gwadm(&config_dir)
        .args(["--domain", "example.com", "org", "info", "/Engineering"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No API token configured"))
        .stderr(predicate::str::contains("GWADM_TOKEN"));
}

#[test]
fn test_invalid_output_format_is_usage_error() {
    let config_dir = TempDir::new().unwrap();
    gwadm(&config_dir)
        .args(["--format", "xml", "org", "info", "/Engineering"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown output format"));
}

#[test]
fn test_update_member_sources_are_mutually_exclusive() {
    let config_dir = TempDir::new().unwrap();
    gwadm(&config_dir)
        .args([
            "org",
            "update",
            "/Engineering",
            "--add",
            "alice",
            "--group",
            "eng-all",
        ])
        .assert()
        .code(2);
}

#[test]
fn test_config_set_and_get_round_trip() {
    let config_dir = TempDir::new().unwrap();

    gwadm(&config_dir)
        .args(["config", "set", "client.batch_ceiling", "25"])
        .assert()
        .success();

    gwadm(&config_dir)
        .args(["config", "get", "client.batch_ceiling"])
        .assert()
        .success()
        .stdout(predicate::str::contains("25"));
}

#[test]
fn test_config_set_rejects_zero_batch_ceiling() {
    let config_dir = TempDir::new().unwrap();
    gwadm(&config_dir)
        .args(["config", "set", "client.batch_ceiling", "0"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("batch_ceiling"));
}

#[test]
fn test_config_never_echoes_the_token() {
    let config_dir = TempDir::new().unwrap();

    gwadm(&config_dir)
        .args(["config", "set", "token", "super-secret"])
        .assert()
        .success()
        .stdout(predicate::str::contains("super-secret").not());

    gwadm(&config_dir)
        .args(["config", "get", "token"])
        .assert()
        .success()
        .stdout(predicate::str::contains("********"))
        .stdout(predicate::str::contains("super-secret").not());

    gwadm(&config_dir)
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("super-secret").not());
}

#[test]
fn test_config_list_shows_defaults() {
    let config_dir = TempDir::new().unwrap();
    gwadm(&config_dir)
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("client.batch_ceiling"))
        .stdout(predicate::str::contains("client.prefilter_threshold"));
}

#[test]
fn test_completions_generate() {
    let config_dir = TempDir::new().unwrap();
    gwadm(&config_dir)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gwadm"));
}
