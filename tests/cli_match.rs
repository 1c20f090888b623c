//! Behavioural tests for the `lookout match` CLI.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::str::contains;
use rstest::{fixture, rstest};
use tempfile::TempDir;

struct CatalogFile {
    _dir: TempDir,
    path: String,
}

#[fixture]
fn flavors() -> CatalogFile {
    let dir = TempDir::new().unwrap_or_else(|err| panic!("tempdir: {err}"));
    let path = dir.path().join("flavors.json");
    std::fs::write(
        &path,
        r#"[
            { "id": "2", "name": "512MB Standard Instance" },
            { "id": "3", "name": "1GB Standard Instance" },
            { "id": "performance1-4", "name": "4GB Performance" }
        ]"#,
    )
    .unwrap_or_else(|err| panic!("write catalogue: {err}"));
    CatalogFile {
        path: path.display().to_string(),
        _dir: dir,
    }
}

#[rstest]
fn match_prints_first_substring_hit(flavors: CatalogFile) {
    let mut cmd = cargo_bin_cmd!("lookout");
    cmd.args(["match", "--catalog", flavors.path.as_str(), "4gb"]);

    cmd.assert()
        .success()
        .stdout("4GB Performance\tperformance1-4\n");
}

#[rstest]
fn match_uses_listing_order(flavors: CatalogFile) {
    let mut cmd = cargo_bin_cmd!("lookout");
    cmd.args(["match", "--catalog", flavors.path.as_str(), "STANDARD"]);

    cmd.assert()
        .success()
        .stdout("512MB Standard Instance\t2\n");
}

#[rstest]
fn exact_match_rejects_fragments(flavors: CatalogFile) {
    let mut cmd = cargo_bin_cmd!("lookout");
    cmd.args(["match", "--exact", "--catalog", flavors.path.as_str(), "4gb"]);

    cmd.assert()
        .failure()
        .code(1)
        .stderr(contains("no entry matches '4gb'"));
}

#[rstest]
fn missing_catalogue_is_reported() {
    let mut cmd = cargo_bin_cmd!("lookout");
    cmd.args(["match", "--catalog", "/nonexistent/lookout.json", "4gb"]);

    cmd.assert()
        .failure()
        .code(1)
        .stderr(contains("failed to read catalogue /nonexistent/lookout.json"));
}
