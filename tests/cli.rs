mod common;

use assert_cmd::Command;
use common::TestWorkspace;
use predicates::str::contains;

const USER_SCHEMA: &str = "\
name: User
fields:
  - name: id
    column: ID
    type: uint
  - name: name
    column: Name
    type: string
  - name: active
    column: Active
    type: bool
  - name: joined
    column: Joined On
    type: datetime?
";

fn workspace_with_users(csv: &str) -> TestWorkspace {
    let workspace = TestWorkspace::new();
    workspace.write("user.yml", USER_SCHEMA);
    workspace.write("Users.csv", csv);
    workspace
}

fn sheet_records() -> Command {
    Command::cargo_bin("sheet-records").expect("binary exists")
}

#[test]
fn parse_prints_records_as_json() {
    let workspace =
        workspace_with_users("ID,Name,Active,Joined On\n1,Ada,true,2024-05-06\n2,Grace,no,\n");
    let output = sheet_records()
        .current_dir(workspace.path())
        .args(["parse", "--schema", "user.yml", "--source", ".", "--format", "json"])
        .output()
        .expect("run parse");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let records: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json output");
    assert_eq!(records[0]["id"], 1);
    assert_eq!(records[0]["name"], "Ada");
    assert_eq!(records[0]["active"], true);
    assert_eq!(records[0]["joined"], "2024-05-06T00:00:00Z");
    assert_eq!(records[1]["active"], false);
    assert!(records[1]["joined"].is_null());
}

#[test]
fn parse_prints_table_by_default() {
    let workspace = workspace_with_users("ID,Name,Active\n7,Linus,y\n");
    sheet_records()
        .current_dir(workspace.path())
        .args(["parse", "-s", "user.yml", "--source", "."])
        .assert()
        .success()
        .stdout(contains("id  name   active  joined"))
        .stdout(contains("7   Linus  true"));
}

#[test]
fn parse_uses_options_file_and_cli_datetime_format() {
    let workspace = TestWorkspace::new();
    workspace.write("user.yml", USER_SCHEMA);
    workspace.write("Team.tsv", "ID\tJoined On\n3\t06/05/2024\n");
    let options = workspace.write(
        "options.yml",
        &format!(
            "source_id: {}\ntable_name: Team\n",
            workspace.path().display()
        ),
    );

    sheet_records()
        .args([
            "parse",
            "--schema",
            workspace.path().join("user.yml").to_str().unwrap(),
            "--config",
            options.to_str().unwrap(),
            "--datetime-format",
            "%d/%m/%Y",
            "--format",
            "json",
        ])
        .assert()
        .success()
        .stdout(contains("2024-05-06T00:00:00Z"));
}

#[test]
fn parse_reports_unknown_header_cell() {
    let workspace = workspace_with_users("ID,Foo\n1,x\n");
    sheet_records()
        .current_dir(workspace.path())
        .args(["parse", "-s", "user.yml", "--source", "."])
        .assert()
        .failure()
        .stderr(contains("Users: B1: header 'Foo' does not match any field of 'User'"));
}

#[test]
fn parse_without_source_fails() {
    let workspace = workspace_with_users("ID\n1\n");
    sheet_records()
        .current_dir(workspace.path())
        .args(["parse", "-s", "user.yml"])
        .assert()
        .failure()
        .stderr(contains("no source id provided"));
}

#[test]
fn schema_lists_fields_and_table_name() {
    let workspace = workspace_with_users("");
    sheet_records()
        .current_dir(workspace.path())
        .args(["schema", "-s", "user.yml"])
        .assert()
        .success()
        .stdout(contains("joined  Joined On  option<datetime>"))
        .stdout(contains("table: Users"));
}
