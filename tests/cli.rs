use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn dpgen() -> Command {
    Command::cargo_bin("dpgen").unwrap()
}

#[test]
fn convert_prints_job_and_monitor_scripts() {
    dpgen()
        .args(["convert", "expdp hr/hr directory=DP dumpfile=hr.dmp schemas=hr"])
        .assert()
        .success()
        .stdout(predicate::str::contains("h1 := DBMS_DATAPUMP.OPEN("))
        .stdout(predicate::str::contains("'IN (''HR'')'"))
        .stdout(predicate::str::contains("DBMS_DATAPUMP.DETACH(handle => h1);"))
        .stdout(predicate::str::contains("-- Monitoring script"))
        .stdout(predicate::str::contains("FROM dba_datapump_jobs"));
}

#[test]
fn convert_accepts_unquoted_tokens() {
    dpgen()
        .args([
            "convert",
            "--variant",
            "wait",
            "impdp",
            "directory=DP",
            "dumpfile=x.dmp",
            "table_exists_action=replace",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("WAIT_FOR_JOB"))
        .stdout(predicate::str::contains("'TABLE_EXISTS_ACTION'"))
        .stdout(predicate::str::contains("Monitoring script").not());
}

#[test]
fn convert_rejects_missing_utility() {
    dpgen()
        .args(["convert", "exp hr/hr directory=DP"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Command must start with expdp or impdp"))
        .stdout(predicate::str::is_empty());
}

#[test]
fn form_requires_directory_and_dumpfile() {
    dpgen()
        .args(["form", "--operation", "export", "--objects", "hr"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please fill in required fields"))
        .stdout(predicate::str::is_empty());
}

#[test]
fn form_writes_scripts_to_output_dir() {
    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("scripts");

    dpgen()
        .args([
            "form",
            "--operation",
            "export",
            "--job-mode",
            "table",
            "--directory",
            "DP",
            "--dumpfile",
            "emp.dmp",
            "--objects",
            "emp",
            "--filesize",
            "2",
            "--unique-name",
            "-o",
        ])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("_monitor.sql"));

    let mut files: Vec<_> = std::fs::read_dir(&out)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    files.sort();
    assert_eq!(files.len(), 2);

    let job = std::fs::read_to_string(&files[0]).unwrap();
    assert!(job.contains("'emp_%U.dmp'"));
    assert!(job.contains("value  => 2147483648"));
    assert!(job.contains("'NAME_EXPR'"));
}

#[test]
fn parse_shows_normalized_parameters() {
    dpgen()
        .args([
            "parse",
            "expdp scott/tiger DIRECTORY=a directory=b encryption_password=Secret reuse=y",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("operation=EXPORT"))
        .stdout(predicate::str::contains("job_mode=SCHEMA"))
        .stdout(predicate::str::contains("directory=b"))
        .stdout(predicate::str::contains("reuse=y"))
        .stdout(predicate::str::contains("Secret").not());
}
