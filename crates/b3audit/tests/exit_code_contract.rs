use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{Connection, params};

const EXIT_SUCCESS: i32 = 0;
const EXIT_RUNTIME_FAILURE: i32 = 1;
const EXIT_AUDIT_FAILURE: i32 = 2;
const EXIT_USAGE_ERROR: i32 = 64;

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time should be after unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("{prefix}-{nanos}"))
}

fn write_fixture_db(path: &Path, rows: &[(&str, &str, &str, Option<&str>, Option<&str>, Option<i64>)]) {
    let connection = Connection::open(path).expect("fixture db should open");
    connection
        .execute_batch(b3audit::sqlite::instruments_schema_sql())
        .expect("instruments schema should apply");
    for row in rows {
        connection
            .execute(
                "INSERT INTO b3_instruments_enriched VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![row.0, row.1, row.2, row.3, row.4, row.5],
            )
            .expect("fixture row should insert");
    }
}

fn conformant_rows() -> Vec<(&'static str, &'static str, &'static str, Option<&'static str>, Option<&'static str>, Option<i64>)> {
    vec![
        (
            "PETR4",
            "EQUITY CASH",
            "SHARES",
            Some("PETROLEO BRASILEIRO S.A."),
            Some("Petrobras PN"),
            Some(1),
        ),
        (
            "WDOF26",
            "FUTURE",
            "CURRENCY FUTURES",
            None,
            Some("US Dollar Fut Jan26"),
            Some(10),
        ),
    ]
}

#[test]
fn missing_subcommand_exits_with_usage_code() {
    let status = Command::new(env!("CARGO_BIN_EXE_b3audit"))
        .status()
        .expect("command should execute");

    assert_eq!(status.code(), Some(EXIT_USAGE_ERROR));
}

#[test]
fn missing_database_path_exits_with_runtime_code() {
    let temp = unique_temp_dir("b3audit-exit-no-db");
    let home_dir = temp.join("home");
    std::fs::create_dir_all(&home_dir).expect("home dir should be creatable");

    let status = Command::new(env!("CARGO_BIN_EXE_b3audit"))
        .env_remove("B3AUDIT_DB")
        .args(["--home-dir"])
        .arg(&home_dir)
        .arg("types")
        .status()
        .expect("command should execute");

    assert_eq!(status.code(), Some(EXIT_RUNTIME_FAILURE));
}

#[test]
fn unreachable_database_exits_with_runtime_code() {
    let temp = unique_temp_dir("b3audit-exit-bad-db");
    let home_dir = temp.join("home");
    std::fs::create_dir_all(&home_dir).expect("home dir should be creatable");

    let status = Command::new(env!("CARGO_BIN_EXE_b3audit"))
        .args(["--home-dir"])
        .arg(&home_dir)
        .args(["--db"])
        .arg(temp.join("absent.sqlite"))
        .arg("types")
        .status()
        .expect("command should execute");

    assert_eq!(status.code(), Some(EXIT_RUNTIME_FAILURE));
}

#[test]
fn successful_types_run_exits_zero_and_writes_the_artifact() {
    let temp = unique_temp_dir("b3audit-exit-types-ok");
    let home_dir = temp.join("home");
    std::fs::create_dir_all(&home_dir).expect("home dir should be creatable");
    let db_path = temp.join("instruments.sqlite");
    write_fixture_db(&db_path, &conformant_rows());

    let status = Command::new(env!("CARGO_BIN_EXE_b3audit"))
        .args(["--home-dir"])
        .arg(&home_dir)
        .args(["--db"])
        .arg(&db_path)
        .args(["types", "--strict"])
        .status()
        .expect("command should execute");

    assert_eq!(status.code(), Some(EXIT_SUCCESS));
    let artifact = home_dir
        .join(".b3audit")
        .join("output")
        .join("reports")
        .join("security_types.json");
    assert!(artifact.is_file(), "missing artifact: {}", artifact.display());
}

#[test]
fn strict_mode_exits_with_audit_code_on_mismatches() {
    let temp = unique_temp_dir("b3audit-exit-strict-fail");
    let home_dir = temp.join("home");
    std::fs::create_dir_all(&home_dir).expect("home dir should be creatable");
    let db_path = temp.join("instruments.sqlite");
    // A FUTURE-market row coded as Equity violates the futures rule.
    write_fixture_db(
        &db_path,
        &[(
            "WDOF26",
            "FUTURE",
            "CURRENCY FUTURES",
            None,
            Some("US Dollar Fut Jan26"),
            Some(1),
        )],
    );

    let status = Command::new(env!("CARGO_BIN_EXE_b3audit"))
        .args(["--home-dir"])
        .arg(&home_dir)
        .args(["--db"])
        .arg(&db_path)
        .args(["types", "--strict"])
        .status()
        .expect("command should execute");

    assert_eq!(status.code(), Some(EXIT_AUDIT_FAILURE));
}

#[test]
fn baseline_mode_reports_mismatches_without_failing() {
    let temp = unique_temp_dir("b3audit-exit-baseline-ok");
    let home_dir = temp.join("home");
    std::fs::create_dir_all(&home_dir).expect("home dir should be creatable");
    let db_path = temp.join("instruments.sqlite");
    write_fixture_db(
        &db_path,
        &[(
            "WDOF26",
            "FUTURE",
            "CURRENCY FUTURES",
            None,
            Some("US Dollar Fut Jan26"),
            Some(1),
        )],
    );

    let status = Command::new(env!("CARGO_BIN_EXE_b3audit"))
        .args(["--home-dir"])
        .arg(&home_dir)
        .args(["--db"])
        .arg(&db_path)
        .arg("types")
        .status()
        .expect("command should execute");

    assert_eq!(status.code(), Some(EXIT_SUCCESS));
}

#[test]
fn database_path_falls_back_to_the_environment() {
    let temp = unique_temp_dir("b3audit-exit-env-db");
    let home_dir = temp.join("home");
    std::fs::create_dir_all(&home_dir).expect("home dir should be creatable");
    let db_path = temp.join("instruments.sqlite");
    write_fixture_db(&db_path, &conformant_rows());

    let status = Command::new(env!("CARGO_BIN_EXE_b3audit"))
        .env("B3AUDIT_DB", &db_path)
        .args(["--home-dir"])
        .arg(&home_dir)
        .arg("names")
        .status()
        .expect("command should execute");

    assert_eq!(status.code(), Some(EXIT_SUCCESS));
    let artifact = home_dir
        .join(".b3audit")
        .join("output")
        .join("reports")
        .join("instrument_names.json");
    assert!(artifact.is_file(), "missing artifact: {}", artifact.display());
}

#[test]
fn schema_command_needs_no_database() {
    let status = Command::new(env!("CARGO_BIN_EXE_b3audit"))
        .env_remove("B3AUDIT_DB")
        .arg("schema")
        .status()
        .expect("command should execute");

    assert_eq!(status.code(), Some(EXIT_SUCCESS));
}
