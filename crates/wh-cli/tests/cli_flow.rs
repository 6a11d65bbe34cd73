//! End-to-end tests running the `wh` binary against a temporary database.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn wh_binary() -> &'static str {
    env!("CARGO_BIN_EXE_wh")
}

/// A temporary home with a config file pointing at a fresh database.
struct Sandbox {
    temp: TempDir,
    config: PathBuf,
}

impl Sandbox {
    fn new(extra_config: &str) -> Self {
        let temp = TempDir::new().unwrap();
        let db_path = temp.path().join("data").join("wh.db");
        let config = temp.path().join("wh.toml");

        let mut file = std::fs::File::create(&config).unwrap();
        writeln!(file, "database_path = {:?}", db_path.to_string_lossy()).unwrap();
        writeln!(file, "{extra_config}").unwrap();
        file.flush().unwrap();

        Self { temp, config }
    }

    fn home(&self) -> &Path {
        self.temp.path()
    }

    fn wh(&self, args: &[&str]) -> Output {
        Command::new(wh_binary())
            .env("HOME", self.home())
            .env_remove("XDG_CONFIG_HOME")
            .env_remove("XDG_DATA_HOME")
            .env_remove("WH_USER")
            .env_remove("WH_DATABASE_PATH")
            .env_remove("RUST_LOG")
            .arg("--config")
            .arg(&self.config)
            .args(args)
            .output()
            .expect("failed to run wh")
    }

    /// Runs `wh` and returns stdout, failing the test on a non-zero exit.
    fn ok(&self, args: &[&str]) -> String {
        let output = self.wh(args);
        assert!(
            output.status.success(),
            "wh {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout).unwrap()
    }

    /// Runs `wh` expecting failure and returns stderr.
    fn err(&self, args: &[&str]) -> String {
        let output = self.wh(args);
        assert!(
            !output.status.success(),
            "wh {args:?} should fail: {}",
            String::from_utf8_lossy(&output.stdout)
        );
        String::from_utf8(output.stderr).unwrap()
    }
}

#[test]
fn test_fill_a_day_then_add_extra() {
    let sandbox = Sandbox::new("");
    let on_date = |args: &[&'static str]| [args, &["--date", "2025-06-02"][..]].concat();

    let out = sandbox.ok(&on_date(&["add", "worked", "--hours", "5h", "-d", "api"]));
    assert!(out.contains("Remaining: 3h"), "{out}");

    let err = sandbox.err(&on_date(&["add", "worked", "--hours", "4h", "-d", "docs"]));
    assert!(err.contains("cannot add worked entry on 2025-06-02"), "{err}");

    let err = sandbox.err(&on_date(&["add", "extra", "--hours", "1h", "-d", "deploy"]));
    assert!(err.contains("cannot add extra entry"), "{err}");

    let out = sandbox.ok(&on_date(&["add", "worked", "--hours", "3h", "-d", "docs"]));
    assert!(out.contains("Day complete."), "{out}");

    let out = sandbox.ok(&on_date(&["add", "extra", "--hours", "1h 30m", "-d", "deploy"]));
    assert!(out.contains("extra 1h 30m"), "{out}");

    let out = sandbox.ok(&["day", "--date", "2025-06-02", "--json"]);
    let day: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(day["entries"].as_array().unwrap().len(), 3);
    assert_eq!(day["ledger"]["worked_total"], 8.0);
    assert_eq!(day["ledger"]["extra_total"], 1.5);
}

#[test]
fn test_invalid_hours_are_rejected_before_storing() {
    let sandbox = Sandbox::new("");

    let err = sandbox.err(&["add", "worked", "--hours", "lots", "-d", "api"]);
    assert!(err.contains("invalid hours: lots"), "{err}");

    let out = sandbox.ok(&["status"]);
    assert!(out.contains("No entries recorded."), "{out}");
}

#[test]
fn test_weekend_requires_confirmation() {
    let sandbox = Sandbox::new("");
    let args = ["add", "worked", "--hours", "2", "-d", "ops", "--date", "2025-06-07"];

    let err = sandbox.err(&args);
    assert!(err.contains("is a weekend; pass --yes"), "{err}");

    let out = sandbox.ok(&[&args[..], &["--yes"][..]].concat());
    assert!(out.contains("Added worked entry"), "{out}");
}

#[test]
fn test_weekend_confirmation_can_be_disabled() {
    let sandbox = Sandbox::new("confirm_weekend_entry = false");
    sandbox.ok(&["add", "worked", "--hours", "2", "-d", "ops", "--date", "2025-06-07"]);
}

#[test]
fn test_enforced_previous_day_check() {
    let sandbox = Sandbox::new("enforce_previous_day_check = true");
    let args = ["add", "worked", "--hours", "8h", "-d", "api", "--date", "2025-06-03"];

    let err = sandbox.err(&args);
    assert!(
        err.contains("previous laborable day 2025-06-02 is incomplete"),
        "{err}"
    );

    sandbox.ok(&[&args[..], &["--force"][..]].concat());
}

#[test]
fn test_absence_with_new_cause_saves_reason() {
    let sandbox = Sandbox::new("");

    let out = sandbox.ok(&[
        "add", "absence", "--cause", "Trámite", "--hours", "2h", "--date", "2025-06-05",
    ]);
    assert!(out.contains("Saved new partial reason \"Trámite\""), "{out}");

    let out = sandbox.ok(&["reasons", "list", "--json"]);
    let reasons: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(reasons[0]["name"], "Trámite");
    assert_eq!(reasons[0]["full_day"], false);
    assert_eq!(reasons[0]["global"], false);

    // A full-day absence needs an empty day.
    let err = sandbox.err(&[
        "add", "absence", "--cause", "Vacaciones", "--full-day", "--date", "2025-06-05",
    ]);
    assert!(err.contains("cannot add external entry"), "{err}");
    let out = sandbox.ok(&["reasons", "list"]);
    assert!(!out.contains("Vacaciones"), "{out}");
}

#[test]
fn test_users_are_isolated() {
    let sandbox = Sandbox::new(r#"user = "ana""#);
    sandbox.ok(&["add", "worked", "--hours", "8", "-d", "api", "--date", "2025-06-02"]);

    let out = sandbox.ok(&["status"]);
    assert!(out.contains("User: ana"), "{out}");
    assert!(out.contains("Entries: 1 (2025-06-02 to 2025-06-02)"), "{out}");

    let out = sandbox.ok(&["--user", "luis", "status"]);
    assert!(out.contains("User: luis"), "{out}");
    assert!(out.contains("No entries recorded."), "{out}");
}

#[test]
fn test_delete_entry_by_id() {
    let sandbox = Sandbox::new("");
    sandbox.ok(&["add", "worked", "--hours", "4", "-d", "api", "--date", "2025-06-02"]);

    let out = sandbox.ok(&["day", "--date", "2025-06-02", "--json"]);
    let day: serde_json::Value = serde_json::from_str(&out).unwrap();
    let id = day["entries"][0]["id"].as_str().unwrap().to_string();

    let out = sandbox.ok(&["delete", &id]);
    assert!(out.contains("Deleted worked entry on 2025-06-02"), "{out}");

    let err = sandbox.err(&["delete", &id]);
    assert!(err.contains("no entry"), "{err}");
}

#[test]
fn test_holidays_shape_the_month() {
    let sandbox = Sandbox::new("");
    sandbox.ok(&["holidays", "add", "2025-06-20", "Belgrano"]);

    let out = sandbox.ok(&["holidays", "list", "--year", "2025"]);
    assert!(out.contains("2025-06-20 (Fri)  personal  Belgrano"), "{out}");

    let out = sandbox.ok(&["month", "--month", "2025-06", "--json"]);
    let summary: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(summary["laborable_days"], 20);
    assert_eq!(summary["expected_hours"], 160.0);

    sandbox.ok(&["holidays", "delete", "2025-06-20"]);
    let out = sandbox.ok(&["stats", "--month", "2025-06", "--json"]);
    let stats: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(stats["laborable_days"], 21);
}

#[test]
fn test_edit_reason_and_holiday() {
    let sandbox = Sandbox::new("");
    sandbox.ok(&["reasons", "add", "Médico"]);

    let out = sandbox.ok(&[
        "reasons", "edit", "MEDICO", "--partial", "--rename", "Médico clínico",
    ]);
    assert!(out.contains("Updated personal partial reason \"Médico clínico\""), "{out}");

    let out = sandbox.ok(&[
        "add", "absence", "--cause", "MÉDICO CLÍNICO", "--hours", "3h", "--date", "2025-06-05",
    ]);
    assert!(out.contains("3h Médico clínico"), "{out}");
    assert!(!out.contains("Saved new"), "{out}");

    sandbox.ok(&["holidays", "add", "2025-06-19", "Mudanza"]);
    let out = sandbox.ok(&["holidays", "edit", "2025-06-19", "--date", "2025-06-20"]);
    assert!(out.contains("Moved holiday from 2025-06-19 to 2025-06-20: Mudanza"), "{out}");

    let err = sandbox.err(&["holidays", "edit", "2025-06-19", "--reason", "x"]);
    assert!(err.contains("no personal holiday on 2025-06-19"), "{err}");
}

#[test]
fn test_no_subcommand_prints_help() {
    let sandbox = Sandbox::new("");
    let out = sandbox.ok(&[]);
    assert!(out.contains("Usage: wh"), "{out}");
}
