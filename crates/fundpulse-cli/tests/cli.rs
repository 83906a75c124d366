//! Offline command tests for the `fundpulse` binary.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const MISSING_KEY_VAR: &str = "FUNDPULSE_TEST_UNSET_API_KEY";

const FUND_JSON: &str = r#"{
  "code": "161725",
  "name": "Liquor Index Fund",
  "yields": { "OneMonth": 1.25, "OneYear": -8.5 },
  "holdings": [
    { "code": "600519", "name": "Kweichow Moutai", "weight": 15 },
    { "code": "000858", "name": "Wuliangye", "weight": 12 }
  ]
}"#;

const ARTICLES_JSON: &str = r#"{
  "Kweichow Moutai": {
    "https://news.example.com/moutai": {
      "title": "Moutai beats estimates",
      "content": "Moutai beats estimates\nRevenue rose 18%."
    }
  }
}"#;

/// A data directory using the JSON backend and a config file pointing at it.
struct Workspace {
    dir: TempDir,
    config: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config.toml");
        std::fs::write(
            &config,
            format!(
                "data_dir = '{}'\ncache_backend = \"json\"\napi_key_env = \"{}\"\n",
                dir.path().join("data").display(),
                MISSING_KEY_VAR
            ),
        )
        .unwrap();
        Self { dir, config }
    }

    fn data_dir(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    fn with_fund(self) -> Self {
        self.seed("fund.json", FUND_JSON)
    }

    fn with_articles(self) -> Self {
        self.seed("articles.json", ARTICLES_JSON)
    }

    fn seed(self, file: &str, content: &str) -> Self {
        std::fs::create_dir_all(self.data_dir()).unwrap();
        std::fs::write(self.data_dir().join(file), content).unwrap();
        self
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("fundpulse").unwrap();
        cmd.env_remove("FUNDPULSE_DATA_DIR")
            .env_remove("FUNDPULSE_CONFIG")
            .env_remove("RUST_LOG")
            .env_remove(MISSING_KEY_VAR)
            .arg("--config")
            .arg(&self.config);
        cmd
    }

    fn log_file(&self) -> PathBuf {
        self.data_dir().join("fundpulse.log")
    }
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_default()
}

#[test]
fn predict_without_fund_fails() {
    let ws = Workspace::new();
    ws.cmd()
        .arg("predict")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No fund selected"));
}

#[test]
fn holdings_without_fund_fails() {
    let ws = Workspace::new();
    ws.cmd()
        .arg("holdings")
        .assert()
        .failure()
        .stderr(predicate::str::contains("fund set"));
}

#[test]
fn predict_without_api_key_fails_before_searching() {
    let ws = Workspace::new().with_fund();
    ws.cmd()
        .args(["predict", "all"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(MISSING_KEY_VAR));
}

#[test]
fn fund_show_reads_current_fund() {
    let ws = Workspace::new().with_fund();
    ws.cmd()
        .args(["fund", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Liquor Index Fund"))
        .stdout(predicate::str::contains("161725"));
}

#[test]
fn holdings_as_json() {
    let ws = Workspace::new().with_fund();
    ws.cmd()
        .args(["--format", "json", "holdings"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"600519\""))
        .stdout(predicate::str::contains("Wuliangye"));
}

#[test]
fn yields_mark_missing_periods() {
    let ws = Workspace::new().with_fund();
    ws.cmd()
        .args(["--format", "csv", "yields"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 month,1.25%"))
        .stdout(predicate::str::contains("3 months,-"))
        .stdout(predicate::str::contains("1 year,-8.50%"));
}

#[test]
fn fund_clear_forgets_the_fund() {
    let ws = Workspace::new().with_fund();
    ws.cmd().args(["fund", "clear"]).assert().success();
    ws.cmd()
        .arg("yields")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No fund selected"));
}

#[test]
fn articles_list_on_empty_cache() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["articles", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No results."));
}

#[test]
fn articles_subjects_and_show() {
    let ws = Workspace::new().with_articles();
    ws.cmd()
        .args(["articles", "subjects"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Kweichow Moutai"));

    ws.cmd()
        .args(["--format", "minimal", "articles", "show"])
        .arg("https://news.example.com/moutai")
        .assert()
        .success()
        .stdout(predicate::str::contains("Revenue rose 18%."));
}

#[test]
fn articles_list_filters_by_subject() {
    let ws = Workspace::new().with_articles();
    ws.cmd()
        .args(["--format", "json", "articles", "list", "--subject", "Wuliangye"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));
}

#[test]
fn articles_show_unknown_url_fails() {
    let ws = Workspace::new().with_articles();
    ws.cmd()
        .args(["articles", "show", "https://news.example.com/missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No cached article"));
}

#[test]
fn articles_clear_empties_cache() {
    let ws = Workspace::new().with_articles();
    ws.cmd().args(["articles", "clear"]).assert().success();
    ws.cmd()
        .args(["articles", "subjects"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No results."));
}

#[test]
fn logs_clear_truncates_log_file() {
    let ws = Workspace::new().with_fund();
    ws.cmd().args(["fund", "show"]).assert().success();
    assert!(ws.log_file().exists());

    ws.cmd().args(["logs", "clear"]).assert().success();
    ws.cmd()
        .args(["--format", "json", "logs", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));
}

#[test]
fn logs_show_tails_the_file() {
    let ws = Workspace::new();
    std::fs::create_dir_all(ws.data_dir()).unwrap();
    std::fs::write(ws.log_file(), "first\nsecond\nthird\n").unwrap();

    ws.cmd()
        .args(["--format", "minimal", "logs", "show", "--tail", "1"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("third"))
        .stdout(predicate::str::contains("first").not());
}

#[test]
fn config_path_echoes_explicit_file() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn config_init_writes_defaults_to_new_file() {
    let ws = Workspace::new();
    let target = ws.dir.path().join("nested").join("fresh.toml");

    let mut cmd = Command::cargo_bin("fundpulse").unwrap();
    cmd.env_remove("FUNDPULSE_CONFIG")
        .arg("--config")
        .arg(&target)
        .args(["config", "init"])
        .assert()
        .success();

    let written = read(&target);
    assert!(written.contains("cache_backend = \"redb\""));
    assert!(written.contains("api_key_env = \"API_KEY\""));
}

#[test]
fn missing_explicit_config_fails() {
    let ws = Workspace::new();
    let mut cmd = Command::cargo_bin("fundpulse").unwrap();
    cmd.env_remove("FUNDPULSE_CONFIG")
        .arg("--config")
        .arg(ws.dir.path().join("absent.toml"))
        .arg("holdings")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration file not found"));
}
