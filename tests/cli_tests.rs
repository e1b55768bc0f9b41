use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};
use serde_json::Value;
use tempfile::TempDir;

const BIN_NAME: &str = "expense";
const TODAY: &str = "2024-03-13";

fn expense(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin(BIN_NAME).expect("binary exists");
    cmd.env("EXPENSE_TRACKER_DATA_DIR", dir.path())
        .env_remove("EXPENSE_TRACKER_TODAY")
        .env_remove("RUST_LOG")
        .args(["--as-of", TODAY]);
    cmd
}

fn run(dir: &TempDir, args: &[&str]) {
    expense(dir).args(args).assert().success();
}

fn json_output(dir: &TempDir, args: &[&str]) -> Value {
    let output = expense(dir).args(args).output().expect("command runs");
    assert!(output.status.success(), "{:?} failed: {:?}", args, output);
    serde_json::from_slice(&output.stdout).expect("valid JSON")
}

fn setup_checking(dir: &TempDir) {
    run(dir, &["init"]);
    run(dir, &["account", "create", "Checking", "--balance", "1000"]);
}

#[test]
fn cli_init_creates_data_directory() {
    let dir = TempDir::new().unwrap();
    expense(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(contains("Initialization complete"));

    assert!(dir.path().join("config.json").exists());

    expense(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(contains("Initialized:    yes").and(contains(TODAY)));
}

#[test]
fn cli_account_create_and_list() {
    let dir = TempDir::new().unwrap();
    setup_checking(&dir);

    expense(&dir)
        .args(["account", "create", "Visa", "-t", "credit", "--limit", "2000", "--due", "2024-03-20"])
        .assert()
        .success()
        .stdout(contains("Created account: Visa"));

    expense(&dir)
        .args(["account", "list"])
        .assert()
        .success()
        .stdout(contains("Checking").and(contains("Visa")).and(contains("Total balance:")));
}

#[test]
fn cli_duplicate_account_fails() {
    let dir = TempDir::new().unwrap();
    setup_checking(&dir);

    expense(&dir)
        .args(["account", "create", "Checking"])
        .assert()
        .failure();
}

#[test]
fn cli_transaction_for_unknown_account_fails() {
    let dir = TempDir::new().unwrap();
    setup_checking(&dir);

    expense(&dir)
        .args(["txn", "add", "Savings", "10", "-c", "Grocery"])
        .assert()
        .failure()
        .stderr(contains("Savings"));
}

#[test]
fn cli_transaction_updates_balance() {
    let dir = TempDir::new().unwrap();
    setup_checking(&dir);

    expense(&dir)
        .args(["txn", "add", "Checking", "100", "-c", "Grocery", "-d", "Weekly shop"])
        .assert()
        .success()
        .stdout(contains("Recorded"));

    let summary = json_output(&dir, &["account", "summary", "Checking", "--json"]);
    assert!(summary["composition_percentage"].is_object());

    expense(&dir)
        .args(["account", "show", "Checking"])
        .assert()
        .success()
        .stdout(contains("900.00"));

    expense(&dir)
        .args(["transaction", "list"])
        .assert()
        .success()
        .stdout(contains("Weekly shop"));
}

#[test]
fn cli_report_aggregate_json() {
    let dir = TempDir::new().unwrap();
    setup_checking(&dir);
    run(&dir, &["txn", "add", "Checking", "100", "-c", "Grocery", "--date", "2024-03-05"]);
    run(&dir, &["txn", "add", "Checking", "50", "-c", "Gas", "--date", "2024-03-10"]);
    run(&dir, &["txn", "add", "Checking", "400", "-c", "Income", "--date", "2024-03-01"]);
    // Previous month, outside the range
    run(&dir, &["txn", "add", "Checking", "80", "-c", "Grocery", "--date", "2024-02-20"]);

    let report = json_output(&dir, &["report", "aggregate", "-p", "month", "--json"]);
    let totals = &report["totals"];
    assert_eq!(totals["Grocery"].as_f64(), Some(100.0));
    assert_eq!(totals["Gas"].as_f64(), Some(50.0));
    assert_eq!(totals["Housing"].as_f64(), Some(0.0));
    assert_eq!(totals["Expense"].as_f64(), Some(150.0));
    assert_eq!(totals["Income"].as_f64(), Some(400.0));
    assert_eq!(totals["Total"].as_f64(), Some(250.0));

    let composition = &report["expense_composition"];
    assert_eq!(composition["Grocery"].as_f64(), Some(66.67));
    assert_eq!(composition["Gas"].as_f64(), Some(33.33));

    assert_eq!(report["expense_change"]["Grocery"].as_f64(), Some(25.0));
    assert_eq!(report["expense_change"]["Gas"].as_f64(), Some(100.0));
}

#[test]
fn cli_report_aggregate_requires_both_range_ends() {
    let dir = TempDir::new().unwrap();
    setup_checking(&dir);

    expense(&dir)
        .args(["report", "aggregate", "--from", "2024-03-01"])
        .assert()
        .failure();
}

#[test]
fn cli_budget_progress() {
    let dir = TempDir::new().unwrap();
    setup_checking(&dir);
    run(
        &dir,
        &["budget", "set", "month", "-i", "2000", "-p", "50", "-s", "Housing=40,Others=60"],
    );
    run(&dir, &["txn", "add", "Checking", "300", "-c", "Housing", "--date", "2024-03-02"]);

    let report = json_output(&dir, &["budget", "show", "month", "--json"]);
    let housing = &report["progress"]["Housing"];
    assert_eq!(housing["budget"].as_f64(), Some(400.0));
    assert_eq!(housing["current"].as_f64(), Some(300.0));
    assert_eq!(housing["percentage"].as_f64(), Some(75.0));

    // Nothing planned for Gas, so any budget is already reached
    assert_eq!(report["progress"]["Gas"]["percentage"].as_u64(), Some(100));

    let missing = json_output(&dir, &["budget", "show", "week", "--json"]);
    assert!(missing.is_null());
}

#[test]
fn cli_budget_rejects_bad_split() {
    let dir = TempDir::new().unwrap();
    setup_checking(&dir);

    expense(&dir)
        .args(["budget", "set", "week", "-i", "500", "-p", "50", "-s", "Housing=40"])
        .assert()
        .failure();
}

#[test]
fn cli_bill_pay_and_sweep() {
    let dir = TempDir::new().unwrap();
    setup_checking(&dir);

    let output = expense(&dir)
        .args(["bill", "add", "Rent", "300", "--due", "2024-03-20", "-c", "Housing", "-a", "Checking"])
        .output()
        .expect("command runs");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let id = stdout
        .lines()
        .find_map(|l| l.trim().strip_prefix("ID: "))
        .expect("bill id printed")
        .to_string();

    expense(&dir)
        .args(["bill", "pay", &id])
        .assert()
        .success()
        .stdout(contains("Paid Rent"));

    let transactions = json_output(&dir, &["txn", "list", "--json"]);
    assert_eq!(transactions.as_array().map(Vec::len), Some(1));

    run(&dir, &["bill", "add", "Gym", "40", "--due", "2024-03-01"]);
    expense(&dir)
        .args(["bill", "sweep"])
        .assert()
        .success()
        .stdout(contains("Overdue: 'Gym'"));

    let bills = json_output(&dir, &["bill", "list", "--json"]);
    assert_eq!(bills.as_array().map(Vec::len), Some(0));

    let messages = json_output(&dir, &["bill", "messages", "--json"]);
    assert_eq!(messages.as_array().map(Vec::len), Some(1));
}

#[test]
fn cli_rollup_and_dashboard() {
    let dir = TempDir::new().unwrap();
    setup_checking(&dir);
    run(&dir, &["txn", "add", "Checking", "20", "-c", "Dining", "--date", "2024-03-12"]);

    let rollup = json_output(&dir, &["report", "rollup", "-n", "2", "--json"]);
    let weeks = rollup["week"].as_array().expect("weekly summaries");
    assert_eq!(weeks.len(), 2);
    assert_eq!(weeks[0]["first_date"], "2024-03-11");

    expense(&dir)
        .args(["report", "dashboard"])
        .assert()
        .success()
        .stdout(contains("Weekly"));
}

#[test]
fn cli_stock_portfolio() {
    let dir = TempDir::new().unwrap();
    run(&dir, &["init"]);

    expense(&dir)
        .args(["stock", "add", "aapl", "--shares", "10", "--close", "182.50", "--date", "2024-03-12"])
        .assert()
        .success()
        .stdout(contains("Added stock: AAPL").and(contains("$1825.00")));

    expense(&dir)
        .args(["stock", "add", "AAPL", "--shares", "1", "--close", "1"])
        .assert()
        .failure();

    run(&dir, &["stock", "snapshot", "--date", "2024-03-12"]);
    run(&dir, &["stock", "price", "AAPL", "--close", "185"]);
    run(&dir, &["stock", "price", "AAPL", "--close", "170", "--date", "2024-01-20"]);
    run(&dir, &["stock", "snapshot"]);

    let report = json_output(&dir, &["stock", "portfolio", "--json"]);
    assert_eq!(report["total_value"], 1850.0);
    assert_eq!(report["holdings"][0]["change"], 2.5);
    assert_eq!(report["value_series"]["2024-03-12"], 1825.0);
    assert_eq!(report["value_series"]["2024-03-13"], 1850.0);

    expense(&dir)
        .args(["stock", "prune"])
        .assert()
        .success()
        .stdout(contains("Removed 1 price(s) and 0 portfolio value(s) dated before 2024-02-01"));

    let detail = json_output(&dir, &["stock", "show", "AAPL", "--json"]);
    assert!(detail["price_list"].get("2024-01-20").is_none());
    assert_eq!(detail["price_list"]["2024-03-13"], 185.0);
}
