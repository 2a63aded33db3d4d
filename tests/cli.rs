use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

use tempfile::TempDir;

const BIN: &str = env!("CARGO_BIN_EXE_sales-total");

fn testdata(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata").join(name)
}

fn run_in(dir: &Path, args: &[PathBuf]) -> Output {
    Command::new(BIN)
        .args(args)
        .current_dir(dir)
        .env_remove("SALES_RESULTS")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn binary_writes_report_to_file_and_stdout() {
    let dir = TempDir::new().unwrap();
    let prices = testdata("prices.json");
    let sales = testdata("sales.json");
    let output = run_in(dir.path(), &[prices.clone(), sales.clone()]);
    assert_eq!(output.status.code(), Some(0));

    let results = fs::read_to_string(dir.path().join("SalesResults.txt")).unwrap();
    let lines: Vec<_> = results.lines().collect();
    assert_eq!(lines.len(), 4, "wrong number of lines: {results}");
    assert_eq!(lines[0], format!("PRICE_LIST:  {}", prices.display()));
    assert_eq!(lines[1], format!("SALES_LIST:  {}", sales.display()));
    assert_eq!(lines[2], "TOTAL SALES: 165.55");
    assert!(lines[3].starts_with("ELAPSED TIME: "), "{}", lines[3]);
    assert!(lines[3].ends_with(" seconds."), "{}", lines[3]);
    assert_eq!(stdout(&output), results);
}

#[test]
fn binary_reports_missing_products_and_still_succeeds() {
    let dir = TempDir::new().unwrap();
    let output = run_in(
        dir.path(),
        &[testdata("abc_prices.json"), testdata("abc_sales.json")],
    );
    assert_eq!(output.status.code(), Some(0));
    let out = stdout(&output);
    assert!(out.contains("Product C is not in the price list."), "{out}");
    assert!(out.contains("TOTAL SALES: 20.00\n"), "{out}");
}

#[test]
fn binary_prints_usage_and_exits_ok_with_too_few_args() {
    let dir = TempDir::new().unwrap();
    for args in [vec![], vec![testdata("prices.json")]] {
        let output = run_in(dir.path(), &args);
        assert_eq!(output.status.code(), Some(0));
        assert!(stdout(&output).starts_with("Usage:"), "{}", stdout(&output));
    }
    assert!(!dir.path().join("SalesResults.txt").exists());
}

#[test]
fn binary_exit_status_includes_empty_sales_list() {
    let dir = TempDir::new().unwrap();
    let output = run_in(dir.path(), &[testdata("prices.json"), testdata("empty.json")]);
    assert_eq!(output.status.code(), Some(1));
    let results = fs::read_to_string(dir.path().join("SalesResults.txt")).unwrap();
    assert!(!results.contains("TOTAL SALES"), "{results}");
    assert!(results.starts_with("ELAPSED TIME: "), "{results}");
}

#[test]
fn binary_exit_status_sums_empty_and_error() {
    let dir = TempDir::new().unwrap();
    let output = run_in(
        dir.path(),
        &[testdata("prices_invalid.json"), testdata("bogus.json")],
    );
    assert_eq!(output.status.code(), Some(10));
    let out = stdout(&output);
    assert!(
        out.contains("[ERROR] - An exception ocurred while processing sales list file"),
        "{out}"
    );
}

#[test]
fn binary_exits_with_error_when_results_file_is_a_directory() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("SalesResults.txt")).unwrap();
    let output = run_in(dir.path(), &[testdata("prices.json"), testdata("sales.json")]);
    assert_eq!(output.status.code(), Some(9));
    let out = stdout(&output);
    assert!(
        out.contains("[ERROR] - An exception ocurred while processing results file"),
        "{out}"
    );
    assert!(out.contains("ELAPSED TIME: "), "{out}");
    assert!(!out.contains("TOTAL SALES"), "{out}");
}

#[test]
fn binary_writes_to_output_option() {
    let dir = TempDir::new().unwrap();
    let output = Command::new(BIN)
        .arg("--output")
        .arg("report.txt")
        .arg(testdata("abc_prices.json"))
        .arg(testdata("abc_sales.json"))
        .current_dir(dir.path())
        .env_remove("SALES_RESULTS")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    let results = fs::read_to_string(dir.path().join("report.txt")).unwrap();
    assert!(results.contains("TOTAL SALES: 20.00\n"), "{results}");
    assert!(!dir.path().join("SalesResults.txt").exists());
}

#[test]
fn binary_ignores_extra_arguments() {
    let dir = TempDir::new().unwrap();
    let output = run_in(
        dir.path(),
        &[
            testdata("abc_prices.json"),
            testdata("abc_sales.json"),
            PathBuf::from("extra"),
        ],
    );
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("TOTAL SALES: 20.00\n"), "{}", stdout(&output));
    let results = fs::read_to_string(dir.path().join("SalesResults.txt")).unwrap();
    assert!(results.contains("TOTAL SALES: 20.00\n"), "{results}");
}

#[test]
fn binary_reports_unreadable_price_list_and_exits_with_error() {
    let dir = TempDir::new().unwrap();
    let output = run_in(dir.path(), &[testdata("bogus.json"), testdata("sales.json")]);
    assert_eq!(output.status.code(), Some(9));
    let out = stdout(&output);
    assert!(
        out.contains("[ERROR] - An exception ocurred while processing price list file"),
        "{out}"
    );
    assert!(!out.contains("TOTAL SALES"), "{out}");
}

#[test]
fn binary_keeps_unknown_product_diagnostic_off_stderr_by_default() {
    let dir = TempDir::new().unwrap();
    let output = run_in(
        dir.path(),
        &[testdata("abc_prices.json"), testdata("abc_sales.json")],
    );
    let err = String::from_utf8(output.stderr).unwrap();
    assert!(!err.contains("is not in the price list"), "{err}");
}
