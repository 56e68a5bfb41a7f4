//! Exit codes and output of the `ipcount` and `ipgen` binaries.

use std::io::Write;
use std::process::{Command, Output};
use tempfile::NamedTempFile;

fn ipcount(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ipcount"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn duplicate_ips_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"1.1.1.1\n2.2.2.2\n1.1.1.1\n3.3.3.3\n").unwrap();
    file.flush().unwrap();
    file
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_exact_engine_report() {
    let file = duplicate_ips_file();
    let path = file.path().to_str().unwrap();
    let output = ipcount(&[path, "2", "--workers", "2"]);

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Using 2 workers"));
    assert!(text.contains("Using the exact set"));
    assert!(text.contains("Total number of unique IP addresses: 3"));
    assert!(text.contains("Execution time:"));
}

#[test]
fn test_bloom_engine_report() {
    let file = duplicate_ips_file();
    let path = file.path().to_str().unwrap();
    let output = ipcount(&[path, "1", "--workers", "1", "--bloom-bits", "1048576"]);

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Using the Bloom filter"));
    assert!(text.contains("Total number of unique IP addresses: 3"));
    assert!(text.contains("Estimated false positive rate"));
}

#[test]
fn test_reference_scheme_flag() {
    let file = duplicate_ips_file();
    let path = file.path().to_str().unwrap();
    let output = ipcount(&[
        path,
        "1",
        "--workers",
        "1",
        "--bloom-bits",
        "1048576",
        "--hash-scheme",
        "fnv32-reference",
    ]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout(&output).contains("Total number of unique IP addresses: 3"));
}

#[test]
fn test_invalid_engine_selector_exits_1() {
    let file = duplicate_ips_file();
    let output = ipcount(&[file.path().to_str().unwrap(), "3"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(!stdout(&output).contains("unique IP addresses"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Incorrect algorithm '3'"));
}

#[test]
fn test_padded_engine_selector_exits_1() {
    let file = duplicate_ips_file();
    let output = ipcount(&[file.path().to_str().unwrap(), " 2 "]);

    assert_eq!(output.status.code(), Some(1));
    assert!(!stdout(&output).contains("unique IP addresses"));
}

#[test]
fn test_unallocatable_bloom_size_exits_1() {
    let file = duplicate_ips_file();
    let path = file.path().to_str().unwrap();
    let output = ipcount(&[path, "1", "--workers", "1", "--bloom-bits", "4611686018427387904"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(!stdout(&output).contains("unique IP addresses"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid filter size"));
}

#[test]
fn test_missing_input_exits_1() {
    let output = ipcount(&["/no/such/dir/result.txt", "2"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error when opening"));
}

#[test]
fn test_usage_error_exits_1() {
    let output = ipcount(&["--workers", "many"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_zero_workers_exits_1() {
    let file = duplicate_ips_file();
    let output = ipcount(&[file.path().to_str().unwrap(), "2", "--workers", "0"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_help_exits_0() {
    let output = ipcount(&["--help"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("--bloom-bits"));
}

#[test]
fn test_ipgen_output_feeds_ipcount() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ips.txt");
    let path_str = path.to_str().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_ipgen"))
        .args([path_str, "1"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(stdout(&output).contains("was successfully created with size 1 MB"));

    let size = std::fs::metadata(&path).unwrap().len();
    assert!(size >= 1024 * 1024 && size < 1024 * 1024 + 16);

    let output = ipcount(&[path_str, "2"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Total number of unique IP addresses:"));
}

#[test]
fn test_ipgen_invalid_size_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ips.txt");

    let output = Command::new(env!("CARGO_BIN_EXE_ipgen"))
        .args([path.to_str().unwrap(), "-5"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(stdout(&output).contains("default value is used: 10 MB"));
    assert!(std::fs::metadata(&path).unwrap().len() >= 10 * 1024 * 1024);
}
