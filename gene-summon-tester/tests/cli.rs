use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "gene-summon-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_list_checks_writes_output() {
    let exe = env!("CARGO_BIN_EXE_gene-summon-tester");
    let output_path = temp_path("list");
    let status = Command::new(exe)
        .args(["--list-checks", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("Available checks"));
    assert!(content.contains("race"));
}

#[test]
fn cli_json_report_passes_for_builtin_catalog() {
    let exe = env!("CARGO_BIN_EXE_gene-summon-tester");
    let output_path = temp_path("json");
    let output = Command::new(exe)
        .env_remove("GENE_SUMMON_CATALOG")
        .args([
            "--checks", "race,tiers", "--seeds", "1,2", "--draws", "10000", "--report", "json",
            "--output",
        ])
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Gene Summon Distribution Tester"));

    let content = std::fs::read_to_string(output_path).expect("read output");
    let results: serde_json::Value = serde_json::from_str(&content).expect("json report");
    let results = results.as_array().expect("array");
    assert_eq!(results.len(), 4);
    assert!(results.iter().all(|r| r["passed"] == true));
}

#[test]
fn cli_exits_non_zero_when_tolerance_is_violated() {
    let exe = env!("CARGO_BIN_EXE_gene-summon-tester");
    let output_path = temp_path("fail");
    let output = Command::new(exe)
        .env_remove("GENE_SUMMON_CATALOG")
        .args([
            "--checks",
            "race",
            "--draws",
            "5",
            "--tolerance",
            "0.00001",
            "--report",
            "markdown",
            "--output",
        ])
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert_eq!(output.status.code(), Some(1));
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("❌ race"));
}

#[test]
fn cli_rejects_bad_seed_tokens() {
    let exe = env!("CARGO_BIN_EXE_gene-summon-tester");
    let output = Command::new(exe)
        .args(["--seeds", "banana", "--checks", "race", "--draws", "1"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unrecognized seed token"));
}
