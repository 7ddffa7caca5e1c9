use std::{fs, path::Path, process::Command};

const TRUNCATE_LOG: &str = r#"
 $TABLE: Intensity statistics by resolution:
 $GRAPHS: Mn(I) v resolution:N:2,6:
 $$
  N 1/resol^2  Dmax(A)  Dmin(A)  Nref     <I>  <I/sigma>  Compl $$
 $$
  1   0.0100    20.00    10.00    312   500.0     35.2    98.7
  2   0.0400    10.00     5.00    905    50.0     21.4    99.1
  3   0.1111     5.00     3.00   1210    -1.0      0.1    99.5
  Overall                        2427   183.0     19.0    99.1
 $$
"#;

fn wilson_plot(log: &Path, image: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_wilson-plot"))
        .arg(log)
        .arg(image)
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn unreadable_log() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("wilson.png");
    let output = wilson_plot(&dir.path().join("missing.log"), &image, &[]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to extract the resolution table"));
    assert!(stderr.contains("failed to read"));
    assert!(!image.exists());
}

#[test]
fn log_without_table() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("truncate.log");
    fs::write(&log, " Normal termination\n").unwrap();
    let image = dir.path().join("wilson.png");
    let output = wilson_plot(&log, &image, &[]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no resolution table found"));
    assert!(!image.exists());
}

#[test]
fn wilson_plot_and_csv() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("truncate.log");
    fs::write(&log, TRUNCATE_LOG).unwrap();
    let image = dir.path().join("wilson.svg");
    let csv = dir.path().join("wilson.csv");
    let output = wilson_plot(&log, &image, &["--csv", csv.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert!(image.exists());
    let points = fs::read_to_string(&csv).unwrap();
    assert_eq!(points.lines().count(), 3);
}

#[test]
fn unknown_resolution() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("truncate.log");
    fs::write(&log, TRUNCATE_LOG).unwrap();
    let image = dir.path().join("wilson.png");
    let output = wilson_plot(&log, &image, &["--resolution", "median"]);
    assert!(!output.status.success());
    assert!(!image.exists());
}
