use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

fn write_script(dir: &TempDir, name: &str, code: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, code).unwrap();
    path
}

#[test]
fn test_cli_run_prints_transcript() {
    let temp_dir = TempDir::new().unwrap();
    let script = write_script(
        &temp_dir,
        "gain.m",
        "% Closed loop\nG = tf([1], [1 3 2]);\nH = feedback(G, 1);\ndisp(dcgain(H))\n",
    );

    let mut cmd = Command::cargo_bin("matlite").unwrap();
    cmd.arg("run").arg(&script).arg("--out").arg(temp_dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("# Translated program:"))
        .stdout(predicate::str::contains("H = controlsys.feedback(G, 1)"))
        .stdout(predicate::str::contains("# Output:"))
        .stdout(predicate::str::contains("0.3333333333333333"));
}

#[test]
fn test_cli_run_writes_figures() {
    let temp_dir = TempDir::new().unwrap();
    let out_dir = temp_dir.path().join("figures");
    let script = write_script(
        &temp_dir,
        "plots.m",
        "G = tf(1, [1 1]);\nfigure(1)\nstep(G, 'r')\ngrid on\nfigure(2)\nbode(G)\n",
    );

    let mut cmd = Command::cargo_bin("matlite").unwrap();
    cmd.arg("run").arg(&script).arg("--out").arg(&out_dir);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("plot_1.png"))
        .stdout(predicate::str::contains("plot_2.png"));

    for name in ["plot_1.png", "plot_2.png"] {
        let bytes = fs::read(out_dir.join(name)).unwrap();
        assert_eq!(&bytes[..8], &PNG_SIGNATURE);
    }
    assert!(!out_dir.join("plot_3.png").exists());
}

#[test]
fn test_cli_run_json_output() {
    let temp_dir = TempDir::new().unwrap();
    let script = write_script(&temp_dir, "json.m", "x = [1 2 3];\ndisp(x(2))\n");

    let mut cmd = Command::cargo_bin("matlite").unwrap();
    cmd.arg("run").arg(&script).arg("--json");

    let output = cmd.output().unwrap();
    assert!(output.status.success());
    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["success"], true);
    assert!(result["error"].is_null());
    assert!(result["console"].as_str().unwrap().ends_with("# Output:\n2\n"));
    assert_eq!(result["plots"].as_array().unwrap().len(), 0);
}

#[test]
fn test_cli_run_failure_exits_nonzero() {
    let temp_dir = TempDir::new().unwrap();
    let out_dir = temp_dir.path().join("figures");
    let script = write_script(
        &temp_dir,
        "broken.m",
        "disp('partial')\nG = tf(1, [1 1]);\nstep(G)\nbogus(1)\n",
    );

    let mut cmd = Command::cargo_bin("matlite").unwrap();
    cmd.arg("run").arg(&script).arg("--out").arg(&out_dir);

    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("partial"))
        .stderr(predicate::str::contains("NameError"))
        .stderr(predicate::str::contains("Traceback (most recent call last):"));
    assert!(!out_dir.exists());
}

#[test]
fn test_cli_run_empty_script() {
    let temp_dir = TempDir::new().unwrap();
    let script = write_script(&temp_dir, "empty.m", "   \n\n");

    let mut cmd = Command::cargo_bin("matlite").unwrap();
    cmd.arg("run").arg(&script);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("No code provided"));
}

#[test]
fn test_cli_run_timeout() {
    let temp_dir = TempDir::new().unwrap();
    let code = "G = tf(1, [1 2 1]);\nstep(G)\n".repeat(400);
    let script = write_script(&temp_dir, "slow.m", &code);

    let mut cmd = Command::cargo_bin("matlite").unwrap();
    cmd.arg("run")
        .arg(&script)
        .arg("--timeout-ms")
        .arg("0")
        .arg("--out")
        .arg(temp_dir.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("TimeoutError"));
}

#[test]
fn test_cli_run_missing_file() {
    let mut cmd = Command::cargo_bin("matlite").unwrap();
    cmd.arg("run").arg("does/not/exist.m");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("cannot read script"));
}

#[test]
fn test_cli_translate_shows_program() {
    let temp_dir = TempDir::new().unwrap();
    let script = write_script(
        &temp_dir,
        "translate.m",
        "figure\nstep(G, 'r')\nhold on\n",
    );

    let mut cmd = Command::cargo_bin("matlite").unwrap();
    cmd.arg("translate").arg(&script);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("plot.figure(1)"))
        .stdout(predicate::str::contains("_t, _y = controlsys.step_response(G)"))
        .stdout(predicate::str::contains("color='red'"));
}

#[test]
fn test_cli_translate_reports_invalid_lines() {
    let temp_dir = TempDir::new().unwrap();
    let script = write_script(&temp_dir, "invalid.m", "x = 1\ny = = 2\nfor k = 1:10\n");

    let mut cmd = Command::cargo_bin("matlite").unwrap();
    cmd.arg("translate").arg(&script);

    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("y = = 2"))
        .stderr(predicate::str::contains("SyntaxError"))
        .stderr(predicate::str::contains("source line 2"))
        .stderr(predicate::str::contains("source line 3"))
        .stderr(predicate::str::contains("2 line(s) could not be translated"));
}

#[test]
fn test_cli_translate_resource_limit() {
    let temp_dir = TempDir::new().unwrap();
    let script = write_script(&temp_dir, "huge.m", &"x = 1\n".repeat(5000));

    let mut cmd = Command::cargo_bin("matlite").unwrap();
    cmd.arg("translate").arg(&script);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Resource limit exceeded: max_lines"));
}
