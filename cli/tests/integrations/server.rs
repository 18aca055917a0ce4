use assert_cmd::Command;

#[test]
fn test_server_command_available() {
    let mut cmd = Command::cargo_bin("matlite").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicates::str::contains("server"));
}

#[test]
fn test_server_help_lists_options() {
    let mut cmd = Command::cargo_bin("matlite").unwrap();
    cmd.arg("server").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicates::str::contains("--port"))
        .stdout(predicates::str::contains("--host"))
        .stdout(predicates::str::contains("--timeout-ms"));
}

#[test]
fn test_server_rejects_invalid_port() {
    let mut cmd = Command::cargo_bin("matlite").unwrap();
    cmd.arg("server").arg("--port").arg("not-a-port");

    cmd.assert().failure();
}
