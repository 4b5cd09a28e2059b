use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

fn run_help(home: &TempDir, args: &[&str]) {
    let mut cmd = cargo_bin_cmd!("rancher-tools");
    cmd.env("HOME", home.path())
        .args(args)
        .arg("--help")
        .assert()
        .success();
}

#[test]
fn every_cli_command_has_help_path() {
    let home = TempDir::new().expect("temp home");

    // top-level
    run_help(&home, &[]);
    run_help(&home, &["config"]);
    run_help(&home, &["shell"]);

    run_help(&home, &["stack"]);
    run_help(&home, &["stack", "find"]);

    run_help(&home, &["service"]);
    run_help(&home, &["service", "get"]);
    run_help(&home, &["service", "find"]);
    run_help(&home, &["service", "rename"]);
    run_help(&home, &["service", "await-active"]);
    run_help(&home, &["service", "await-healthy"]);
    run_help(&home, &["service", "finish-upgrade"]);
    run_help(&home, &["service", "create"]);
    run_help(&home, &["service", "clone"]);
    run_help(&home, &["service", "upgrade"]);
    run_help(&home, &["service", "restart"]);

    run_help(&home, &["lb"]);
    run_help(&home, &["lb", "target"]);
    run_help(&home, &["lb", "retarget"]);
}
