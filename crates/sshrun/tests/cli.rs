use std::net::TcpListener;
use std::process::{Command, Output};

fn sshrun(args: &[&str], env: &[(&str, &str)]) -> Output {
    let home = std::env::temp_dir().join(format!("sshrun_cli_home_{}", std::process::id()));
    std::fs::create_dir_all(&home).unwrap();

    let mut cmd = Command::new(env!("CARGO_BIN_EXE_sshrun"));
    cmd.args(args)
        .current_dir(&home)
        .env("HOME", &home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG");
    for (key, _) in std::env::vars() {
        if key.starts_with("SSHRUN_") {
            cmd.env_remove(key);
        }
    }
    for (key, value) in env {
        cmd.env(key, value);
    }
    cmd.output().unwrap()
}

fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

#[test]
fn test_no_command_prints_usage_and_exits_1() {
    let output = sshrun(&[], &[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage"));
}

#[test]
fn test_missing_configuration_fails() {
    let output = sshrun(&["uptime"], &[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no host configured"));
}

#[test]
fn test_unreachable_host_fails_without_output() {
    let port = closed_port().to_string();
    let output = sshrun(
        &["--host-key-policy", "accept-any", "echo", "hello"],
        &[
            ("SSHRUN_CONNECTION__HOST", "127.0.0.1"),
            ("SSHRUN_CONNECTION__PORT", &port),
            ("SSHRUN_CONNECTION__USER", "nobody"),
            ("SSHRUN_CONNECTION__PASSWORD", "nothing"),
        ],
    );

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("connection failed"));
}

#[test]
fn test_bad_port_in_environment_fails() {
    let output = sshrun(
        &["uptime"],
        &[
            ("SSHRUN_CONNECTION__HOST", "127.0.0.1"),
            ("SSHRUN_CONNECTION__PORT", "not-a-port"),
        ],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid configuration"));
}
