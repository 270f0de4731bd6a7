// CLI integration tests for razor-bridge

use std::io::Write;
use std::process::Command;

fn razor_bridge() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_razor-bridge"));
    // Keep the developer's own config out of the picture
    command.env("XDG_CONFIG_HOME", env!("CARGO_TARGET_TMPDIR"));
    command
}

#[test]
fn help_lists_subcommands() {
    let output = razor_bridge()
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "Help should exit with success");
    for subcommand in ["replay", "virtual-uri", "config"] {
        assert!(
            stdout.contains(subcommand),
            "Help should list {}. Got: {}",
            subcommand,
            stdout
        );
    }
}

#[test]
fn virtual_uri_prints_both_projections() {
    let output = razor_bridge()
        .args(["virtual-uri", "file:///app/Pages/Index.razor"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("razor-csharp:///app/Pages/Index.razor__virtual.cs"));
    assert!(stdout.contains("razor-html:///app/Pages/Index.razor__virtual.html"));
}

#[test]
fn config_honors_project_file() {
    let root = tempfile::tempdir().unwrap();
    std::fs::write(
        root.path().join("razor-bridge.toml"),
        "synchronizationTimeoutMs = 500\ncsharpScheme = \"cs-projection\"\n",
    )
    .unwrap();

    let output = razor_bridge()
        .arg("--root")
        .arg(root.path())
        .arg("config")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("synchronizationTimeoutMs = 500"), "Got: {}", stdout);
    assert!(stdout.contains("csharpScheme = \"cs-projection\""), "Got: {}", stdout);
    assert!(stdout.contains("htmlScheme = \"razor-html\""), "Got: {}", stdout);
}

#[test]
fn replay_applies_updates_in_order() {
    let mut log = tempfile::NamedTempFile::new().unwrap();
    let lines = [
        r#"{"method":"razor/updateCSharpBuffer","params":{"hostDocumentVersion":1,"hostDocumentFilePath":"/app/Index.razor","changes":[{"newText":"Hello World","span":{"start":0,"length":0}}]}}"#,
        r#"{"method":"razor/updateCSharpBuffer","params":{"hostDocumentVersion":2,"hostDocumentFilePath":"/app/Index.razor","changes":[{"newText":"Goodbye","span":{"start":0,"length":5}}]}}"#,
        r#"{"method":"razor/updateHtmlBuffer","params":{"hostDocumentVersion":2,"hostDocumentFilePath":"/app/Index.razor","changes":[{"newText":"<p/>","span":{"start":0,"length":0}}]}}"#,
        r#"{"method":"razor/updateCSharpBuffer","params":{"hostDocumentVersion":1,"hostDocumentFilePath":"/app/Index.razor","changes":[{"newText":"stale","span":{"start":0,"length":0}}]}}"#,
        r#"{"method":"window/logMessage","params":{}}"#,
    ];
    for line in lines {
        writeln!(log, "{}", line).unwrap();
    }

    let output = razor_bridge()
        .arg("replay")
        .arg(log.path())
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout.contains("Goodbye World"), "Got: {}", stdout);
    assert!(!stdout.contains("stale"), "Got: {}", stdout);
    assert!(stdout.contains("<p/>"), "Got: {}", stdout);
    assert!(stdout.contains("host version Some(2)"), "Got: {}", stdout);
}

#[test]
fn replay_of_missing_file_fails() {
    let output = razor_bridge()
        .args(["replay", "/definitely/not/here.jsonl"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error:"));
}
