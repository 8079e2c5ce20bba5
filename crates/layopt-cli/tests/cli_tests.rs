use std::path::PathBuf;
use std::process::Command;

/// The workspace root, where the bundled conf/, data/ and cache/ live.
fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("..").join("..")
}

#[test]
fn rank_prints_the_baseline_table() {
    let output = Command::new(env!("CARGO_BIN_EXE_layopt"))
        .arg("rank")
        .arg("--root")
        .arg(repo_root())
        .output()
        .expect("binary should run");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("QWERTY"), "missing QWERTY row: {stdout}");
    assert!(stdout.contains("Dvorak"), "missing Dvorak row: {stdout}");
    assert!(stdout.contains("Loss"), "missing header: {stdout}");
}

#[test]
fn rank_accepts_extra_layouts_and_rejects_bad_ones() {
    let output = Command::new(env!("CARGO_BIN_EXE_layopt"))
        .arg("rank")
        .arg("--root")
        .arg(repo_root())
        .arg("--layout")
        .arg("QWERTYUIOPASDFGHJKL;ZXCVBNM,./")
        .output()
        .expect("binary should run");
    assert!(output.status.success());

    let output = Command::new(env!("CARGO_BIN_EXE_layopt"))
        .arg("rank")
        .arg("--root")
        .arg(repo_root())
        .arg("--layout")
        .arg("TOOSHORT")
        .output()
        .expect("binary should run");
    assert!(!output.status.success(), "illegal sequence should fail the run");
}
