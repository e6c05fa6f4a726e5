use assert_cmd::Command;
use predicates::prelude::*;

fn cct_gen() -> Command {
    Command::cargo_bin("cct-gen").unwrap()
}

#[test]
fn version_runs() {
    let mut cmd = cct_gen();
    cmd.arg("-V");
    cmd.assert().success();
}

#[test]
fn list_shows_builtin_schemes() {
    let mut cmd = cct_gen();
    cmd.arg("list");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("cct14"))
        .stdout(predicate::str::contains("516"));
}

#[test]
fn info_reports_code_count() {
    let mut cmd = cct_gen();
    cmd.args(["info", "--scheme", "cct14"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Codes:        516"));
}

#[test]
fn codes_prints_count_and_binary() {
    let mut cmd = cct_gen();
    cmd.args(["codes", "--scheme", "cct8"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Number of codes: 13"))
        .stdout(predicate::str::contains("00010001"));
}

#[test]
fn codes_json_output() {
    let mut cmd = cct_gen();
    cmd.args(["codes", "--scheme", "cct14", "--json"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"count\": 516"))
        .stdout(predicate::str::contains("\"code\": 129"));
}

#[test]
fn unknown_scheme_fails() {
    let mut cmd = cct_gen();
    cmd.args(["info", "--scheme", "nope99"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unknown scheme"));
}

#[test]
fn render_writes_svg_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = cct_gen();
    cmd.args([
        "render",
        "--scheme",
        "cct14",
        "--ids",
        "0-2",
        "--format",
        "svg",
        "--output",
    ])
    .arg(dir.path());
    cmd.assert().success();

    let svg = std::fs::read_to_string(dir.path().join("cct14_0000.svg")).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(dir.path().join("cct14_0002.svg").exists());
}

#[test]
fn render_out_of_range_id_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = cct_gen();
    cmd.args(["render", "--scheme", "cct14", "--ids", "516", "--output"])
        .arg(dir.path());
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("exceeds max 515"));
}

#[test]
fn sheet_grid_writes_svg() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("grid.svg");
    let mut cmd = cct_gen();
    cmd.args(["sheet", "--grid", "4x2", "--diameter-mm", "20", "--format", "svg", "--output"])
        .arg(&out);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("wrote"));

    let svg = std::fs::read_to_string(&out).unwrap();
    assert!(svg.contains("viewBox=\"0 0 210 297\""));
}

#[test]
fn sheet_from_config_writes_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("sheet.toml");
    std::fs::write(
        &config,
        r#"
[[target]]
id = 0
diameter_mm = 20.0

[[target]]
id = 1
diameter_mm = 20.0
"#,
    )
    .unwrap();
    let out = dir.path().join("sheet.pdf");

    let mut cmd = cct_gen();
    cmd.args(["sheet", "--config"])
        .arg(&config)
        .args(["--format", "pdf", "--output"])
        .arg(&out);
    cmd.assert().success();
    assert!(out.exists());
}

#[test]
fn sheet_too_small_page_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("sheet.toml");
    std::fs::write(
        &config,
        r#"
[page]
width_mm = 50.0
height_mm = 50.0
margin_mm = 10.0

[[target]]
id = 0
diameter_mm = 20.0
"#,
    )
    .unwrap();
    let out = dir.path().join("sheet.pdf");

    let mut cmd = cct_gen();
    cmd.args(["sheet", "--config"])
        .arg(&config)
        .args(["--output"])
        .arg(&out);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("exceeds the usable page interior"));
    assert!(!out.exists());
}

#[test]
fn sheet_requires_config_or_grid() {
    let mut cmd = cct_gen();
    cmd.arg("sheet");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--config"));
}

#[test]
fn sheet_grid_png_preview() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("grid.png");
    let mut cmd = cct_gen();
    cmd.args(["sheet", "--grid", "2x2", "--format", "png", "--scale", "2", "--output"])
        .arg(&out);
    cmd.assert().success();
    assert!(out.exists());
}

#[test]
fn verify_passes_for_builtins() {
    for scheme in ["cct8", "cct10", "cct12", "cct14"] {
        let mut cmd = cct_gen();
        cmd.args(["verify", "--scheme", scheme]);
        cmd.assert()
            .success()
            .stdout(predicate::str::contains("PASS"));
    }
}
