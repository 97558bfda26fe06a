//! Integration tests for the pxsheet CLI
//!
//! These tests verify end-to-end behavior of the CLI by running the binary
//! against fixture files and checking exit codes, output and written sheets.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn pxsheet_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_pxsheet"))
}

/// Get all definition fixtures in a directory
fn get_fixture_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .map(|entries| entries.flatten().map(|e| e.path()).filter(|p| p.is_file()).collect())
        .unwrap_or_default();
    files.sort();
    files
}

/// A scratch project with a definitions directory and an output directory.
struct Project {
    root: TempDir,
}

impl Project {
    fn new() -> Self {
        let root = TempDir::new().expect("should create temp dir");
        fs::create_dir_all(root.path().join("defs")).expect("should create defs dir");
        Self { root }
    }

    fn with_fixtures(fixtures: &[&Path]) -> Self {
        let project = Self::new();
        for fixture in fixtures {
            let name = fixture.file_name().expect("fixture has a file name");
            fs::copy(fixture, project.defs().join(name)).expect("should copy fixture");
        }
        project
    }

    fn defs(&self) -> PathBuf {
        self.root.path().join("defs")
    }

    fn out(&self) -> PathBuf {
        self.root.path().join("out")
    }

    fn write_def(&self, name: &str, contents: &str) {
        fs::write(self.defs().join(name), contents).expect("should write definition");
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(pxsheet_binary())
            .args(args)
            .current_dir(self.root.path())
            .env_remove("RUST_LOG")
            .output()
            .expect("Failed to execute pxsheet")
    }

    fn generate(&self, extra: &[&str]) -> Output {
        let defs = self.defs();
        let out = self.out();
        let mut args = vec!["generate", "--src", defs.to_str().unwrap(), "--out", out.to_str().unwrap()];
        args.extend_from_slice(extra);
        self.run(&args)
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_valid_fixtures_generate() {
    let files = get_fixture_files(Path::new("tests/fixtures/valid"));
    assert!(!files.is_empty(), "No valid fixtures found");

    for fixture in &files {
        let project = Project::with_fixtures(&[fixture]);
        let output = project.generate(&[]);
        assert!(
            output.status.success(),
            "Expected success for {:?}, got exit code {:?}\nstderr: {}",
            fixture,
            output.status.code(),
            stderr(&output)
        );
        assert!(stdout(&output).contains("✓ "), "No sheet reported for {:?}", fixture);
    }
}

/// The stderr text each invalid fixture must produce.
fn expected_failure(fixture: &Path) -> &'static [&'static str] {
    match fixture.file_name().and_then(|n| n.to_str()) {
        Some("bad_frame_width.json5") => &["row 1 has 1 pixels, expected 2"],
        Some("malformed.json5") => &["malformed.json5: could not load definitions"],
        Some("no_angles.json5") => &["sprite \"ghost\" has no angles defined"],
        Some("partial_alpha.json5") => {
            &["partial_alpha.json5: could not load definitions", "partial alpha 128"]
        }
        Some("path_name.json5") => &["cannot be used as a file name"],
        Some("unknown_field.json5") => {
            &["unknown_field.json5: could not load definitions", "unknown field `grid`"]
        }
        other => panic!("no expected error registered for fixture {:?}", other),
    }
}

#[test]
fn test_invalid_fixtures_error() {
    let files = get_fixture_files(Path::new("tests/fixtures/invalid"));
    assert!(!files.is_empty(), "No invalid fixtures found");

    for fixture in &files {
        let project = Project::with_fixtures(&[fixture]);
        let output = project.generate(&[]);
        assert_eq!(
            output.status.code(),
            Some(1),
            "Expected exit 1 for {:?}\nstdout: {}\nstderr: {}",
            fixture,
            stdout(&output),
            stderr(&output)
        );

        let err = stderr(&output);
        assert!(err.contains("Error:"), "Expected error message for {:?}", fixture);
        for needle in expected_failure(fixture) {
            assert!(err.contains(needle), "Expected {:?} for {:?}\nstderr: {}", needle, fixture, err);
        }

        // Nothing is written for a sprite that fails, inside or outside the output dir
        let written: Vec<PathBuf> = get_fixture_files(&project.out())
            .into_iter()
            .chain(get_fixture_files(project.root.path()))
            .filter(|p| p.extension().is_some_and(|e| e == "png"))
            .collect();
        assert!(written.is_empty(), "Unexpected output for {:?}: {:?}", fixture, written);
    }
}

#[test]
fn test_generate_two_by_two_pixels() {
    let project = Project::with_fixtures(&[Path::new("tests/fixtures/valid/two_by_two.json5")]);
    let output = project.generate(&[]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output).trim(), "✓ player.png (4x4, 2 directions × 2 frames)");

    let img = image::open(project.out().join("player.png")).expect("valid PNG").to_rgba8();
    assert_eq!(img.dimensions(), (4, 4));

    // down row, frames 0 and 1
    assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert_eq!(img.get_pixel(1, 0).0, [0, 0, 0, 0]);
    assert_eq!(img.get_pixel(0, 1).0, [0, 0, 0, 0]);
    assert_eq!(img.get_pixel(1, 1).0, [0, 0, 255, 255]);
    assert_eq!(img.get_pixel(2, 0).0, [0, 0, 255, 255]);
    assert_eq!(img.get_pixel(3, 1).0, [255, 0, 0, 255]);

    // up row: single frame repeated into column 1
    for y in 2..4 {
        for x in 0..4 {
            assert_eq!(img.get_pixel(x, y).0, [255, 0, 0, 255], "pixel ({}, {})", x, y);
        }
    }

    let metadata: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(project.out().join("player.json")).unwrap()).unwrap();
    assert_eq!(metadata["rows"], 2);
    assert_eq!(metadata["cols"], 2);
    assert_eq!(metadata["directions"][1]["direction"], "up");
    assert_eq!(metadata["directions"][1]["frames"], 1);
}

#[test]
fn test_generate_rows_are_clockwise() {
    let project = Project::with_fixtures(&[Path::new("tests/fixtures/valid/all_directions.json5")]);
    let output = project.generate(&[]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("✓ compass.png (3x8, 8 directions × 3 frames)"));

    let metadata: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(project.out().join("compass.json")).unwrap()).unwrap();
    let order: Vec<&str> = metadata["directions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["direction"].as_str().unwrap())
        .collect();
    assert_eq!(
        order,
        vec!["down", "down_right", "right", "up_right", "up", "up_left", "left", "down_left"]
    );
    assert_eq!(metadata["frame_rate"], 12);
    assert_eq!(metadata["animations"]["compass-walk-up"]["frames"], serde_json::json!([12, 13, 14]));
}

#[test]
fn test_generate_by_name() {
    let project = Project::with_fixtures(&[
        Path::new("tests/fixtures/valid/two_by_two.json5"),
        Path::new("tests/fixtures/valid/array.json5"),
    ]);
    let output = project.generate(&["crate_large"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    assert!(project.out().join("crate_large.png").exists());
    assert!(!project.out().join("crate_small.png").exists());
    assert!(!project.out().join("player.png").exists());

    let img = image::open(project.out().join("crate_large.png")).unwrap();
    assert_eq!((img.width(), img.height()), (4, 4));
}

#[test]
fn test_generate_unknown_name_lists_available() {
    let project = Project::with_fixtures(&[
        Path::new("tests/fixtures/valid/two_by_two.json5"),
        Path::new("tests/fixtures/valid/array.json5"),
    ]);
    let output = project.generate(&["playr"]);
    assert_eq!(output.status.code(), Some(1));

    let err = stderr(&output);
    assert!(err.contains("Sprite \"playr\" not found"), "stderr: {}", err);
    // Discovery order: files sorted by path, definitions in file order
    assert!(err.contains("Available: crate_small, crate_large, player"), "stderr: {}", err);
    assert!(err.contains("Did you mean 'player'?"), "stderr: {}", err);
    assert!(!project.out().exists());
}

#[test]
fn test_generate_skips_malformed_source() {
    let project = Project::with_fixtures(&[
        Path::new("tests/fixtures/valid/two_by_two.json5"),
        Path::new("tests/fixtures/invalid/malformed.json5"),
    ]);
    let output = project.generate(&[]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(project.out().join("player.png").exists());
    assert!(stderr(&output).contains("malformed.json5"), "stderr: {}", stderr(&output));
}

#[test]
fn test_generate_continues_after_render_failure() {
    let project = Project::with_fixtures(&[
        Path::new("tests/fixtures/valid/two_by_two.json5"),
        Path::new("tests/fixtures/invalid/no_angles.json5"),
    ]);
    let output = project.generate(&[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(project.out().join("player.png").exists());
    assert!(!project.out().join("ghost.png").exists());
    assert!(stderr(&output).contains("has no angles defined"));
}

#[test]
fn test_generate_ignores_templates() {
    let project = Project::with_fixtures(&[Path::new("tests/fixtures/valid/two_by_two.json5")]);
    project.write_def(
        "_template.json5",
        r#"{ name: "template", width: 1, height: 1, palette: {}, angles: { down: [[[0]]] } }"#,
    );
    let output = project.generate(&[]);
    assert!(output.status.success());
    assert!(!project.out().join("template.png").exists());
}

#[test]
fn test_generate_no_definitions() {
    let project = Project::new();
    let output = project.generate(&[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("no sprite definitions found"));
}

#[test]
fn test_generate_no_metadata() {
    let project = Project::with_fixtures(&[Path::new("tests/fixtures/valid/two_by_two.json5")]);
    let output = project.generate(&["--no-metadata", "--compression", "0"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(project.out().join("player.png").exists());
    assert!(!project.out().join("player.json").exists());
}

#[test]
fn test_generate_is_deterministic() {
    let project = Project::with_fixtures(&[Path::new("tests/fixtures/valid/all_directions.json5")]);
    assert!(project.generate(&[]).status.success());
    let first = fs::read(project.out().join("compass.png")).unwrap();
    assert!(project.generate(&[]).status.success());
    let second = fs::read(project.out().join("compass.png")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_config_file_paths() {
    let project = Project::with_fixtures(&[Path::new("tests/fixtures/valid/two_by_two.json5")]);
    fs::write(
        project.root.path().join("pxsheet.toml"),
        "[project]\ndefinitions = \"defs\"\nout = \"sheets\"\n\n[output]\nmetadata = false\n",
    )
    .unwrap();

    let output = project.run(&["generate"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(project.root.path().join("sheets/player.png").exists());
    assert!(!project.root.path().join("sheets/player.json").exists());
}

#[test]
fn test_invalid_config_is_usage_error() {
    let project = Project::new();
    fs::write(project.root.path().join("pxsheet.toml"), "[output]\ncompression = 42\n").unwrap();

    let output = project.run(&["generate"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("output.compression"));
}

#[test]
fn test_bad_arguments_exit_code() {
    let project = Project::new();
    let output = project.run(&["generate", "--compression", "99"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_list() {
    let project = Project::with_fixtures(&[
        Path::new("tests/fixtures/valid/two_by_two.json5"),
        Path::new("tests/fixtures/invalid/no_angles.json5"),
    ]);
    let defs = project.defs();
    let output = project.run(&["list", "--src", defs.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("player (4x4, 2 frame(s)): down, up"), "stdout: {}", out);
    assert!(out.contains("ghost (invalid)"), "stdout: {}", out);
}
