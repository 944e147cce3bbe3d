// Released under MIT License.
// Copyright (c) 2024 Ladislav Bartos

//! Tests of the binary application.

mod common;

use assert_cmd::Command;
use tempfile::TempDir;

use common::{count_files, read_last_line, read_map, tile_value};

/// Test utility. Write a configuration file into the directory and return path to it.
fn write_config(dir: &TempDir, content: &str) -> String {
    let path = format!("{}/config.yaml", dir.path().to_str().unwrap());
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_bin_membrane_thickness() {
    let directory = TempDir::new().unwrap();
    let output = format!("{}/thickness.dat", directory.path().to_str().unwrap());

    let config = write_config(
        &directory,
        &format!(
            "structure: tests/files/membrane.gro
output: {}
analysis_type: !MembraneThickness
  lipids: resname POPC
min_samples: 1
",
            output
        ),
    );

    Command::cargo_bin("memgrid")
        .unwrap()
        .args([config.as_str(), "--silent"])
        .assert()
        .success()
        .stdout("");

    let map = read_map(&output);
    assert_eq!(map.len(), 41 * 41);
    assert!((tile_value(&map, 1.0, 1.0).unwrap() - 4.0).abs() < 1e-4);
    assert_eq!(
        read_last_line(&output),
        "# Average membrane thickness: 4.0000 nm"
    );
}

#[test]
fn test_bin_leaflet_thickness_trajectory() {
    let directory = TempDir::new().unwrap();
    let path_to_dir = directory.path().to_str().unwrap();

    let config = write_config(
        &directory,
        &format!(
            "structure: tests/files/small.gro
trajectory: tests/files/small.xtc
output: {}/leaflets
analysis_type: !leafthick
  lipids: name PO4
nan_limit: 4
silent: true
",
            path_to_dir
        ),
    );

    Command::cargo_bin("memgrid")
        .unwrap()
        .arg(&config)
        .assert()
        .success()
        .stdout("");

    // config file and two maps
    assert_eq!(count_files(path_to_dir), 3);
    assert_eq!(
        read_last_line(&format!("{}/leaflets_upper.dat", path_to_dir)),
        "# Average upper leaflet thickness: 2.1750 nm"
    );
    assert_eq!(
        read_last_line(&format!("{}/leaflets_lower.dat", path_to_dir)),
        "# Average lower leaflet thickness: 2.1750 nm"
    );
}

#[test]
fn test_bin_water_defect() {
    let directory = TempDir::new().unwrap();
    let output = format!("{}/defect.yaml", directory.path().to_str().unwrap());

    let config = write_config(
        &directory,
        &format!(
            "structure: tests/files/membrane.gro
output: {}
type: !wdcalc
  lipids: resname POPC
  protein: resname LYS
",
            output
        ),
    );

    Command::cargo_bin("memgrid")
        .unwrap()
        .args([config.as_str(), "--silent"])
        .assert()
        .success()
        .stdout("");

    let content = std::fs::read_to_string(&output).unwrap();
    assert!(content.starts_with("# Water defect calculated with 'memgrid v"));
    assert!(content.ends_with("n_frames: 1\nupper: 2.0\nlower: 2.0\ntotal: 4.0\n"));
}

#[test]
fn test_bin_backup_and_overwrite() {
    let directory = TempDir::new().unwrap();
    let path_to_dir = directory.path().to_str().unwrap();
    let output = format!("{}/wd_map.dat", path_to_dir);

    let config = write_config(
        &directory,
        &format!(
            "structure: tests/files/membrane.gro
output: {}
analysis_type: !WaterDefectMap
  lipids: resname POPC
silent: true
",
            output
        ),
    );

    for _ in 0..2 {
        Command::cargo_bin("memgrid")
            .unwrap()
            .arg(&config)
            .assert()
            .success();
    }

    // config file, output file, and its backup
    assert_eq!(count_files(path_to_dir), 3);

    Command::cargo_bin("memgrid")
        .unwrap()
        .args([config.as_str(), "--overwrite"])
        .assert()
        .success();

    assert_eq!(count_files(path_to_dir), 3);
    assert_eq!(
        read_last_line(&output),
        "# Average water defect per square Å: 0.002380 arb. u."
    );
}

#[test]
fn test_bin_not_silent() {
    let directory = TempDir::new().unwrap();
    let output = format!("{}/thickness.dat", directory.path().to_str().unwrap());

    let config = write_config(
        &directory,
        &format!(
            "structure: tests/files/membrane.gro
output: {}
analysis_type: !MembraneThickness
  lipids: resname POPC
",
            output
        ),
    );

    let assert = Command::cargo_bin("memgrid")
        .unwrap()
        .arg(&config)
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(stdout.contains("MEMGRID v"));
    assert!(stdout.contains("ANALYSIS COMPLETED"));
}

#[test]
fn test_bin_fail_invalid_config() {
    Command::cargo_bin("memgrid")
        .unwrap()
        .args(["tests/files/inputs/zero_step.yaml", "--silent"])
        .assert()
        .failure()
        .stdout("");
}

#[test]
fn test_bin_fail_incomplete_config() {
    Command::cargo_bin("memgrid")
        .unwrap()
        .arg("tests/files/inputs/incomplete.yaml")
        .assert()
        .failure();
}

#[test]
fn test_bin_fail_nonexistent_config() {
    Command::cargo_bin("memgrid")
        .unwrap()
        .arg("tests/files/inputs/nonexistent.yaml")
        .assert()
        .failure();
}

#[test]
fn test_bin_fail_analysis() {
    let directory = TempDir::new().unwrap();

    let config = write_config(
        &directory,
        "structure: tests/files/triclinic.gro
analysis_type: !MembraneThickness
  lipids: name PO4
silent: true
",
    );

    Command::cargo_bin("memgrid")
        .unwrap()
        .arg(&config)
        .assert()
        .failure()
        .stdout("");
}
