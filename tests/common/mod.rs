// Released under MIT License.
// Copyright (c) 2024 Ladislav Bartos

//! Functions used in various integration tests.

use std::{
    fs::File,
    io::{BufRead, BufReader},
};

/// Test utility. Read all tile rows of a map file.
#[allow(dead_code)]
pub(super) fn read_map(file: &str) -> Vec<(f32, f32, Option<f32>)> {
    let reader = BufReader::new(File::open(file).unwrap());
    reader
        .lines()
        .map(|line| line.unwrap())
        .filter(|line| !line.starts_with(['#', '@', '$']))
        .map(|line| {
            let columns: Vec<&str> = line.split_whitespace().collect();
            assert_eq!(columns.len(), 3, "Data line must have 3 columns");

            let value = match columns[2] {
                "nan" => None,
                x => Some(x.parse::<f32>().unwrap()),
            };

            (
                columns[0].parse::<f32>().unwrap(),
                columns[1].parse::<f32>().unwrap(),
                value,
            )
        })
        .collect()
}

/// Test utility. Get value of the tile at the given coordinates.
#[allow(dead_code)]
pub(super) fn tile_value(map: &[(f32, f32, Option<f32>)], x: f32, y: f32) -> Option<f32> {
    map.iter()
        .find(|(tx, ty, _)| (tx - x).abs() < 1e-4 && (ty - y).abs() < 1e-4)
        .unwrap_or_else(|| panic!("Tile at {} {} does not exist.", x, y))
        .2
}

/// Test utility. Read the trailing line of a map file.
#[allow(dead_code)]
pub(super) fn read_last_line(file: &str) -> String {
    BufReader::new(File::open(file).unwrap())
        .lines()
        .map(|line| line.unwrap())
        .last()
        .unwrap()
}

/// Test utility. Count the files in a directory.
#[allow(dead_code)]
pub(super) fn count_files(dir: &str) -> usize {
    std::fs::read_dir(dir)
        .unwrap()
        .filter(|entry| entry.as_ref().unwrap().path().is_file())
        .count()
}
