#![cfg(feature = "cli")]
#![allow(clippy::unwrap_used)]

use std::{
    path::Path,
    process::{Command, Output},
};

use image::{Rgb, RgbImage};
use tempfile::tempdir;

fn swatchbook(args: &[&str], input: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_swatchbook"))
        .args(args)
        .arg(input)
        .output()
        .unwrap()
}

fn is_hex_color(s: &str) -> bool {
    s.len() == 7
        && s.starts_with('#')
        && s.chars()
            .skip(1)
            .all(|c| matches!(c, '0'..='9' | 'a'..='f'))
}

#[test]
fn solid_red_image() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("red.png");
    RgbImage::from_pixel(100, 100, Rgb([255, 0, 0]))
        .save(&path)
        .unwrap();

    let output = swatchbook(&["-k", "3", "--seed", "1"], &path);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines = stdout.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0].split_whitespace().collect::<Vec<_>>(), ["#ff0000", "100.00%"]);
    for line in &lines[1..] {
        let fields = line.split_whitespace().collect::<Vec<_>>();
        assert!(is_hex_color(fields[0]));
        assert_eq!(fields[1], "0.00%");
    }
}

#[test]
fn json_output() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("quarters.png");
    RgbImage::from_fn(40, 40, |x, y| match (x < 20, y < 20) {
        (true, true) => Rgb([0, 0, 0]),
        (true, false) | (false, true) => Rgb([0, 128, 255]),
        (false, false) => Rgb([255, 255, 255]),
    })
    .save(&path)
    .unwrap();

    for backend in ["standard", "accelerated"] {
        let output = swatchbook(&["-k", "3", "--json", "--backend", backend], &path);
        assert!(output.status.success());

        let records: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        let records = records.as_array().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0]["hexColor"], "#0080ff");
        assert_eq!(records[0]["percentage"], 50.0);

        let total = records
            .iter()
            .map(|r| r["percentage"].as_f64().unwrap())
            .sum::<f64>();
        assert!((total - 100.0).abs() < 0.05);
    }
}

#[test]
fn default_cluster_count() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("noise.png");
    RgbImage::from_fn(64, 48, |x, y| {
        let v = (x * 7 + y * 13) % 256;
        Rgb([v as u8, (v * 3 % 256) as u8, (255 - v) as u8])
    })
    .save(&path)
    .unwrap();

    let output = swatchbook(&[], &path);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let percentages = stdout
        .lines()
        .map(|line| {
            let fields = line.split_whitespace().collect::<Vec<_>>();
            assert!(is_hex_color(fields[0]));
            fields[1].trim_end_matches('%').parse::<f64>().unwrap()
        })
        .collect::<Vec<_>>();

    assert_eq!(percentages.len(), 10);
    assert!(percentages.windows(2).all(|w| w[0] >= w[1]));
    assert!((percentages.iter().sum::<f64>() - 100.0).abs() < 0.05);
}

#[test]
fn missing_file_fails() {
    let dir = tempdir().unwrap();
    let output = swatchbook(&[], &dir.path().join("does-not-exist.png"));

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.starts_with("error:"), "{stderr}");
    assert!(stderr.contains("does-not-exist.png"));
}

#[test]
fn undecodable_file_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.jpg");
    std::fs::write(&path, b"definitely not a jpeg").unwrap();

    let output = swatchbook(&[], &path);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8(output.stderr).unwrap().starts_with("error:"));
}

#[test]
fn zero_clusters_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tiny.png");
    RgbImage::from_pixel(2, 2, Rgb([1, 2, 3])).save(&path).unwrap();

    let output = swatchbook(&["-k", "0"], &path);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}
