use assert_cmd::Command;
use assert_fs::prelude::*;
use image::{DynamicImage, GenericImageView, RgbImage};
use predicates::prelude::*;
use std::path::Path;

fn write_png(path: &Path, width: u32, height: u32) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image::Rgb([10, 20, 30])))
        .save_with_format(path, image::ImageFormat::Png)
        .unwrap();
}

/// Test CLI help output
#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("imgconv").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--from"));
}

/// Test CLI version output
#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("imgconv").unwrap();
    cmd.arg("--version").assert().success();
}

#[test]
fn test_missing_source_fails() {
    let temp = assert_fs::TempDir::new().unwrap();
    let missing = temp.path().join("nope");

    let mut cmd = Command::cargo_bin("imgconv").unwrap();
    cmd.arg(&missing)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to get directory"));
}

#[test]
fn test_same_extension_fails() {
    let temp = assert_fs::TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("imgconv").unwrap();
    cmd.arg(temp.path())
        .args(["--from", "jpg", "--to", "jpeg"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("-from and -to are same"));
}

#[test]
fn test_unsupported_extension_fails() {
    let temp = assert_fs::TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("imgconv").unwrap();
    cmd.arg(temp.path())
        .args(["--to", "bmp"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("to ext .bmp is not supported"));
}

#[test]
fn test_converts_tree() {
    let src = assert_fs::TempDir::new().unwrap();
    let out = assert_fs::TempDir::new().unwrap();
    write_png(&src.path().join("top.png"), 6, 4);
    write_png(&src.path().join("nested/dir/inner.png"), 3, 9);

    let mut cmd = Command::cargo_bin("imgconv").unwrap();
    cmd.arg(src.path())
        .arg("--dst")
        .arg(out.path())
        .args(["--from", "png", "--to", "jpg"])
        .assert()
        .success();

    out.child("top.jpeg").assert(predicate::path::is_file());
    out.child("nested/dir/inner.jpeg").assert(predicate::path::is_file());

    let decoded = image::open(out.path().join("nested/dir/inner.jpeg")).unwrap();
    assert_eq!(decoded.dimensions(), (3, 9));
}

#[test]
fn test_source_given_with_src_flag() {
    let src = assert_fs::TempDir::new().unwrap();
    let out = assert_fs::TempDir::new().unwrap();
    write_png(&src.path().join("flagged.png"), 5, 5);

    let mut cmd = Command::cargo_bin("imgconv").unwrap();
    cmd.arg("--src")
        .arg(src.path())
        .arg("--dst")
        .arg(out.path())
        .args(["--from", "png", "--to", "gif"])
        .assert()
        .success();

    out.child("flagged.gif").assert(predicate::path::is_file());
}

#[test]
fn test_positional_and_src_flag_conflict() {
    let src = assert_fs::TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("imgconv").unwrap();
    cmd.arg(src.path())
        .arg("--src")
        .arg(src.path())
        .assert()
        .failure();
}

#[test]
fn test_missing_source_argument_fails() {
    let mut cmd = Command::cargo_bin("imgconv").unwrap();
    cmd.assert().failure();
}

#[test]
fn test_json_statistics() {
    let src = assert_fs::TempDir::new().unwrap();
    let out = assert_fs::TempDir::new().unwrap();
    write_png(&src.path().join("a.png"), 2, 2);

    let mut cmd = Command::cargo_bin("imgconv").unwrap();
    let output = cmd
        .arg(src.path())
        .arg("-o")
        .arg(out.path())
        .args(["-f", "png", "-t", "gif", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stats: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(stats["files_converted"], 1);
    assert_eq!(stats["to"], "gif");
}

#[test]
fn test_empty_source_succeeds_without_output() {
    let src = assert_fs::TempDir::new().unwrap();
    let out = assert_fs::TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("imgconv").unwrap();
    cmd.arg(src.path())
        .arg("--dst")
        .arg(out.path().join("result"))
        .assert()
        .success();

    out.child("result").assert(predicate::path::missing());
}
