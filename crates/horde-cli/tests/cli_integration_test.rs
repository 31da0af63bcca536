//! Integration tests driving parsed command lines through the runner.

use clap::Parser;
use horde_cli::cli::Cli;
use horde_cli::runner::{Settings, execute_command, exit_code_for};
use horde_core::HordeConfig;
use horde_core::cli::ExitCode;
use horde_vfs::{SqlVfs, Vfs, VfsPath};
use std::fs;
use tempfile::TempDir;

/// Parses `args` and runs them with a configuration file inside `dir`.
async fn horde(dir: &TempDir, args: &[&str]) -> anyhow::Result<ExitCode> {
    let config = dir.path().join("config.toml");
    let config = config.to_str().unwrap();
    let mut argv = vec!["horde", "--config", config, "--format", "json"];
    argv.extend_from_slice(args);

    let cli = Cli::parse_from(argv);
    let settings = Settings::resolve(cli.format.as_deref(), cli.units.as_deref(), cli.config)?;
    execute_command(cli.command, &settings).await
}

#[tokio::test]
async fn test_metar_from_words() {
    let dir = TempDir::new().unwrap();
    let code = horde(
        &dir,
        &["metar", "KJFK", "011151Z", "31012KT", "10SM", "FEW250", "M02/M12", "A3021"],
    )
    .await
    .unwrap();
    assert_eq!(code, ExitCode::SUCCESS);
}

#[tokio::test]
async fn test_taf_full_output() {
    let dir = TempDir::new().unwrap();
    let code = horde(
        &dir,
        &["taf", "--full", "TAF", "EGLL", "011100Z", "0112/0218", "24010KT", "9999", "SCT030"],
    )
    .await
    .unwrap();
    assert!(code.is_success());
}

#[tokio::test]
async fn test_blank_metar_is_invalid_input() {
    let dir = TempDir::new().unwrap();
    let err = horde(&dir, &["metar", " "]).await.unwrap_err();
    assert_eq!(exit_code_for(&err), ExitCode::INVALID_INPUT);
}

#[tokio::test]
async fn test_config_set_then_get() {
    let dir = TempDir::new().unwrap();

    let code = horde(&dir, &["config", "set", "weather.units", "standard"])
        .await
        .unwrap();
    assert_eq!(code, ExitCode::SUCCESS);

    let saved = HordeConfig::load_from(&dir.path().join("config.toml")).unwrap();
    assert_eq!(saved.weather.units, "standard");

    assert!(horde(&dir, &["config", "get", "weather.units"]).await.is_ok());
    assert!(horde(&dir, &["config", "get", "weather.nope"]).await.is_err());
}

#[tokio::test]
async fn test_config_set_invalid_value_keeps_file() {
    let dir = TempDir::new().unwrap();
    let code = horde(&dir, &["config", "set", "general.default_format", "xml"])
        .await
        .unwrap();
    assert_eq!(code, ExitCode::INVALID_INPUT);
    assert!(!dir.path().join("config.toml").exists());
}

#[tokio::test]
async fn test_vfs_sql_round_trip_through_cli() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("vfs.sqlite");
    let db = db.to_str().unwrap();
    let source = dir.path().join("todo.txt");
    fs::write(&source, "buy milk").unwrap();
    let source = source.to_str().unwrap();

    let vfs = |action: &'static [&'static str]| {
        let mut args = vec!["vfs", "--backend", "sql", "--root", db];
        args.extend_from_slice(action);
        args
    };

    let mut put = vfs(&["put", "/notes/todo.txt", "--parents"]);
    put.push(source);
    assert!(horde(&dir, &put).await.unwrap().is_success());
    assert!(horde(&dir, &vfs(&["ls", "/", "--recursive"])).await.is_ok());
    assert!(horde(&dir, &vfs(&["cp", "/notes", "/backup"])).await.is_ok());
    assert!(horde(&dir, &vfs(&["rm", "/notes", "-r", "-y"])).await.is_ok());

    let err = horde(&dir, &vfs(&["cat", "/notes/todo.txt"])).await.unwrap_err();
    assert_eq!(exit_code_for(&err), ExitCode::SOURCE_ERROR);

    let stored = SqlVfs::open(db).unwrap();
    let copy = VfsPath::new("/backup/todo.txt").unwrap();
    assert_eq!(stored.read(&copy).unwrap(), b"buy milk");
}

#[tokio::test]
async fn test_vfs_quota_from_flag() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("files");
    let root = root.to_str().unwrap();
    let big = dir.path().join("big.bin");
    fs::write(&big, vec![0u8; 64]).unwrap();
    let big = big.to_str().unwrap();

    let err = horde(
        &dir,
        &["vfs", "--backend", "file", "--root", root, "--quota", "32", "put", "/big.bin", big],
    )
    .await
    .unwrap_err();
    assert_eq!(exit_code_for(&err), ExitCode::SOURCE_ERROR);
    assert!(!dir.path().join("files/big.bin").exists());
}

#[tokio::test]
async fn test_vfs_file_backend_without_root_fails() {
    let dir = TempDir::new().unwrap();
    let result = horde(&dir, &["vfs", "--backend", "file", "ls"]).await;
    assert!(result.is_err());
}
