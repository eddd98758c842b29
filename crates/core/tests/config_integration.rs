//! ironbom.toml 통합 설정 테스트
//!
//! - ironbom.toml.example 파싱 테스트
//! - 파일 로딩 + 환경변수 우선순위 테스트
//! - 빈 파일 / 잘못된 형식 에러 테스트

use ironbom_core::config::IronbomConfig;
use ironbom_core::error::{ConfigError, IronbomError};
use serial_test::serial;

// =============================================================================
// ironbom.toml.example 파싱 테스트
// =============================================================================

#[test]
fn example_config_parses_successfully() {
    let content = include_str!("../../../ironbom.toml.example");
    let config = IronbomConfig::parse(content).expect("example config should parse");

    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.general.log_format, "pretty");
    assert_eq!(config.loader.max_file_size, 52_428_800);
}

#[test]
fn example_config_passes_validation() {
    let content = include_str!("../../../ironbom.toml.example");
    let config = IronbomConfig::parse(content).expect("should parse");
    config
        .validate()
        .expect("example config should pass validation");
}

#[test]
fn example_config_leaves_ignore_features_disabled() {
    let content = include_str!("../../../ironbom.toml.example");
    let config = IronbomConfig::parse(content).expect("should parse");
    assert!(config.loader.ignore_file.is_empty());
    assert!(config.loader.suppression_file.is_empty());
}

// =============================================================================
// 파일 로딩
// =============================================================================

#[tokio::test]
#[serial]
async fn load_reads_file_and_validates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ironbom.toml");
    std::fs::write(
        &path,
        "[general]\nlog_level = \"debug\"\n\n[loader]\nsuppression_file = \".snyk\"\n",
    )
    .unwrap();

    let config = IronbomConfig::load(&path).await.unwrap();
    assert_eq!(config.general.log_level, "debug");
    assert_eq!(config.loader.suppression_file, ".snyk");
}

#[tokio::test]
#[serial]
async fn env_var_takes_precedence_over_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ironbom.toml");
    std::fs::write(&path, "[loader]\nignore_file = \"from-file.txt\"\n").unwrap();

    // SAFETY: #[serial]로 환경변수를 만지는 테스트를 직렬화합니다.
    unsafe { std::env::set_var("IRONBOM_LOADER_IGNORE_FILE", "from-env.txt") };
    let result = IronbomConfig::load(&path).await;
    unsafe { std::env::remove_var("IRONBOM_LOADER_IGNORE_FILE") };

    assert_eq!(result.unwrap().loader.ignore_file, "from-env.txt");
}

#[tokio::test]
async fn empty_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ironbom.toml");
    std::fs::write(&path, "").unwrap();

    let config = IronbomConfig::from_file(&path).await.unwrap();
    assert_eq!(config.general.log_level, "info");
}

#[tokio::test]
async fn malformed_file_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ironbom.toml");
    std::fs::write(&path, "[loader\nmax_file_size = ").unwrap();

    let result = IronbomConfig::from_file(&path).await;
    assert!(matches!(
        result,
        Err(IronbomError::Config(ConfigError::ParseFailed { .. }))
    ));
}

#[tokio::test]
async fn invalid_value_in_file_fails_validation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ironbom.toml");
    std::fs::write(&path, "[general]\nlog_format = \"yaml\"\n").unwrap();

    let result = IronbomConfig::from_file(&path).await;
    assert!(matches!(
        result,
        Err(IronbomError::Config(ConfigError::InvalidValue { .. }))
    ));
}

#[tokio::test]
#[serial]
async fn load_or_default_rejects_malformed_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ironbom.toml");
    std::fs::write(&path, "not = [valid").unwrap();

    assert!(IronbomConfig::load_or_default(&path).await.is_err());
}
