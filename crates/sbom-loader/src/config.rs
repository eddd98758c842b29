//! SBOM 로더 설정
//!
//! [`SbomLoaderConfig`]는 core의 [`LoaderConfig`](ironbom_core::config::LoaderConfig)에서
//! 파생되며, 빈 문자열 경로를 `None`으로 정규화합니다.
//!
//! # 사용 예시
//!
//! ```
//! use ironbom_sbom_loader::SbomLoaderConfig;
//!
//! // 기본값으로 생성
//! let config = SbomLoaderConfig::default();
//! config.validate().unwrap();
//!
//! // 빌더로 생성
//! use ironbom_sbom_loader::SbomLoaderConfigBuilder;
//!
//! let config = SbomLoaderConfigBuilder::new()
//!     .max_file_size(5 * 1024 * 1024)
//!     .suppression_file(".snyk")
//!     .build()
//!     .unwrap();
//! ```

use serde::{Deserialize, Serialize};

use ironbom_core::config::MAX_FILE_SIZE_LIMIT;

use crate::error::SbomLoaderError;

/// 경로 문자열 최대 길이
const MAX_PATH_LEN: usize = 4096;

/// SBOM 로더 설정
///
/// # 필드
///
/// - **max_file_size**: 입력 파일 하나의 최대 크기 (바이트)
/// - **ignore_file**: 줄 단위 취약점 ID 무시 목록 경로
/// - **suppression_file**: YAML 억제 규칙 문서 경로
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SbomLoaderConfig {
    /// 입력 파일 최대 허용 크기 (바이트)
    pub max_file_size: usize,
    /// 무시 목록 경로 (`None`이면 사용 안 함)
    pub ignore_file: Option<String>,
    /// 억제 규칙 문서 경로 (`None`이면 사용 안 함)
    pub suppression_file: Option<String>,
}

impl Default for SbomLoaderConfig {
    fn default() -> Self {
        Self {
            max_file_size: 50 * 1024 * 1024, // 50 MB
            ignore_file: None,
            suppression_file: None,
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_owned())
    }
}

impl SbomLoaderConfig {
    /// core의 `LoaderConfig`에서 로더 설정을 생성합니다.
    pub fn from_core(core: &ironbom_core::config::LoaderConfig) -> Self {
        Self {
            max_file_size: core.max_file_size,
            ignore_file: non_empty(&core.ignore_file),
            suppression_file: non_empty(&core.suppression_file),
        }
    }

    /// 설정 값의 유효성을 검증합니다.
    ///
    /// # 검증 규칙
    ///
    /// - `max_file_size`: 1-1073741824 (1GB)
    /// - `ignore_file`, `suppression_file`: 지정 시 비어있지 않고 4096자 이하
    pub fn validate(&self) -> Result<(), SbomLoaderError> {
        if self.max_file_size == 0 || self.max_file_size > MAX_FILE_SIZE_LIMIT {
            return Err(SbomLoaderError::Config {
                field: "max_file_size".to_owned(),
                reason: format!("must be 1-{MAX_FILE_SIZE_LIMIT}"),
            });
        }

        for (field, value) in [
            ("ignore_file", &self.ignore_file),
            ("suppression_file", &self.suppression_file),
        ] {
            let Some(path) = value else { continue };
            if path.trim().is_empty() {
                return Err(SbomLoaderError::Config {
                    field: field.to_owned(),
                    reason: "path must not be empty".to_owned(),
                });
            }
            if path.len() > MAX_PATH_LEN {
                return Err(SbomLoaderError::Config {
                    field: field.to_owned(),
                    reason: format!("path exceeds maximum length {MAX_PATH_LEN}"),
                });
            }
        }

        Ok(())
    }
}

/// [`SbomLoaderConfig`] 빌더
///
/// 빌드 시 유효성 검증을 수행합니다.
#[derive(Default)]
pub struct SbomLoaderConfigBuilder {
    config: SbomLoaderConfig,
}

impl SbomLoaderConfigBuilder {
    /// 기본값을 가진 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 최대 파일 크기(바이트)를 설정합니다.
    pub fn max_file_size(mut self, size: usize) -> Self {
        self.config.max_file_size = size;
        self
    }

    /// 무시 목록 경로를 설정합니다.
    pub fn ignore_file(mut self, path: impl Into<String>) -> Self {
        self.config.ignore_file = Some(path.into());
        self
    }

    /// 억제 규칙 문서 경로를 설정합니다.
    pub fn suppression_file(mut self, path: impl Into<String>) -> Self {
        self.config.suppression_file = Some(path.into());
        self
    }

    /// 설정을 검증하고 빌드합니다.
    ///
    /// # Errors
    ///
    /// 유효성 검증 실패 시 `SbomLoaderError::Config` 반환
    pub fn build(self) -> Result<SbomLoaderConfig, SbomLoaderError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SbomLoaderConfig::default();
        config.validate().unwrap();
    }

    #[test]
    fn from_core_preserves_values() {
        let core = ironbom_core::config::LoaderConfig {
            max_file_size: 1024,
            ignore_file: ".ironbom-ignore".to_owned(),
            suppression_file: ".snyk".to_owned(),
        };
        let config = SbomLoaderConfig::from_core(&core);
        assert_eq!(config.max_file_size, 1024);
        assert_eq!(config.ignore_file.as_deref(), Some(".ironbom-ignore"));
        assert_eq!(config.suppression_file.as_deref(), Some(".snyk"));
    }

    #[test]
    fn from_core_maps_empty_paths_to_none() {
        let core = ironbom_core::config::LoaderConfig {
            ignore_file: "  ".to_owned(),
            ..Default::default()
        };
        let config = SbomLoaderConfig::from_core(&core);
        assert!(config.ignore_file.is_none());
        assert!(config.suppression_file.is_none());
    }

    #[test]
    fn validate_rejects_zero_max_file_size() {
        let config = SbomLoaderConfig {
            max_file_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_too_large_max_file_size() {
        let config = SbomLoaderConfig {
            max_file_size: MAX_FILE_SIZE_LIMIT + 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_blank_ignore_path() {
        let config = SbomLoaderConfig {
            ignore_file: Some(String::new()),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ignore_file"));
    }

    #[test]
    fn validate_rejects_overlong_suppression_path() {
        let config = SbomLoaderConfig {
            suppression_file: Some("a".repeat(MAX_PATH_LEN + 1)),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn builder_all_setters() {
        let config = SbomLoaderConfigBuilder::new()
            .max_file_size(20 * 1024 * 1024)
            .ignore_file("ignored.txt")
            .suppression_file(".snyk")
            .build()
            .unwrap();

        assert_eq!(config.max_file_size, 20 * 1024 * 1024);
        assert_eq!(config.ignore_file.as_deref(), Some("ignored.txt"));
        assert_eq!(config.suppression_file.as_deref(), Some(".snyk"));
    }

    #[test]
    fn builder_rejects_invalid_config() {
        let result = SbomLoaderConfigBuilder::new().max_file_size(0).build();
        assert!(result.is_err());
    }

    #[test]
    fn config_serialize_roundtrip() {
        let config = SbomLoaderConfigBuilder::new()
            .suppression_file(".snyk")
            .build()
            .unwrap();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: SbomLoaderConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
