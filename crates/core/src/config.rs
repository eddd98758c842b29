//! 설정 관리 -- ironbom.toml 파싱 및 런타임 설정
//!
//! [`IronbomConfig`]는 CLI와 로더가 공유하는 최상위 설정 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`IRONBOM_LOADER_IGNORE_FILE=.ignore` 형식)
//! 3. 설정 파일 (`ironbom.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), ironbom_core::error::IronbomError> {
//! use ironbom_core::config::IronbomConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = IronbomConfig::load("ironbom.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = IronbomConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, IronbomError};

/// 로더가 허용하는 파일 크기의 절대 상한 (1 GiB)
pub const MAX_FILE_SIZE_LIMIT: usize = 1024 * 1024 * 1024;

/// Ironbom 통합 설정
///
/// `ironbom.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IronbomConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// SBOM 로더 설정
    #[serde(default)]
    pub loader: LoaderConfig,
}

impl IronbomConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    ///
    /// 설정 로딩 순서:
    /// 1. TOML 파일 파싱
    /// 2. 환경변수 오버라이드 적용
    /// 3. 유효성 검증
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, IronbomError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 설정 파일이 없으면 기본값에 환경변수 오버라이드만 적용합니다.
    ///
    /// 파일이 존재하지만 파싱에 실패하면 에러를 반환합니다.
    pub async fn load_or_default(path: impl AsRef<Path>) -> Result<Self, IronbomError> {
        let mut config = match Self::from_file(path.as_ref()).await {
            Ok(config) => config,
            Err(IronbomError::Config(ConfigError::FileNotFound { path })) => {
                tracing::debug!(path = %path, "config file not found, using defaults");
                Self::default()
            }
            Err(e) => return Err(e),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, IronbomError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                IronbomError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                IronbomError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, IronbomError> {
        toml::from_str(toml_str).map_err(|e| {
            IronbomError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `IRONBOM_{SECTION}_{FIELD}`
    /// 예: `IRONBOM_LOADER_MAX_FILE_SIZE=1048576`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "IRONBOM_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "IRONBOM_GENERAL_LOG_FORMAT");

        // Loader
        override_usize(
            &mut self.loader.max_file_size,
            "IRONBOM_LOADER_MAX_FILE_SIZE",
        );
        override_string(&mut self.loader.ignore_file, "IRONBOM_LOADER_IGNORE_FILE");
        override_string(
            &mut self.loader.suppression_file,
            "IRONBOM_LOADER_SUPPRESSION_FILE",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), IronbomError> {
        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        // log_format 검증
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if self.loader.max_file_size == 0 || self.loader.max_file_size > MAX_FILE_SIZE_LIMIT {
            return Err(ConfigError::InvalidValue {
                field: "loader.max_file_size".to_owned(),
                reason: format!("must be 1-{MAX_FILE_SIZE_LIMIT}"),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// SBOM 로더 설정
///
/// 빈 경로는 "기능을 요청하지 않음"을 의미합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// 입력 파일 최대 크기 (바이트)
    pub max_file_size: usize,
    /// 줄 단위 취약점 ID 무시 목록 경로
    pub ignore_file: String,
    /// YAML 억제 규칙 문서 경로
    pub suppression_file: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            max_file_size: 50 * 1024 * 1024, // 50 MB
            ignore_file: String::new(),
            suppression_file: String::new(),
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}
