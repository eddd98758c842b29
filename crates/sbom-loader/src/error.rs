//! SBOM 로더 에러 타입
//!
//! [`SbomLoaderError`]는 SBOM 로더 모듈 내에서 발생할 수 있는 모든 에러를 나타냅니다.
//! `From<SbomLoaderError> for IronbomError` 구현을 통해 `?` 연산자로
//! 상위 에러 타입으로 자연스럽게 전파됩니다.
//!
//! # 에러 카테고리
//!
//! - **입력 읽기**: `Io`, `FileTooBig`
//! - **형식 탐지**: `UnrecognizedFormat`
//! - **디코딩**: `Decode`
//! - **무시 목록**: `IgnoreFileNotFound`
//! - **억제 규칙**: `SuppressionRead`, `SuppressionParse`, `ExpirationParse`
//! - **설정**: `Config`

use ironbom_core::error::{ConfigError, IronbomError, SbomError, SuppressionError};

use crate::types::SbomFormat;

/// SBOM 로더 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum SbomLoaderError {
    /// 파일 / 디렉토리 / 표준 입력 읽기 실패
    #[error("io error: {path}: {source}")]
    Io {
        /// 관련 경로 (표준 입력은 "-")
        path: String,
        /// 원본 I/O 에러
        source: std::io::Error,
    },

    /// 파일 크기 초과
    #[error("file too large: {path}: {size} bytes (max: {max})")]
    FileTooBig {
        /// 파일 경로
        path: String,
        /// 실제 파일 크기 (바이트)
        size: usize,
        /// 최대 허용 크기 (바이트)
        max: usize,
    },

    /// 알려진 SBOM 형식이 아님
    #[error("{path} is not a recognized SBOM")]
    UnrecognizedFormat {
        /// 입력 경로
        path: String,
    },

    /// 형식은 탐지되었으나 구조 디코딩 실패
    #[error("decode error: {path} ({format}): {reason}")]
    Decode {
        /// 입력 경로
        path: String,
        /// 탐지된 형식
        format: SbomFormat,
        /// 실패 사유
        reason: String,
    },

    /// 무시 목록 파일이 존재하지 않음
    #[error("ignore file not found: {path}")]
    IgnoreFileNotFound {
        /// 요청된 경로
        path: String,
    },

    /// 억제 규칙 문서 읽기 실패
    #[error("suppression file read error: {path}: {source}")]
    SuppressionRead {
        /// 문서 경로
        path: String,
        /// 원본 I/O 에러
        source: std::io::Error,
    },

    /// 억제 규칙 문서 파싱 실패
    #[error("suppression file parse error: {path}: {reason}")]
    SuppressionParse {
        /// 문서 경로
        path: String,
        /// 파싱 실패 사유
        reason: String,
    },

    /// 개별 규칙의 만료일 파싱 실패
    ///
    /// 치명적이지 않습니다. 로그로만 남기고 해당 규칙은 비활성으로 취급합니다.
    #[error("invalid expiration for {vuln_id}: '{expires}': {reason}")]
    ExpirationParse {
        /// 취약점 ID
        vuln_id: String,
        /// 원본 만료일 문자열
        expires: String,
        /// 파싱 실패 사유
        reason: String,
    },

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },
}

impl SbomLoaderError {
    /// 메트릭 레이블용 실패 단계 이름을 반환합니다.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Io { .. } | Self::FileTooBig { .. } => "read",
            Self::UnrecognizedFormat { .. } => "format",
            Self::Decode { .. } => "decode",
            Self::IgnoreFileNotFound { .. }
            | Self::SuppressionRead { .. }
            | Self::SuppressionParse { .. }
            | Self::ExpirationParse { .. } => "suppression",
            Self::Config { .. } => "config",
        }
    }
}

impl From<SbomLoaderError> for IronbomError {
    fn from(err: SbomLoaderError) -> Self {
        match err {
            SbomLoaderError::Io { path, source } => {
                IronbomError::Sbom(SbomError::ReadFailed(format!("{path}: {source}")))
            }
            SbomLoaderError::FileTooBig { path, size, max } => IronbomError::Sbom(
                SbomError::ReadFailed(format!("{path}: {size} bytes (max: {max})")),
            ),
            SbomLoaderError::UnrecognizedFormat { path } => {
                IronbomError::Sbom(SbomError::UnrecognizedFormat(path))
            }
            SbomLoaderError::Decode {
                path,
                format,
                reason,
            } => IronbomError::Sbom(SbomError::DecodeFailed(format!(
                "{path} ({format}): {reason}"
            ))),
            SbomLoaderError::IgnoreFileNotFound { path } => {
                IronbomError::Suppression(SuppressionError::IgnoreFileNotFound(path))
            }
            SbomLoaderError::SuppressionRead { path, source } => IronbomError::Suppression(
                SuppressionError::ReadFailed(format!("{path}: {source}")),
            ),
            SbomLoaderError::SuppressionParse { path, reason } => IronbomError::Suppression(
                SuppressionError::ParseFailed(format!("{path}: {reason}")),
            ),
            SbomLoaderError::ExpirationParse {
                vuln_id,
                expires,
                reason,
            } => IronbomError::Suppression(SuppressionError::ParseFailed(format!(
                "{vuln_id}: '{expires}': {reason}"
            ))),
            SbomLoaderError::Config { field, reason } => {
                IronbomError::Config(ConfigError::InvalidValue { field, reason })
            }
        }
    }
}
