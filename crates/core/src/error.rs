//! 에러 타입 -- 도메인별 에러 정의

/// Ironbom 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum IronbomError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// SBOM 로딩 에러
    #[error("sbom error: {0}")]
    Sbom(#[from] SbomError),

    /// 무시 목록 / 억제 규칙 에러
    #[error("suppression error: {0}")]
    Suppression(#[from] SuppressionError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// SBOM 입력 처리 에러
#[derive(Debug, thiserror::Error)]
pub enum SbomError {
    /// 입력을 읽을 수 없음 (파일, 디렉토리, 표준 입력)
    #[error("read failed: {0}")]
    ReadFailed(String),

    /// 알려진 SBOM 형식이 아님
    #[error("unrecognized format: {0}")]
    UnrecognizedFormat(String),

    /// 형식은 인식했으나 디코딩 실패
    #[error("decode failed: {0}")]
    DecodeFailed(String),
}

/// 무시 목록 / 억제 규칙 문서 에러
#[derive(Debug, thiserror::Error)]
pub enum SuppressionError {
    /// 무시 목록 파일이 존재하지 않음
    #[error("ignore file not found: {0}")]
    IgnoreFileNotFound(String),

    /// 억제 규칙 문서를 읽을 수 없음
    #[error("read failed: {0}")]
    ReadFailed(String),

    /// 억제 규칙 문서 파싱 실패
    #[error("parse failed: {0}")]
    ParseFailed(String),
}
