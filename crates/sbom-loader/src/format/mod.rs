//! SBOM 형식 탐지 및 디코더
//!
//! [`SbomDecoder`] trait은 형식별 디코더가 구현해야 하는 인터페이스입니다.
//! 탐지(sniff)와 디코딩을 한 구현체에 함께 두어, 새 형식을 추가할 때
//! 한 곳만 수정하면 되도록 합니다.
//!
//! [`FormatDetector`]는 등록 순서대로 각 디코더의 `sniff`를 평가하고
//! 처음 일치한 디코더를 선택합니다. 파일 확장자는 보지 않습니다.
//!
//! # 탐지 순서
//!
//! 1. CycloneDX XML -- `xmlns` + `CycloneDX`
//! 2. CycloneDX JSON -- `bomFormat` + `CycloneDX`
//! 3. SPDX JSON -- `SPDXRef-DOCUMENT`
//! 4. Syft JSON -- Syft JSON 스키마 URL 접두사
//!
//! CycloneDX XML과 JSON은 `CycloneDX` 문자열을 공유하므로 XML을 먼저 확인합니다.

pub mod cyclonedx;
pub mod spdx;
pub mod syft;

pub use cyclonedx::{CycloneDxJsonDecoder, CycloneDxXmlDecoder};
pub use spdx::SpdxJsonDecoder;
pub use syft::SyftJsonDecoder;

use crate::error::SbomLoaderError;
use crate::types::{ExtractedDocument, SbomFormat};

/// SBOM 디코더 trait
///
/// 한 형식의 내용 기반 탐지와 purl/라이선스 추출을 담당합니다.
pub trait SbomDecoder: Send + Sync {
    /// 이 디코더가 담당하는 형식을 반환합니다.
    fn format(&self) -> SbomFormat;

    /// 원본 바이트가 이 형식으로 보이는지 내용으로 판별합니다.
    fn sniff(&self, bytes: &[u8]) -> bool;

    /// 원본 바이트를 디코딩하여 purl과 라이선스를 추출합니다.
    ///
    /// # Arguments
    ///
    /// - `bytes`: 문서 원본 바이트
    /// - `source_path`: 원본 경로 (에러 메시지용)
    fn decode(&self, bytes: &[u8], source_path: &str)
    -> Result<ExtractedDocument, SbomLoaderError>;
}

/// 형식 탐지기
///
/// 등록된 디코더를 순서대로 평가하는 우선순위 체인입니다.
pub struct FormatDetector {
    decoders: Vec<Box<dyn SbomDecoder>>,
}

impl FormatDetector {
    /// 기본 탐지 순서로 탐지기를 생성합니다.
    pub fn new() -> Self {
        Self {
            decoders: vec![
                Box::new(CycloneDxXmlDecoder),
                Box::new(CycloneDxJsonDecoder),
                Box::new(SpdxJsonDecoder),
                Box::new(SyftJsonDecoder),
            ],
        }
    }

    /// 지정한 디코더 목록으로 탐지기를 생성합니다. 목록 순서가 우선순위입니다.
    pub fn with_decoders(decoders: Vec<Box<dyn SbomDecoder>>) -> Self {
        Self { decoders }
    }

    /// 등록된 형식을 우선순위 순으로 반환합니다.
    pub fn formats(&self) -> Vec<SbomFormat> {
        self.decoders.iter().map(|d| d.format()).collect()
    }

    /// 처음 일치하는 디코더를 반환합니다.
    pub fn detect(&self, bytes: &[u8]) -> Option<&dyn SbomDecoder> {
        self.decoders
            .iter()
            .find(|d| d.sniff(bytes))
            .map(|d| d.as_ref())
    }

    /// 형식만 판별합니다. 일치하는 형식이 없으면 `None`입니다.
    pub fn classify(&self, bytes: &[u8]) -> Option<SbomFormat> {
        self.detect(bytes).map(|d| d.format())
    }

    /// 형식을 판별하고 해당 디코더로 디코딩합니다.
    ///
    /// # Errors
    ///
    /// - 알려진 형식이 아니면 `SbomLoaderError::UnrecognizedFormat`
    /// - 디코딩 실패 시 `SbomLoaderError::Decode`
    pub fn decode(
        &self,
        bytes: &[u8],
        source_path: &str,
    ) -> Result<(SbomFormat, ExtractedDocument), SbomLoaderError> {
        let decoder = self
            .detect(bytes)
            .ok_or_else(|| SbomLoaderError::UnrecognizedFormat {
                path: source_path.to_owned(),
            })?;

        let format = decoder.format();
        tracing::debug!(path = source_path, format = %format, "detected sbom format");

        let document = decoder.decode(bytes, source_path)?;
        Ok((format, document))
    }
}

impl Default for FormatDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// 기본 탐지 순서로 형식을 판별합니다.
pub fn classify(bytes: &[u8]) -> Option<SbomFormat> {
    FormatDetector::new().classify(bytes)
}

/// 바이트 부분 문자열 검색
pub(crate) fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    if needle.is_empty() {
        return true;
    }
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// 선행 UTF-8 BOM 제거
pub(crate) fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes)
}

/// 디코딩 에러 생성 헬퍼
pub(crate) fn decode_error(
    source_path: &str,
    format: SbomFormat,
    reason: impl ToString,
) -> SbomLoaderError {
    SbomLoaderError::Decode {
        path: source_path.to_owned(),
        format,
        reason: reason.to_string(),
    }
}
