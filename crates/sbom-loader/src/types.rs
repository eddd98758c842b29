//! 도메인 타입 -- SBOM 로더 전용 데이터 구조
//!
//! 형식 식별자, 입력 파일 감사 기록, 디코딩 결과, 로드 결과를 정의합니다.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::SbomLoaderError;

/// 지원하는 SBOM 문서 형식
///
/// 파일 확장자가 아니라 문서 내용으로 탐지됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SbomFormat {
    /// CycloneDX XML
    CycloneDxXml,
    /// CycloneDX JSON
    CycloneDxJson,
    /// SPDX JSON
    SpdxJson,
    /// Syft JSON
    SyftJson,
}

impl SbomFormat {
    /// 로그, 에러, 메트릭 레이블에 사용하는 고정 이름을 반환합니다.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CycloneDxXml => "cyclonedx-xml",
            Self::CycloneDxJson => "cyclonedx-json",
            Self::SpdxJson => "spdx-json",
            Self::SyftJson => "syft-json",
        }
    }
}

impl fmt::Display for SbomFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 성공적으로 읽은 입력 하나에 대한 감사 기록
///
/// 바이트를 읽는 데 성공하면 디코딩 성공 여부와 관계없이 생성됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannedFile {
    /// 입력 이름 (파일 경로 또는 표준 입력 표시 `-`)
    pub name: String,
    /// 원본 바이트의 SHA-256 (소문자 hex)
    pub sha256: String,
}

impl ScannedFile {
    /// 원본 바이트로부터 감사 기록을 생성합니다.
    pub fn from_bytes(name: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            name: name.into(),
            sha256: hex::encode(Sha256::digest(bytes)),
        }
    }
}

impl fmt::Display for ScannedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (sha256:{})", self.name, self.sha256)
    }
}

/// 문서 하나에서 추출한 결과
///
/// 디코더 단계에서는 중복을 제거하지 않습니다. 병합 시 한 번에 정리합니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedDocument {
    /// purl 목록 (문서 내 등장 순서)
    pub purls: Vec<String>,
    /// 라이선스 식별자 또는 표현식 목록
    pub licenses: Vec<String>,
}

impl ExtractedDocument {
    /// 비어있지 않은 purl을 추가합니다.
    pub(crate) fn push_purl(&mut self, purl: Option<&str>) {
        if let Some(p) = purl.map(str::trim).filter(|p| !p.is_empty()) {
            self.purls.push(p.to_owned());
        }
    }

    /// 비어있지 않은 라이선스를 추가합니다.
    pub(crate) fn push_license(&mut self, license: Option<&str>) {
        if let Some(l) = license.map(str::trim).filter(|l| !l.is_empty()) {
            self.licenses.push(l.to_owned());
        }
    }
}

/// 배치 처리 중 건너뛴 입력
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadFailure {
    /// 실패한 입력 경로
    pub path: String,
    /// 실패 사유 (에러 메시지)
    pub reason: String,
}

/// 경로 해석기의 최종 결과
///
/// purl과 라이선스는 값 기준으로 중복이 제거된 정렬 집합입니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadOutput {
    /// 읽기에 성공한 입력 목록 (처리 순서)
    pub files: Vec<ScannedFile>,
    /// 중복 제거된 purl 집합
    pub purls: BTreeSet<String>,
    /// 중복 제거된 라이선스 집합
    pub licenses: BTreeSet<String>,
    /// 건너뛴 입력 목록
    pub failures: Vec<LoadFailure>,
}

impl LoadOutput {
    /// 아무 purl도 추출되지 않았는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.purls.is_empty() && self.licenses.is_empty()
    }
}

/// 부분 결과를 보존하는 경로 해석 결과
///
/// 마지막 입력이 단일 파일이고 실패했더라도 `output`에는 앞선 입력의 결과가 남습니다.
#[derive(Debug)]
pub struct LoadOutcome {
    /// 지금까지 추출한 결과
    pub output: LoadOutput,
    /// 마지막 단일 파일 입력의 실패
    pub surfaced: Option<SbomLoaderError>,
}

impl LoadOutcome {
    /// 실패가 있으면 부분 결과를 버리고 에러를 반환합니다.
    pub fn into_result(self) -> Result<LoadOutput, SbomLoaderError> {
        match self.surfaced {
            Some(e) => Err(e),
            None => Ok(self.output),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_display_names() {
        assert_eq!(SbomFormat::CycloneDxXml.to_string(), "cyclonedx-xml");
        assert_eq!(SbomFormat::CycloneDxJson.to_string(), "cyclonedx-json");
        assert_eq!(SbomFormat::SpdxJson.to_string(), "spdx-json");
        assert_eq!(SbomFormat::SyftJson.to_string(), "syft-json");
    }

    #[test]
    fn format_serializes_as_display_name() {
        let json = serde_json::to_string(&SbomFormat::SpdxJson).unwrap();
        assert_eq!(json, "\"spdx-json\"");
    }

    #[test]
    fn scanned_file_hash_of_empty_input() {
        let file = ScannedFile::from_bytes("empty", b"");
        assert_eq!(
            file.sha256,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn scanned_file_hash_is_lowercase_hex() {
        let file = ScannedFile::from_bytes("abc", b"abc");
        assert_eq!(
            file.sha256,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(file.sha256.len(), 64);
    }

    #[test]
    fn scanned_file_display() {
        let file = ScannedFile::from_bytes("bom.json", b"abc");
        assert!(file.to_string().starts_with("bom.json (sha256:ba7816bf"));
    }

    #[test]
    fn extracted_document_skips_blank_values() {
        let mut doc = ExtractedDocument::default();
        doc.push_purl(Some("pkg:npm/lodash@4.17.21"));
        doc.push_purl(Some("   "));
        doc.push_purl(None);
        doc.push_license(Some(" MIT "));
        doc.push_license(Some(""));
        assert_eq!(doc.purls, vec!["pkg:npm/lodash@4.17.21"]);
        assert_eq!(doc.licenses, vec!["MIT"]);
    }

    #[test]
    fn empty_output() {
        let output = LoadOutput::default();
        assert!(output.is_empty());
        assert!(output.files.is_empty());
    }
}
