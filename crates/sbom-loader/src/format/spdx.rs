//! SPDX JSON 디코더
//!
//! 각 패키지의 `externalRefs` 중 `referenceType == "purl"`인 항목의
//! `referenceLocator`를 purl로, `licenseDeclared` / `licenseConcluded`를
//! 라이선스로 수집합니다. `NOASSERTION`, `NONE`은 라이선스로 보지 않습니다.

use serde::Deserialize;

use crate::error::SbomLoaderError;
use crate::format::{SbomDecoder, contains, decode_error, strip_bom};
use crate::types::{ExtractedDocument, SbomFormat};

const DOCUMENT_REF_MARKER: &[u8] = b"SPDXRef-DOCUMENT";

/// SPDX 라이선스 필드에서 "값 없음"을 뜻하는 예약어
const NO_LICENSE_VALUES: &[&str] = &["NOASSERTION", "NONE"];

/// SPDX JSON 디코더
pub struct SpdxJsonDecoder;

#[derive(Deserialize)]
struct SpdxDocument {
    #[serde(default)]
    packages: Option<Vec<SpdxPackage>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpdxPackage {
    #[serde(default)]
    external_refs: Option<Vec<SpdxExternalRef>>,
    #[serde(default)]
    license_declared: Option<String>,
    #[serde(default)]
    license_concluded: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpdxExternalRef {
    #[serde(default)]
    reference_type: Option<String>,
    #[serde(default)]
    reference_locator: Option<String>,
}

fn meaningful_license(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !NO_LICENSE_VALUES.contains(v))
}

impl SbomDecoder for SpdxJsonDecoder {
    fn format(&self) -> SbomFormat {
        SbomFormat::SpdxJson
    }

    fn sniff(&self, bytes: &[u8]) -> bool {
        contains(bytes, DOCUMENT_REF_MARKER)
    }

    fn decode(
        &self,
        bytes: &[u8],
        source_path: &str,
    ) -> Result<ExtractedDocument, SbomLoaderError> {
        let document: SpdxDocument = serde_json::from_slice(strip_bom(bytes))
            .map_err(|e| decode_error(source_path, self.format(), e))?;

        let mut doc = ExtractedDocument::default();
        for package in document.packages.into_iter().flatten() {
            for reference in package.external_refs.iter().flatten() {
                if reference.reference_type.as_deref() == Some("purl") {
                    doc.push_purl(reference.reference_locator.as_deref());
                }
            }
            doc.push_license(meaningful_license(package.license_declared.as_deref()));
            doc.push_license(meaningful_license(package.license_concluded.as_deref()));
        }

        Ok(doc)
    }
}
