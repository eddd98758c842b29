//! Syft JSON 디코더
//!
//! `artifacts[].purl`과 `artifacts[].licenses`를 수집합니다.
//! 라이선스는 오래된 스키마의 문자열 목록과 최신 스키마의 객체 목록을 모두 받습니다.
//! 객체는 `spdxExpression`이 있으면 그것을, 없으면 `value`를 사용합니다.

use serde::Deserialize;

use crate::error::SbomLoaderError;
use crate::format::{SbomDecoder, contains, decode_error, strip_bom};
use crate::types::{ExtractedDocument, SbomFormat};

const SCHEMA_URL_PREFIX: &[u8] =
    b"https://raw.githubusercontent.com/anchore/syft/main/schema/json/schema-";

/// Syft JSON 디코더
pub struct SyftJsonDecoder;

#[derive(Deserialize)]
struct SyftDocument {
    #[serde(default)]
    artifacts: Option<Vec<SyftArtifact>>,
}

#[derive(Deserialize)]
struct SyftArtifact {
    #[serde(default)]
    purl: Option<String>,
    #[serde(default)]
    licenses: Option<Vec<SyftLicense>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SyftLicense {
    Plain(String),
    Detailed {
        #[serde(default)]
        value: Option<String>,
        #[serde(default, rename = "spdxExpression")]
        spdx_expression: Option<String>,
    },
}

impl SyftLicense {
    fn as_str(&self) -> Option<&str> {
        match self {
            Self::Plain(s) => Some(s.as_str()),
            Self::Detailed {
                value,
                spdx_expression,
            } => spdx_expression
                .as_deref()
                .filter(|s| !s.trim().is_empty())
                .or(value.as_deref()),
        }
    }
}

impl SbomDecoder for SyftJsonDecoder {
    fn format(&self) -> SbomFormat {
        SbomFormat::SyftJson
    }

    fn sniff(&self, bytes: &[u8]) -> bool {
        contains(bytes, SCHEMA_URL_PREFIX)
    }

    fn decode(
        &self,
        bytes: &[u8],
        source_path: &str,
    ) -> Result<ExtractedDocument, SbomLoaderError> {
        let document: SyftDocument = serde_json::from_slice(strip_bom(bytes))
            .map_err(|e| decode_error(source_path, self.format(), e))?;

        let mut doc = ExtractedDocument::default();
        for artifact in document.artifacts.into_iter().flatten() {
            doc.push_purl(artifact.purl.as_deref());
            for license in artifact.licenses.iter().flatten() {
                doc.push_license(license.as_str());
            }
        }

        Ok(doc)
    }
}
