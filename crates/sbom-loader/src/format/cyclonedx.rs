//! CycloneDX 디코더 (JSON / XML)
//!
//! `components` 트리 전체(중첩 컴포넌트 포함)를 순회하여 purl을 수집하고,
//! 각 컴포넌트와 `metadata.licenses`의 라이선스를 수집합니다.
//! 문서의 대상인 `metadata.component`는 purl 목록에 넣지 않습니다.
//!
//! 라이선스 항목은 `license.id`, `license.name` 순으로 하나를 사용하고,
//! `expression` 항목은 표현식 문자열 그대로 사용합니다.

use serde::Deserialize;

use crate::error::SbomLoaderError;
use crate::format::{SbomDecoder, contains, decode_error, strip_bom};
use crate::types::{ExtractedDocument, SbomFormat};

const DIALECT_MARKER: &[u8] = b"CycloneDX";
const XML_NAMESPACE_MARKER: &[u8] = b"xmlns";
const JSON_FORMAT_MARKER: &[u8] = b"bomFormat";

/// CycloneDX JSON 디코더
pub struct CycloneDxJsonDecoder;

/// CycloneDX XML 디코더
pub struct CycloneDxXmlDecoder;

impl SbomDecoder for CycloneDxJsonDecoder {
    fn format(&self) -> SbomFormat {
        SbomFormat::CycloneDxJson
    }

    fn sniff(&self, bytes: &[u8]) -> bool {
        contains(bytes, JSON_FORMAT_MARKER) && contains(bytes, DIALECT_MARKER)
    }

    fn decode(
        &self,
        bytes: &[u8],
        source_path: &str,
    ) -> Result<ExtractedDocument, SbomLoaderError> {
        let bom: CdxBom = serde_json::from_slice(strip_bom(bytes))
            .map_err(|e| decode_error(source_path, self.format(), e))?;
        Ok(bom.extract())
    }
}

impl SbomDecoder for CycloneDxXmlDecoder {
    fn format(&self) -> SbomFormat {
        SbomFormat::CycloneDxXml
    }

    fn sniff(&self, bytes: &[u8]) -> bool {
        contains(bytes, XML_NAMESPACE_MARKER) && contains(bytes, DIALECT_MARKER)
    }

    fn decode(
        &self,
        bytes: &[u8],
        source_path: &str,
    ) -> Result<ExtractedDocument, SbomLoaderError> {
        let content = std::str::from_utf8(strip_bom(bytes))
            .map_err(|e| decode_error(source_path, self.format(), e))?;
        let bom: CdxBomXml = quick_xml::de::from_str(content)
            .map_err(|e| decode_error(source_path, self.format(), e))?;
        Ok(bom.extract())
    }
}

// =============================================================================
// JSON 구조 (파싱용)
// =============================================================================

#[derive(Deserialize)]
struct CdxBom {
    #[serde(default)]
    metadata: Option<CdxMetadata>,
    #[serde(default)]
    components: Option<Vec<CdxComponent>>,
}

#[derive(Deserialize)]
struct CdxMetadata {
    #[serde(default)]
    licenses: Option<Vec<CdxLicenseChoice>>,
}

#[derive(Deserialize)]
struct CdxComponent {
    #[serde(default)]
    purl: Option<String>,
    #[serde(default)]
    licenses: Option<Vec<CdxLicenseChoice>>,
    #[serde(default)]
    components: Option<Vec<CdxComponent>>,
}

#[derive(Deserialize)]
struct CdxLicenseChoice {
    #[serde(default)]
    license: Option<CdxLicense>,
    #[serde(default)]
    expression: Option<String>,
}

#[derive(Deserialize)]
struct CdxLicense {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

impl CdxLicense {
    fn identifier(&self) -> Option<&str> {
        self.id
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .or(self.name.as_deref())
    }
}

impl CdxLicenseChoice {
    fn push_into(&self, doc: &mut ExtractedDocument) {
        if let Some(license) = &self.license {
            doc.push_license(license.identifier());
        }
        doc.push_license(self.expression.as_deref());
    }
}

impl CdxBom {
    fn extract(self) -> ExtractedDocument {
        let mut doc = ExtractedDocument::default();
        // 스택은 문서 순서의 역순으로 유지
        let mut stack: Vec<CdxComponent> =
            self.components.into_iter().flatten().rev().collect();

        if let Some(metadata) = self.metadata {
            for choice in metadata.licenses.iter().flatten() {
                choice.push_into(&mut doc);
            }
        }

        while let Some(component) = stack.pop() {
            doc.push_purl(component.purl.as_deref());
            for choice in component.licenses.iter().flatten() {
                choice.push_into(&mut doc);
            }
            stack.extend(component.components.into_iter().flatten().rev());
        }

        doc
    }
}

// =============================================================================
// XML 구조 (파싱용)
// =============================================================================

#[derive(Deserialize)]
#[serde(rename = "bom")]
struct CdxBomXml {
    #[serde(default)]
    metadata: Option<CdxMetadataXml>,
    #[serde(default)]
    components: Option<CdxComponentsXml>,
}

#[derive(Deserialize)]
struct CdxMetadataXml {
    #[serde(default)]
    licenses: Option<CdxLicensesXml>,
}

#[derive(Deserialize)]
struct CdxComponentsXml {
    #[serde(rename = "component", default)]
    component: Vec<CdxComponentXml>,
}

#[derive(Deserialize)]
struct CdxComponentXml {
    #[serde(default)]
    purl: Option<String>,
    #[serde(default)]
    licenses: Option<CdxLicensesXml>,
    #[serde(default)]
    components: Option<CdxComponentsXml>,
}

/// `<licenses>` 요소: `<license>` 목록 또는 단일 `<expression>`
#[derive(Deserialize)]
struct CdxLicensesXml {
    #[serde(rename = "license", default)]
    license: Vec<CdxLicense>,
    #[serde(default)]
    expression: Option<String>,
}

impl CdxLicensesXml {
    fn push_into(&self, doc: &mut ExtractedDocument) {
        for license in &self.license {
            doc.push_license(license.identifier());
        }
        doc.push_license(self.expression.as_deref());
    }
}

impl CdxBomXml {
    fn extract(self) -> ExtractedDocument {
        let mut doc = ExtractedDocument::default();
        let mut stack: Vec<CdxComponentXml> = self
            .components
            .map(|c| c.component)
            .unwrap_or_default()
            .into_iter()
            .rev()
            .collect();

        if let Some(licenses) = self.metadata.and_then(|m| m.licenses) {
            licenses.push_into(&mut doc);
        }

        while let Some(component) = stack.pop() {
            doc.push_purl(component.purl.as_deref());
            if let Some(licenses) = &component.licenses {
                licenses.push_into(&mut doc);
            }
            stack.extend(
                component
                    .components
                    .map(|c| c.component)
                    .unwrap_or_default()
                    .into_iter()
                    .rev(),
            );
        }

        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_JSON: &str = r#"{
  "bomFormat": "CycloneDX",
  "specVersion": "1.5",
  "version": 1,
  "metadata": {
    "component": { "type": "application", "name": "app", "purl": "pkg:npm/app@1.0.0" },
    "licenses": [ { "license": { "id": "Apache-2.0" } } ]
  },
  "components": [
    {
      "type": "library",
      "name": "lodash",
      "version": "4.17.21",
      "purl": "pkg:npm/lodash@4.17.21",
      "licenses": [ { "license": { "id": "MIT" } } ],
      "components": [
        {
          "type": "library",
          "name": "inner",
          "purl": "pkg:npm/inner@0.1.0",
          "licenses": [ { "expression": "MIT OR Apache-2.0" } ]
        }
      ]
    },
    {
      "type": "library",
      "name": "no-purl",
      "licenses": [ { "license": { "name": "Custom License" } } ]
    }
  ]
}"#;

    const SAMPLE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<bom xmlns="http://cyclonedx.org/schema/bom/1.4" serialNumber="urn:uuid:3e671687-395b-41f5-a30f-a58921a69b79" version="1">
  <metadata>
    <tools>
      <tool>
        <vendor>CycloneDX</vendor>
        <name>cyclonedx-maven-plugin</name>
        <version>2.7.9</version>
      </tool>
    </tools>
    <component type="application">
      <name>app</name>
      <purl>pkg:maven/com.example/app@1.0.0</purl>
    </component>
    <licenses>
      <license><id>Apache-2.0</id></license>
    </licenses>
  </metadata>
  <components>
    <component type="library">
      <name>commons-lang3</name>
      <version>3.12.0</version>
      <purl>pkg:maven/org.apache.commons/commons-lang3@3.12.0</purl>
      <licenses>
        <license><id>Apache-2.0</id></license>
        <license><name>Public Domain</name></license>
      </licenses>
      <components>
        <component type="library">
          <name>nested</name>
          <purl>pkg:maven/org.example/nested@0.1</purl>
          <licenses>
            <expression>EPL-2.0 OR GPL-2.0-with-classpath-exception</expression>
          </licenses>
        </component>
      </components>
    </component>
    <component type="library">
      <name>guava</name>
      <purl>pkg:maven/com.google.guava/guava@31.1-jre</purl>
    </component>
  </components>
</bom>"#;

    #[test]
    fn sniff_json_requires_both_markers() {
        let decoder = CycloneDxJsonDecoder;
        assert!(decoder.sniff(br#"{"bomFormat":"CycloneDX"}"#));
        assert!(!decoder.sniff(br#"{"bomFormat":"other"}"#));
        assert!(!decoder.sniff(br#"{"name":"CycloneDX"}"#));
    }

    #[test]
    fn sniff_xml_requires_both_markers() {
        let decoder = CycloneDxXmlDecoder;
        assert!(decoder.sniff(SAMPLE_XML.as_bytes()));
        assert!(!decoder.sniff(b"<bom><name>CycloneDX</name></bom>"));
    }

    #[test]
    fn sniff_xml_rejects_namespace_without_dialect_name() {
        let namespace_only =
            br#"<?xml version="1.0"?><bom xmlns="http://cyclonedx.org/schema/bom/1.4" version="1"></bom>"#;
        assert!(!CycloneDxXmlDecoder.sniff(namespace_only));
        assert_eq!(crate::format::classify(namespace_only), None);
    }

    #[test]
    fn decode_json_walks_nested_components() {
        let doc = CycloneDxJsonDecoder
            .decode(SAMPLE_JSON.as_bytes(), "bom.json")
            .unwrap();
        assert_eq!(
            doc.purls,
            vec!["pkg:npm/lodash@4.17.21", "pkg:npm/inner@0.1.0"]
        );
    }

    #[test]
    fn decode_json_skips_metadata_component_purl() {
        let doc = CycloneDxJsonDecoder
            .decode(SAMPLE_JSON.as_bytes(), "bom.json")
            .unwrap();
        assert!(!doc.purls.contains(&"pkg:npm/app@1.0.0".to_owned()));
        // metadata.licenses는 계속 수집
        assert!(doc.licenses.contains(&"Apache-2.0".to_owned()));
    }

    #[test]
    fn decode_json_collects_all_license_forms() {
        let doc = CycloneDxJsonDecoder
            .decode(SAMPLE_JSON.as_bytes(), "bom.json")
            .unwrap();
        assert!(doc.licenses.contains(&"Apache-2.0".to_owned()));
        assert!(doc.licenses.contains(&"MIT".to_owned()));
        assert!(doc.licenses.contains(&"MIT OR Apache-2.0".to_owned()));
        assert!(doc.licenses.contains(&"Custom License".to_owned()));
    }

    #[test]
    fn decode_json_without_components() {
        let doc = CycloneDxJsonDecoder
            .decode(br#"{"bomFormat":"CycloneDX","specVersion":"1.4"}"#, "empty.json")
            .unwrap();
        assert!(doc.purls.is_empty());
        assert!(doc.licenses.is_empty());
    }

    #[test]
    fn decode_json_tolerates_null_lists() {
        let doc = CycloneDxJsonDecoder
            .decode(
                br#"{"bomFormat":"CycloneDX","components":[{"purl":"pkg:npm/a@1","licenses":null,"components":null}]}"#,
                "nulls.json",
            )
            .unwrap();
        assert_eq!(doc.purls, vec!["pkg:npm/a@1"]);
    }

    #[test]
    fn decode_json_with_utf8_bom() {
        let mut bytes = b"\xEF\xBB\xBF".to_vec();
        bytes.extend_from_slice(br#"{"bomFormat":"CycloneDX","components":[{"purl":"pkg:npm/a@1"}]}"#);
        let doc = CycloneDxJsonDecoder.decode(&bytes, "bom.json").unwrap();
        assert_eq!(doc.purls.len(), 1);
    }

    #[test]
    fn decode_json_malformed_is_decode_error() {
        let err = CycloneDxJsonDecoder
            .decode(br#"{"bomFormat":"CycloneDX","#, "broken.json")
            .unwrap_err();
        assert!(matches!(
            err,
            SbomLoaderError::Decode { ref path, format: SbomFormat::CycloneDxJson, .. } if path == "broken.json"
        ));
    }

    #[test]
    fn decode_json_schema_mismatch_is_decode_error() {
        let err = CycloneDxJsonDecoder
            .decode(br#"{"bomFormat":"CycloneDX","components":"oops"}"#, "bad.json")
            .unwrap_err();
        assert!(matches!(err, SbomLoaderError::Decode { .. }));
    }

    #[test]
    fn decode_xml_walks_nested_components() {
        let doc = CycloneDxXmlDecoder
            .decode(SAMPLE_XML.as_bytes(), "bom.xml")
            .unwrap();
        assert_eq!(
            doc.purls,
            vec![
                "pkg:maven/org.apache.commons/commons-lang3@3.12.0",
                "pkg:maven/org.example/nested@0.1",
                "pkg:maven/com.google.guava/guava@31.1-jre",
            ]
        );
    }

    #[test]
    fn decode_xml_collects_licenses() {
        let doc = CycloneDxXmlDecoder
            .decode(SAMPLE_XML.as_bytes(), "bom.xml")
            .unwrap();
        assert!(doc.licenses.contains(&"Apache-2.0".to_owned()));
        assert!(doc.licenses.contains(&"Public Domain".to_owned()));
        assert!(
            doc.licenses
                .contains(&"EPL-2.0 OR GPL-2.0-with-classpath-exception".to_owned())
        );
    }

    #[test]
    fn decode_xml_empty_bom() {
        let doc = CycloneDxXmlDecoder
            .decode(
                br#"<bom xmlns="http://cyclonedx.org/schema/bom/1.4" version="1"></bom>"#,
                "empty.xml",
            )
            .unwrap();
        assert!(doc.purls.is_empty());
    }

    #[test]
    fn decode_xml_malformed_is_decode_error() {
        let err = CycloneDxXmlDecoder
            .decode(
                br#"<bom xmlns="http://cyclonedx.org/schema/bom/1.4"><components><component>"#,
                "broken.xml",
            )
            .unwrap_err();
        assert!(matches!(
            err,
            SbomLoaderError::Decode {
                format: SbomFormat::CycloneDxXml,
                ..
            }
        ));
    }

    #[test]
    fn decode_xml_invalid_utf8_is_decode_error() {
        let err = CycloneDxXmlDecoder
            .decode(b"<bom xmlns=\"CycloneDX\">\xFF\xFE</bom>", "latin1.xml")
            .unwrap_err();
        assert!(matches!(err, SbomLoaderError::Decode { .. }));
    }
}
