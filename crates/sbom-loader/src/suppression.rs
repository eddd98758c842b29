//! 억제 규칙 문서 로더
//!
//! `.snyk` 형식의 YAML 문서를 읽고, 현재 시각 기준으로 유효한
//! 와일드카드(`*`) 규칙의 취약점 ID만 반환합니다.
//!
//! # 문서 형식
//!
//! ```yaml
//! version: v1.25.0
//! ignore:
//!   SNYK-JS-LODASH-567746:
//!     - '*':
//!         reason: no fix available
//!         expires: 2030-01-01T00:00:00.000Z
//!         created: 2024-01-01T00:00:00.000Z
//!   CVE-2021-44228:
//!     - 'app > log4j-core':
//!         reason: only reachable in tests
//! patch: {}
//! ```
//!
//! # 활성 규칙 판정
//!
//! - 경로 패턴이 정확히 `*`인 규칙만 평가합니다. 경로 한정 규칙은 파싱만 하고 사용하지 않습니다.
//! - 만료일이 없으면 활성입니다.
//! - 만료일은 RFC 3339 타임스탬프이며, 평가 시각보다 엄격히 이전이면 만료입니다.
//! - 만료일 파싱에 실패한 규칙은 경고 로그를 남기고 비활성으로 취급합니다.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info, warn};

use ironbom_core::metrics as m;

use crate::error::SbomLoaderError;
use crate::fs::FileSystem;

/// 모든 경로에 적용되는 규칙의 경로 패턴
pub const WILDCARD_PATH: &str = "*";

/// 억제 규칙 하나의 세부 정보
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IgnoreEntry {
    /// 억제 사유
    #[serde(default, deserialize_with = "null_as_default")]
    pub reason: String,
    /// 규칙 생성일
    #[serde(default, deserialize_with = "null_as_default")]
    pub created: String,
    /// 만료일 (RFC 3339). 비어있으면 만료 없음
    #[serde(default)]
    pub expires: Option<String>,
}

impl IgnoreEntry {
    /// 만료일 문자열을 반환합니다. 빈 문자열은 만료 없음으로 봅니다.
    pub fn expiration(&self) -> Option<&str> {
        self.expires.as_deref().filter(|s| !s.trim().is_empty())
    }
}

/// 해석하지 않는 `patch` 섹션
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatchSection(pub serde_yaml::Value);

/// 경로 패턴 -> 규칙 세부 정보 (단일 항목 매핑)
pub type PathRule = BTreeMap<String, IgnoreEntry>;

/// 억제 규칙 문서
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuppressionDocument {
    /// 문서 형식 버전
    #[serde(default, deserialize_with = "null_as_default")]
    pub version: String,
    /// 취약점 ID -> 경로 한정 규칙 목록 (문서 순서)
    #[serde(default, deserialize_with = "null_as_default")]
    pub ignore: BTreeMap<String, Vec<PathRule>>,
    /// 해석하지 않고 보존만 하는 섹션
    #[serde(default)]
    pub patch: Option<PatchSection>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// 주석과 공백만 있는 문서인지 확인
fn is_blank_document(content: &str) -> bool {
    content
        .lines()
        .map(str::trim)
        .all(|line| line.is_empty() || line.starts_with('#'))
}

impl SuppressionDocument {
    /// YAML 문자열을 파싱합니다.
    ///
    /// 비어있거나 주석만 있는 문서는 빈 문서로 취급합니다.
    ///
    /// # Errors
    ///
    /// 형식이 잘못되면 `SbomLoaderError::SuppressionParse`
    pub fn parse(content: &str, source_path: &str) -> Result<Self, SbomLoaderError> {
        if is_blank_document(content) {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| SbomLoaderError::SuppressionParse {
            path: source_path.to_owned(),
            reason: e.to_string(),
        })
    }

    /// 전체 규칙 수 (경로 한정 규칙 포함)
    pub fn rule_count(&self) -> usize {
        self.ignore
            .values()
            .flat_map(|rules| rules.iter().map(BTreeMap::len))
            .sum()
    }

    /// `now` 시점에 유효한 와일드카드 규칙의 취약점 ID를 반환합니다.
    ///
    /// 같은 ID를 가리키는 활성 규칙이 여러 개여도 한 번만 포함됩니다.
    pub fn active_suppressions(&self, now: DateTime<Utc>) -> Vec<String> {
        let mut active = BTreeSet::new();

        for (vuln_id, rules) in &self.ignore {
            let wildcard_entries = rules
                .iter()
                .flat_map(|rule| rule.iter())
                .filter(|(pattern, _)| pattern.as_str() == WILDCARD_PATH)
                .map(|(_, entry)| entry);

            for entry in wildcard_entries {
                if is_entry_active(vuln_id, entry, now) {
                    active.insert(vuln_id.clone());
                }
            }
        }

        active.into_iter().collect()
    }
}

fn is_entry_active(vuln_id: &str, entry: &IgnoreEntry, now: DateTime<Utc>) -> bool {
    let Some(expires) = entry.expiration() else {
        return true;
    };

    match DateTime::parse_from_rfc3339(expires) {
        Ok(expires_at) if expires_at.with_timezone(&Utc) < now => {
            metrics::counter!(m::SUPPRESSION_RULES_EXPIRED_TOTAL).increment(1);
            warn!(vuln_id, expires, "ignoring expired suppression rule");
            false
        }
        Ok(_) => true,
        Err(e) => {
            metrics::counter!(m::SUPPRESSION_INVALID_EXPIRATIONS_TOTAL).increment(1);
            let err = SbomLoaderError::ExpirationParse {
                vuln_id: vuln_id.to_owned(),
                expires: expires.to_owned(),
                reason: e.to_string(),
            };
            warn!(error = %err, "skipping suppression rule");
            false
        }
    }
}

/// 억제 규칙 문서를 읽고 파싱합니다.
///
/// 빈 경로는 `Ok(None)`입니다.
///
/// # Errors
///
/// - 읽기 실패 (존재하지 않는 경로 포함) 시 `SbomLoaderError::SuppressionRead`
/// - 파싱 실패 시 `SbomLoaderError::SuppressionParse`
pub fn read_suppression_document<F>(
    fs: &F,
    path: &str,
) -> Result<Option<SuppressionDocument>, SbomLoaderError>
where
    F: FileSystem + ?Sized,
{
    if path.is_empty() {
        debug!("no suppression file specified");
        return Ok(None);
    }

    info!(path, "loading suppression file");
    let bytes = fs
        .read(Path::new(path))
        .map_err(|source| SbomLoaderError::SuppressionRead {
            path: path.to_owned(),
            source,
        })?;
    let content = String::from_utf8(bytes).map_err(|e| SbomLoaderError::SuppressionParse {
        path: path.to_owned(),
        reason: e.to_string(),
    })?;

    let document = SuppressionDocument::parse(&content, path)?;
    debug!(
        path,
        version = %document.version,
        ids = document.ignore.len(),
        rules = document.rule_count(),
        "suppression file parsed"
    );
    Ok(Some(document))
}

/// 억제 규칙 문서를 읽어 현재 시각 기준 활성 취약점 ID를 반환합니다.
pub fn load_suppression_document<F>(fs: &F, path: &str) -> Result<Vec<String>, SbomLoaderError>
where
    F: FileSystem + ?Sized,
{
    load_suppression_document_at(fs, path, Utc::now())
}

/// 억제 규칙 문서를 읽어 `now` 기준 활성 취약점 ID를 반환합니다.
pub fn load_suppression_document_at<F>(
    fs: &F,
    path: &str,
    now: DateTime<Utc>,
) -> Result<Vec<String>, SbomLoaderError>
where
    F: FileSystem + ?Sized,
{
    Ok(read_suppression_document(fs, path)?
        .map(|doc| doc.active_suppressions(now))
        .unwrap_or_default())
}
