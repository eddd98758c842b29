//! 메트릭 상수 및 설명 등록
//!
//! 모든 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 각 모듈은 이 상수를 사용하여 `metrics::counter!()` 매크로를 호출합니다.
//! 레코더가 설치되지 않으면 모든 호출은 no-op입니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `ironbom_`
//! - 모듈명: `sbom_loader_`, `suppression_`
//! - 접미어: `_total` (counter)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(ironbom_core::metrics::SBOM_LOADER_FILES_READ_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// SBOM 형식 레이블 키 (cyclonedx-xml, cyclonedx-json, spdx-json, syft-json)
pub const LABEL_FORMAT: &str = "format";

/// 실패 단계 레이블 키 (read, format, decode)
pub const LABEL_STAGE: &str = "stage";

// ─── SBOM Loader 메트릭 ────────────────────────────────────────────

/// SBOM Loader: 읽기에 성공한 파일 수 (counter)
pub const SBOM_LOADER_FILES_READ_TOTAL: &str = "ironbom_sbom_loader_files_read_total";

/// SBOM Loader: 건너뛴 파일 수 (counter, label: stage)
pub const SBOM_LOADER_FILES_FAILED_TOTAL: &str = "ironbom_sbom_loader_files_failed_total";

/// SBOM Loader: 디코딩에 성공한 문서 수 (counter, label: format)
pub const SBOM_LOADER_DOCUMENTS_DECODED_TOTAL: &str =
    "ironbom_sbom_loader_documents_decoded_total";

// ─── Suppression 메트릭 ────────────────────────────────────────────

/// Suppression: 만료되어 무시된 규칙 수 (counter)
pub const SUPPRESSION_RULES_EXPIRED_TOTAL: &str = "ironbom_suppression_rules_expired_total";

/// Suppression: 만료일 파싱에 실패한 규칙 수 (counter)
pub const SUPPRESSION_INVALID_EXPIRATIONS_TOTAL: &str =
    "ironbom_suppression_invalid_expirations_total";

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// 전역 레코더 설치 후 한 번만 호출해야 합니다.
pub fn describe_all() {
    use metrics::describe_counter;

    describe_counter!(
        SBOM_LOADER_FILES_READ_TOTAL,
        "Total number of input files whose bytes were read"
    );
    describe_counter!(
        SBOM_LOADER_FILES_FAILED_TOTAL,
        "Total number of input files skipped, by failure stage"
    );
    describe_counter!(
        SBOM_LOADER_DOCUMENTS_DECODED_TOTAL,
        "Total number of SBOM documents decoded, by format"
    );
    describe_counter!(
        SUPPRESSION_RULES_EXPIRED_TOTAL,
        "Total number of wildcard suppression rules skipped as expired"
    );
    describe_counter!(
        SUPPRESSION_INVALID_EXPIRATIONS_TOTAL,
        "Total number of suppression rules with an unparseable expiration date"
    );
}
