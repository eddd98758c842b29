#![no_main]

use chrono::{TimeZone, Utc};
use ironbom_sbom_loader::SuppressionDocument;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // YAML 파서는 &str을 받으므로 UTF-8 변환 필요
    if let Ok(yaml_str) = std::str::from_utf8(data) {
        if let Ok(doc) = SuppressionDocument::parse(yaml_str, "fuzz-input.snyk") {
            let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
            let _ = doc.active_suppressions(now);
        }
    }
});
