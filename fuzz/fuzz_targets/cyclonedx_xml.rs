#![no_main]

use ironbom_sbom_loader::{CycloneDxXmlDecoder, SbomDecoder};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // 탐지 단계를 건너뛰고 XML 디코더에 직접 입력
    let _ = CycloneDxXmlDecoder.decode(data, "fuzz-input.xml");
});
