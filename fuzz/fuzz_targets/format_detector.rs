#![no_main]

use ironbom_sbom_loader::FormatDetector;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let detector = FormatDetector::new();
    let _ = detector.decode(data, "fuzz-input");
});
