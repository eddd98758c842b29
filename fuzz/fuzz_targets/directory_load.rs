#![no_main]

use arbitrary::Arbitrary;
use ironbom_sbom_loader::{MemoryFileSystem, SbomLoader, SbomLoaderConfig};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    files: Vec<(u8, Vec<u8>)>,
    trailing_file: Option<Vec<u8>>,
}

fuzz_target!(|input: Input| {
    let mut fs = MemoryFileSystem::new().with_dir("sboms");
    for (name, bytes) in &input.files {
        fs = fs.with_file(format!("sboms/{name}.json"), bytes);
    }

    let mut inputs = vec!["sboms".to_owned()];
    if let Some(bytes) = &input.trailing_file {
        fs = fs.with_file("single.json", bytes);
        inputs.push("single.json".to_owned());
    }

    let loader = SbomLoader::with_filesystem(SbomLoaderConfig::default(), fs);
    // 디렉토리 멤버의 실패는 절대 에러로 올라오지 않아야 함
    if let Err(e) = loader.load(&inputs[..1]) {
        panic!("directory load surfaced an error: {e}");
    }
    let _ = loader.load(&inputs);
});
