//! 줄 단위 취약점 ID 무시 목록 로더

use std::path::Path;

use tracing::{debug, info};

use crate::error::SbomLoaderError;
use crate::fs::FileSystem;

/// 무시 목록 파일을 읽어 취약점 ID 목록을 반환합니다.
///
/// 빈 경로는 "기능 미사용"으로 보고 빈 목록을 반환합니다.
/// 비어있지 않은 줄 하나가 ID 하나이며, 줄 내용은 다듬지 않고 그대로 사용합니다.
///
/// # Errors
///
/// - 경로가 존재하지 않으면 `SbomLoaderError::IgnoreFileNotFound`
/// - 읽기 실패 또는 UTF-8이 아니면 `SbomLoaderError::Io`
pub fn load_ignore_list<F>(fs: &F, path: &str) -> Result<Vec<String>, SbomLoaderError>
where
    F: FileSystem + ?Sized,
{
    if path.is_empty() {
        return Ok(Vec::new());
    }

    info!(path, "loading ignore file");
    let file = Path::new(path);
    if !fs.exists(file) {
        return Err(SbomLoaderError::IgnoreFileNotFound {
            path: path.to_owned(),
        });
    }

    let bytes = fs.read(file).map_err(|source| SbomLoaderError::Io {
        path: path.to_owned(),
        source,
    })?;
    let content = String::from_utf8(bytes).map_err(|e| SbomLoaderError::Io {
        path: path.to_owned(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
    })?;

    let ids: Vec<String> = content
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect();

    debug!(path, count = ids.len(), "ignore file loaded");
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFileSystem;

    #[test]
    fn empty_path_is_noop() {
        let fs = MemoryFileSystem::new();
        assert!(load_ignore_list(&fs, "").unwrap().is_empty());
    }

    #[test]
    fn missing_file_names_the_path() {
        let fs = MemoryFileSystem::new();
        let err = load_ignore_list(&fs, "/nonexistent").unwrap_err();
        assert!(
            matches!(err, SbomLoaderError::IgnoreFileNotFound { ref path } if path == "/nonexistent")
        );
        assert!(err.to_string().contains("/nonexistent"));
    }

    #[test]
    fn reads_one_id_per_non_empty_line() {
        let fs = MemoryFileSystem::new()
            .with_file(".ironbom-ignore", "CVE-2022-31163\n\nCVE-2021-44228\n");
        let ids = load_ignore_list(&fs, ".ironbom-ignore").unwrap();
        assert_eq!(ids, vec!["CVE-2022-31163", "CVE-2021-44228"]);
    }

    #[test]
    fn keeps_lines_verbatim() {
        let fs = MemoryFileSystem::new().with_file("ignore", "  CVE-1 # note\nGHSA-xxxx");
        let ids = load_ignore_list(&fs, "ignore").unwrap();
        assert_eq!(ids, vec!["  CVE-1 # note", "GHSA-xxxx"]);
    }

    #[test]
    fn handles_crlf_line_endings() {
        let fs = MemoryFileSystem::new().with_file("ignore", "CVE-1\r\nCVE-2\r\n");
        let ids = load_ignore_list(&fs, "ignore").unwrap();
        assert_eq!(ids, vec!["CVE-1", "CVE-2"]);
    }

    #[test]
    fn empty_file_yields_empty_list() {
        let fs = MemoryFileSystem::new().with_file("ignore", "");
        assert!(load_ignore_list(&fs, "ignore").unwrap().is_empty());
    }

    #[test]
    fn unreadable_file_is_io_error() {
        let fs = MemoryFileSystem::new().with_unreadable("ignore");
        let err = load_ignore_list(&fs, "ignore").unwrap_err();
        assert!(matches!(err, SbomLoaderError::Io { .. }));
    }

    #[test]
    fn invalid_utf8_is_io_error() {
        let fs = MemoryFileSystem::new().with_file("ignore", b"CVE-1\n\xFF\xFE");
        let err = load_ignore_list(&fs, "ignore").unwrap_err();
        assert!(matches!(err, SbomLoaderError::Io { ref source, .. } if source.kind() == std::io::ErrorKind::InvalidData));
    }
}
