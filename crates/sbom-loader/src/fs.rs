//! 파일시스템 추상화
//!
//! 로더는 전역 상태 대신 [`FileSystem`] 구현을 명시적으로 주입받습니다.
//! 실제 디스크는 [`OsFileSystem`], 테스트는 [`MemoryFileSystem`]을 사용합니다.

use std::collections::BTreeMap;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// 디렉토리 항목
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// 항목의 전체 경로 (`dir.join(name)`)
    pub path: PathBuf,
    /// 하위 디렉토리 여부
    pub is_dir: bool,
}

/// 로더가 사용하는 블로킹 파일시스템 연산
///
/// 모든 연산은 동기식입니다. 구현체는 `Send + Sync`여야 하며
/// CLI는 로더를 블로킹 스레드에서 실행합니다.
pub trait FileSystem: Send + Sync {
    /// 경로가 존재하는지 확인합니다.
    fn exists(&self, path: &Path) -> bool;

    /// 경로가 디렉토리인지 확인합니다.
    fn is_dir(&self, path: &Path) -> bool;

    /// 파일 크기(바이트)를 반환합니다.
    fn file_size(&self, path: &Path) -> io::Result<u64>;

    /// 파일 전체를 읽습니다.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// 디렉토리의 직계 항목을 경로 순으로 반환합니다.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>>;

    /// 표준 입력 전체를 읽습니다.
    fn read_stdin(&self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        io::stdin().lock().read_to_end(&mut buf)?;
        Ok(buf)
    }
}

/// 운영체제 파일시스템
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn file_size(&self, path: &Path) -> io::Result<u64> {
        Ok(std::fs::metadata(path)?.len())
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            let path = entry.path();
            // 심볼릭 링크는 대상 기준으로 판단
            let is_dir = path.is_dir();
            entries.push(DirEntry { path, is_dir });
        }
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }
}

#[derive(Debug, Clone)]
enum Node {
    File(Vec<u8>),
    Dir,
    Unreadable,
}

/// 메모리 기반 파일시스템
///
/// 파일을 추가하면 상위 디렉토리가 자동으로 등록됩니다.
///
/// ```
/// use std::path::Path;
/// use ironbom_sbom_loader::{FileSystem, MemoryFileSystem};
///
/// let fs = MemoryFileSystem::new()
///     .with_file("sboms/a.json", b"{}")
///     .with_stdin(b"piped");
/// assert!(fs.is_dir(Path::new("sboms")));
/// assert_eq!(fs.read_stdin().unwrap(), b"piped");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    nodes: BTreeMap<PathBuf, Node>,
    stdin: Vec<u8>,
}

impl MemoryFileSystem {
    /// 빈 파일시스템을 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 파일을 추가합니다.
    pub fn with_file(mut self, path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Self {
        let path = path.as_ref();
        self.register_parents(path);
        self.nodes
            .insert(path.to_path_buf(), Node::File(contents.as_ref().to_vec()));
        self
    }

    /// 빈 디렉토리를 추가합니다.
    pub fn with_dir(mut self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        self.register_parents(path);
        self.nodes.insert(path.to_path_buf(), Node::Dir);
        self
    }

    /// 존재하지만 읽을 수 없는 파일을 추가합니다.
    pub fn with_unreadable(mut self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        self.register_parents(path);
        self.nodes.insert(path.to_path_buf(), Node::Unreadable);
        self
    }

    /// 표준 입력 내용을 설정합니다.
    pub fn with_stdin(mut self, contents: impl AsRef<[u8]>) -> Self {
        self.stdin = contents.as_ref().to_vec();
        self
    }

    fn register_parents(&mut self, path: &Path) {
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.nodes.insert(ancestor.to_path_buf(), Node::Dir);
        }
    }

    fn not_found(path: &Path) -> io::Error {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("{}: no such file or directory", path.display()),
        )
    }
}

impl FileSystem for MemoryFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.nodes.contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.nodes.get(path), Some(Node::Dir))
    }

    fn file_size(&self, path: &Path) -> io::Result<u64> {
        match self.nodes.get(path) {
            Some(Node::File(bytes)) => Ok(bytes.len() as u64),
            Some(Node::Dir | Node::Unreadable) => Ok(0),
            None => Err(Self::not_found(path)),
        }
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        match self.nodes.get(path) {
            Some(Node::File(bytes)) => Ok(bytes.clone()),
            Some(Node::Dir) => Err(io::Error::new(
                io::ErrorKind::IsADirectory,
                format!("{}: is a directory", path.display()),
            )),
            Some(Node::Unreadable) => Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{}: permission denied", path.display()),
            )),
            None => Err(Self::not_found(path)),
        }
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        if !self.is_dir(path) {
            return Err(Self::not_found(path));
        }
        Ok(self
            .nodes
            .iter()
            .filter(|(p, _)| p.parent() == Some(path))
            .map(|(p, node)| DirEntry {
                path: p.clone(),
                is_dir: matches!(node, Node::Dir),
            })
            .collect())
    }

    fn read_stdin(&self) -> io::Result<Vec<u8>> {
        Ok(self.stdin.clone())
    }
}
