//! 경로 해석기 -- 입력 인자를 읽고 형식 탐지, 디코딩, 병합까지 수행
//!
//! [`SbomLoader`]는 입력 목록을 순서대로 처리합니다.
//!
//! ```text
//! inputs --> (stdin | directory | file) --> bytes --> ScannedFile (sha256)
//!                                             |
//!                                       FormatDetector --> SbomDecoder --> ExtractedDocument
//!                                                                               |
//!                                                          aggregate::fold_into (입력 단위)
//! ```
//!
//! # 실패 처리
//!
//! 개별 파일의 읽기, 형식 탐지, 디코딩 실패는 경고 로그와 [`LoadFailure`]로 기록하고
//! 나머지 입력을 계속 처리합니다. 단, 마지막 입력이 단일 파일(또는 표준 입력)이고
//! 실패한 경우에는 그 에러를 반환합니다. 디렉토리 내부의 실패는 반환하지 않습니다.

use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use ironbom_core::metrics as m;

use crate::aggregate;
use crate::config::SbomLoaderConfig;
use crate::error::SbomLoaderError;
use crate::format::FormatDetector;
use crate::fs::{FileSystem, OsFileSystem};
use crate::ignore;
use crate::suppression;
use crate::types::{ExtractedDocument, LoadFailure, LoadOutcome, LoadOutput, ScannedFile};

/// 표준 입력을 뜻하는 입력 인자
pub const STDIN_MARKER: &str = "-";

/// SBOM 로더
///
/// 파일시스템은 생성 시 주입되며, 로더 자체는 상태를 갖지 않습니다.
/// 모든 I/O는 블로킹입니다.
pub struct SbomLoader<F: FileSystem = OsFileSystem> {
    config: SbomLoaderConfig,
    fs: F,
    detector: FormatDetector,
}

impl SbomLoader<OsFileSystem> {
    /// 운영체제 파일시스템을 사용하는 로더를 생성합니다.
    pub fn new(config: SbomLoaderConfig) -> Self {
        Self::with_filesystem(config, OsFileSystem)
    }
}

impl<F: FileSystem> SbomLoader<F> {
    /// 지정한 파일시스템을 사용하는 로더를 생성합니다.
    pub fn with_filesystem(config: SbomLoaderConfig, fs: F) -> Self {
        Self {
            config,
            fs,
            detector: FormatDetector::new(),
        }
    }

    /// 형식 탐지기를 교체합니다.
    pub fn with_detector(mut self, detector: FormatDetector) -> Self {
        self.detector = detector;
        self
    }

    /// 로더 설정을 반환합니다.
    pub fn config(&self) -> &SbomLoaderConfig {
        &self.config
    }

    /// 주입된 파일시스템을 반환합니다.
    pub fn filesystem(&self) -> &F {
        &self.fs
    }

    /// 입력 목록을 순서대로 읽어 purl과 라이선스를 추출합니다.
    ///
    /// 각 입력은 표준 입력 표시(`-`), 디렉토리, 단일 파일 중 하나입니다.
    /// 디렉토리는 직계 파일만 처리하고 하위 디렉토리는 건너뜁니다.
    /// 각 최상위 입력을 처리한 직후 누적 결과의 중복을 제거합니다.
    ///
    /// # Errors
    ///
    /// 마지막 입력이 단일 파일이고 실패한 경우 그 에러를 반환합니다.
    /// 이때 앞선 입력에서 추출한 결과는 버려지므로, 부분 결과가 필요하면
    /// [`load_partial`](Self::load_partial)을 사용합니다.
    pub fn load<S: AsRef<str>>(&self, inputs: &[S]) -> Result<LoadOutput, SbomLoaderError> {
        self.load_partial(inputs).into_result()
    }

    /// [`load`](Self::load)와 같지만, 마지막 단일 파일 입력이 실패해도
    /// 그때까지 추출한 결과를 에러와 함께 돌려줍니다.
    pub fn load_partial<S: AsRef<str>>(&self, inputs: &[S]) -> LoadOutcome {
        let mut output = LoadOutput::default();
        let mut surfaced = None;

        for (index, input) in inputs.iter().enumerate() {
            let input = input.as_ref();
            let is_last = index + 1 == inputs.len();
            let mut documents = Vec::new();

            if input != STDIN_MARKER && self.fs.is_dir(Path::new(input)) {
                self.load_directory(input, &mut output, &mut documents);
            } else {
                match self.load_file(input, &mut output) {
                    Ok(document) => documents.push(document),
                    Err(e) => {
                        record_failure(&mut output, input, &e);
                        if is_last {
                            surfaced = Some(e);
                        }
                    }
                }
            }

            aggregate::fold_into(&mut output, documents);
        }

        info!(
            inputs = inputs.len(),
            files = output.files.len(),
            purls = output.purls.len(),
            licenses = output.licenses.len(),
            failures = output.failures.len(),
            "sbom load completed"
        );

        LoadOutcome { output, surfaced }
    }

    /// 설정된 무시 목록을 로드합니다. 설정되지 않았으면 빈 목록입니다.
    pub fn load_ignore_list(&self) -> Result<Vec<String>, SbomLoaderError> {
        ignore::load_ignore_list(&self.fs, self.config.ignore_file.as_deref().unwrap_or(""))
    }

    /// 설정된 억제 규칙 문서에서 현재 활성 취약점 ID를 로드합니다.
    pub fn load_suppressions(&self) -> Result<Vec<String>, SbomLoaderError> {
        self.load_suppressions_at(Utc::now())
    }

    /// 설정된 억제 규칙 문서에서 `now` 기준 활성 취약점 ID를 로드합니다.
    pub fn load_suppressions_at(&self, now: DateTime<Utc>) -> Result<Vec<String>, SbomLoaderError> {
        suppression::load_suppression_document_at(
            &self.fs,
            self.config.suppression_file.as_deref().unwrap_or(""),
            now,
        )
    }

    /// 디렉토리의 직계 파일을 처리합니다. 개별 실패는 기록만 합니다.
    fn load_directory(
        &self,
        dir: &str,
        output: &mut LoadOutput,
        documents: &mut Vec<ExtractedDocument>,
    ) {
        info!(dir, "loading sbom directory");

        let entries = match self.fs.read_dir(Path::new(dir)) {
            Ok(entries) => entries,
            Err(source) => {
                let err = SbomLoaderError::Io {
                    path: dir.to_owned(),
                    source,
                };
                record_failure(output, dir, &err);
                return;
            }
        };

        for entry in entries {
            let path = entry.path.display().to_string();
            if entry.is_dir {
                debug!(path = %path, "skipping subdirectory");
                continue;
            }

            match self.load_file(&path, output) {
                Ok(document) => documents.push(document),
                Err(e) => record_failure(output, &path, &e),
            }
        }
    }

    /// 파일 하나를 읽고 해시를 기록한 뒤 디코딩합니다.
    ///
    /// 읽기에 성공하면 디코딩 결과와 관계없이 [`ScannedFile`]을 남깁니다.
    fn load_file(
        &self,
        path: &str,
        output: &mut LoadOutput,
    ) -> Result<ExtractedDocument, SbomLoaderError> {
        let bytes = self.read_input(path)?;

        output.files.push(ScannedFile::from_bytes(path, &bytes));
        metrics::counter!(m::SBOM_LOADER_FILES_READ_TOTAL).increment(1);

        let (format, document) = self.detector.decode(&bytes, path)?;
        metrics::counter!(m::SBOM_LOADER_DOCUMENTS_DECODED_TOTAL, m::LABEL_FORMAT => format.name())
            .increment(1);
        debug!(
            path,
            format = %format,
            purls = document.purls.len(),
            licenses = document.licenses.len(),
            "sbom decoded"
        );

        Ok(document)
    }

    /// 입력 바이트를 읽습니다. 크기 제한을 넘으면 읽지 않습니다.
    fn read_input(&self, path: &str) -> Result<Vec<u8>, SbomLoaderError> {
        let max = self.config.max_file_size;

        if path == STDIN_MARKER {
            info!("reading from stdin");
            let bytes = self.fs.read_stdin().map_err(|source| SbomLoaderError::Io {
                path: path.to_owned(),
                source,
            })?;
            // 표준 입력은 크기를 미리 알 수 없으므로 읽은 뒤 확인
            if bytes.len() > max {
                return Err(SbomLoaderError::FileTooBig {
                    path: path.to_owned(),
                    size: bytes.len(),
                    max,
                });
            }
            return Ok(bytes);
        }

        debug!(path, "reading file");
        let file = Path::new(path);
        let size = self
            .fs
            .file_size(file)
            .map_err(|source| SbomLoaderError::Io {
                path: path.to_owned(),
                source,
            })?;
        let size = usize::try_from(size).unwrap_or(usize::MAX);
        if size > max {
            return Err(SbomLoaderError::FileTooBig {
                path: path.to_owned(),
                size,
                max,
            });
        }

        self.fs.read(file).map_err(|source| SbomLoaderError::Io {
            path: path.to_owned(),
            source,
        })
    }
}

/// 건너뛴 입력을 로그, 메트릭, 실패 목록에 기록합니다.
fn record_failure(output: &mut LoadOutput, path: &str, err: &SbomLoaderError) {
    warn!(path, error = %err, "skipping sbom input");
    metrics::counter!(m::SBOM_LOADER_FILES_FAILED_TOTAL, m::LABEL_STAGE => err.stage())
        .increment(1);
    output.failures.push(LoadFailure {
        path: path.to_owned(),
        reason: err.to_string(),
    });
}
