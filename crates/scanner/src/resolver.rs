//! 저장소 리졸버 -- 좌표를 로컬 아카이브 경로로 해석
//!
//! [`RepositoryResolver`]는 하나의 [`Coordinate`]를 두 가지 로컬 저장소
//! 레이아웃에서 차례로 찾습니다.
//!
//! - **계층형** (Maven `~/.m2/repository`):
//!   `home/그룹.을.디렉토리로/artifact/version/artifact-version.jar`.
//!   결정적 경로이므로 탐색이 필요 없습니다.
//! - **해시 디렉토리** (Gradle `files-2.1` 캐시):
//!   `home/group/artifact/version/<sha1>/artifact-version.jar`. 해시값을
//!   미리 알 수 없으므로 버전 디렉토리 하위를 열거하여 대상 파일명을
//!   가진 하위 디렉토리를 찾습니다.
//!
//! 두 레이아웃 모두에서 찾지 못하면 `exists=false`인
//! [`ResolvedArtifact`]를 반환합니다. 이는 파싱 에러가 아니라 "선언은
//! 되었지만 로컬에 캐시되지 않음"이며 결과 리포트에 별도 항목으로
//! 보고됩니다.
//!
//! 저장소 루트는 항상 생성자에서 명시적으로 주입됩니다. 전역 상태나
//! 환경변수를 읽지 않으므로 테스트는 임시 디렉토리를 그대로 넘기면
//! 됩니다.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, warn};

use depsniff_core::types::Coordinate;

use crate::config::ScannerConfig;
use crate::types::ResolvedArtifact;

/// 로컬 저장소 레이아웃
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryLayout {
    /// Maven 계층형 레이아웃
    Hierarchical,
    /// Gradle 해시 디렉토리 레이아웃
    FlatHash,
}

/// 저장소 리졸버
///
/// run 시작 시 한 번 생성되며, 이후 좌표마다 [`resolve`](Self::resolve)가
/// 호출됩니다. 같은 run 안에서 같은 좌표는 항상 같은 경로로 해석됩니다.
pub struct RepositoryResolver {
    /// 계층형 레이아웃 루트 (없으면 해당 레이아웃 제외)
    maven_home: Option<PathBuf>,
    /// 해시 디렉토리 레이아웃 루트 (없으면 해당 레이아웃 제외)
    gradle_home: Option<PathBuf>,
}

impl RepositoryResolver {
    /// 명시적 저장소 루트로 리졸버를 생성합니다.
    pub fn new(maven_home: Option<PathBuf>, gradle_home: Option<PathBuf>) -> Self {
        Self {
            maven_home,
            gradle_home,
        }
    }

    /// 스캔 설정에서 리졸버를 생성합니다. 빈 경로는 제외됩니다.
    pub fn from_config(config: &ScannerConfig) -> Self {
        let non_empty = |s: &str| {
            if s.is_empty() {
                None
            } else {
                Some(PathBuf::from(s))
            }
        };
        Self::new(non_empty(&config.maven_home), non_empty(&config.gradle_home))
    }

    /// 좌표를 로컬 아카이브로 해석합니다.
    ///
    /// 계층형 레이아웃을 먼저, 해시 디렉토리 레이아웃을 그 다음에
    /// 시도합니다. 둘 다 실패하면 `exists=false`와 함께 계층형 기준
    /// 기대 경로를 담아 반환합니다.
    pub fn resolve(&self, coordinate: &Coordinate) -> ResolvedArtifact {
        for layout in [RepositoryLayout::Hierarchical, RepositoryLayout::FlatHash] {
            if let Some(path) = self.resolve_in(coordinate, layout) {
                debug!(coordinate = %coordinate, path = %path.display(), "artifact resolved");
                return ResolvedArtifact {
                    coordinate: coordinate.clone(),
                    path,
                    exists: true,
                };
            }
        }

        debug!(coordinate = %coordinate, "artifact not found in any local repository");
        ResolvedArtifact {
            coordinate: coordinate.clone(),
            path: self.expected_path(coordinate),
            exists: false,
        }
    }

    /// 단일 레이아웃에서만 해석을 시도합니다.
    pub fn resolve_in(
        &self,
        coordinate: &Coordinate,
        layout: RepositoryLayout,
    ) -> Option<PathBuf> {
        match layout {
            RepositoryLayout::Hierarchical => {
                let home = self.maven_home.as_ref()?;
                let path = hierarchical_path(home, coordinate);
                path.is_file().then_some(path)
            }
            RepositoryLayout::FlatHash => {
                let home = self.gradle_home.as_ref()?;
                resolve_flat_hash(home, coordinate)
            }
        }
    }

    /// 미해석 좌표에 보고할 기대 경로를 계산합니다.
    fn expected_path(&self, coordinate: &Coordinate) -> PathBuf {
        if let Some(home) = &self.maven_home {
            return hierarchical_path(home, coordinate);
        }
        if let Some(home) = &self.gradle_home {
            return flat_hash_version_dir(home, coordinate).join(coordinate.archive_file_name());
        }
        PathBuf::from(coordinate.archive_file_name())
    }
}

/// 계층형 레이아웃의 결정적 아카이브 경로를 계산합니다.
fn hierarchical_path(home: &Path, coordinate: &Coordinate) -> PathBuf {
    let mut path = home.to_path_buf();
    for segment in coordinate.group.split('.') {
        path.push(segment);
    }
    path.push(&coordinate.artifact);
    path.push(&coordinate.version);
    path.push(coordinate.archive_file_name());
    path
}

/// 해시 디렉토리 레이아웃의 버전 디렉토리를 계산합니다.
///
/// Gradle 캐시는 그룹을 디렉토리로 쪼개지 않고 그대로 사용합니다.
fn flat_hash_version_dir(home: &Path, coordinate: &Coordinate) -> PathBuf {
    home.join(&coordinate.group)
        .join(&coordinate.artifact)
        .join(&coordinate.version)
}

/// 해시 디렉토리 레이아웃에서 아카이브를 찾습니다.
///
/// 버전 디렉토리 하위의 해시 디렉토리들을 열거하여 대상 파일명을 가진
/// 후보를 모으고, 여러 개면(오래된 캐시 잔재) 수정 시각이 가장 최근인
/// 것을 선택하며 경고를 남깁니다.
fn resolve_flat_hash(home: &Path, coordinate: &Coordinate) -> Option<PathBuf> {
    let version_dir = flat_hash_version_dir(home, coordinate);
    let entries = std::fs::read_dir(&version_dir).ok()?;
    let file_name = coordinate.archive_file_name();

    let mut candidates: Vec<(PathBuf, SystemTime)> = Vec::new();
    for entry in entries.flatten() {
        let candidate = entry.path().join(&file_name);
        if let Ok(meta) = candidate.metadata() {
            if meta.is_file() {
                let mtime = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
                candidates.push((candidate, mtime));
            }
        }
    }

    if candidates.len() > 1 {
        warn!(
            coordinate = %coordinate,
            candidates = candidates.len(),
            "multiple hash directories contain the artifact, picking newest"
        );
    }

    candidates
        .into_iter()
        .max_by_key(|(_, mtime)| *mtime)
        .map(|(path, _)| path)
}
