//! 스캔 코디네이터 -- 파싱, 해석, 병렬 스캔, 집계
//!
//! [`DependencyScanner`]는 run 하나의 전체 파이프라인을 실행합니다.
//!
//! ```text
//! 리포트 텍스트
//!     |  (report 파서)
//! DependencyGraph -> 평탄화 좌표 목록
//!     |  (resolver)
//! ResolvedArtifact 목록 (exists 여부 포함)
//!     |  (워커 풀: Semaphore + spawn_blocking)
//! 아카이브별 매치/실패
//!     |  (디스패치 순서로 정렬)
//! ScanReport
//! ```
//!
//! # 동시성 모델
//!
//! 아카이브 스캔은 블로킹 I/O이므로 아카이브마다 `spawn_blocking`
//! 태스크를 만들고, [`Semaphore`] 퍼밋으로 동시 실행 수를
//! `max_workers`로 제한합니다. 개별 아카이브의 실패는 그 아카이브의
//! 실패 항목으로만 남고 나머지 태스크는 계속됩니다. 워커 join 자체가
//! 실패하면 [`CancellationToken`]으로 대기 중인 태스크를 중단하고
//! run 전체를 실패시킵니다.
//!
//! 결과는 디스패치 인덱스로 정렬되므로 완료 순서와 무관하게 같은
//! 입력이면 같은 리포트가 나옵니다.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::archive::{ArchiveInspector, EntrySelection};
use crate::config::ScannerConfig;
use crate::error::ScannerError;
use crate::matcher;
use crate::report::parser_for;
use crate::resolver::RepositoryResolver;
use crate::types::{MatchResult, ResolvedArtifact, ScanFailure, ScanReport, SearchCriterion};

/// 스캔 run의 단계
///
/// 단계는 앞으로만 진행하며 되돌아가지 않습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    /// 생성 직후
    Initialized,
    /// 리포트 파싱과 좌표 해석 중
    Resolving,
    /// 아카이브 병렬 스캔 중
    Scanning,
    /// 결과 집계 완료
    Aggregated,
    /// 리포트 반환 완료
    Reported,
}

/// 의존성 스캔 코디네이터
///
/// run 하나당 하나 생성하며, [`scan`](Self::scan)은 한 번만 실행할 수
/// 있습니다.
pub struct DependencyScanner {
    config: ScannerConfig,
    criterion: SearchCriterion,
    phase: ScanPhase,
    cancel: CancellationToken,
    archives_scanned: AtomicU64,
    entries_matched: AtomicU64,
}

impl DependencyScanner {
    /// 빌더를 반환합니다.
    pub fn builder() -> DependencyScannerBuilder {
        DependencyScannerBuilder::new()
    }

    /// 현재 단계를 반환합니다.
    pub fn phase(&self) -> ScanPhase {
        self.phase
    }

    /// 지금까지 스캔한 아카이브 수를 반환합니다.
    pub fn archives_scanned(&self) -> u64 {
        self.archives_scanned.load(Ordering::Relaxed)
    }

    /// 지금까지 매치된 엔트리 수를 반환합니다.
    pub fn entries_matched(&self) -> u64 {
        self.entries_matched.load(Ordering::Relaxed)
    }

    /// 리포트 텍스트에 대해 전체 스캔 run을 실행합니다.
    ///
    /// # Errors
    ///
    /// - `ScannerError::MalformedReport`: 리포트 파싱 실패 (치명적)
    /// - `ScannerError::Config`: scan이 이미 실행됨
    /// - `ScannerError::TaskJoin`: 워커 join 실패
    ///
    /// 개별 아카이브의 실패와 미해석 좌표는 에러가 아니라 반환된
    /// [`ScanReport`]의 항목입니다.
    pub async fn scan(&mut self, report_content: &str) -> Result<ScanReport, ScannerError> {
        if self.phase != ScanPhase::Initialized {
            return Err(ScannerError::Config {
                field: "phase".to_owned(),
                reason: "scan already executed for this scanner".to_owned(),
            });
        }

        self.phase = ScanPhase::Resolving;
        let parser = parser_for(self.config.report_format);
        let (graph, warnings) = parser.parse(report_content)?;
        let coordinates = graph.coordinates(self.config.include_test_scope);
        debug!(
            nodes = graph.node_count(),
            unique = coordinates.len(),
            "dependency report parsed"
        );

        let resolver = RepositoryResolver::from_config(&self.config);
        let mut existing = Vec::new();
        let mut unresolved = Vec::new();
        for coordinate in coordinates {
            let artifact = resolver.resolve(&coordinate);
            if artifact.exists {
                existing.push(artifact);
            } else {
                unresolved.push(artifact.coordinate);
            }
        }

        self.phase = ScanPhase::Scanning;
        let total = existing.len();
        let outcomes = self.scan_archives(existing).await?;

        self.phase = ScanPhase::Aggregated;
        let mut report = ScanReport {
            unresolved,
            warnings,
            ..ScanReport::default()
        };
        for (_, artifact, outcome) in outcomes {
            self.archives_scanned.fetch_add(1, Ordering::Relaxed);
            match outcome {
                Ok(matched_entries) => {
                    self.entries_matched
                        .fetch_add(matched_entries.len() as u64, Ordering::Relaxed);
                    if !matched_entries.is_empty() {
                        report.matches.push(MatchResult {
                            artifact,
                            matched_entries,
                        });
                    }
                }
                Err(reason) => {
                    warn!(path = %artifact.path.display(), reason = %reason, "archive scan failed");
                    report.failures.push(ScanFailure { artifact, reason });
                }
            }
        }

        info!(
            scanned = total,
            matched = report.matches.len(),
            failed = report.failures.len(),
            unresolved = report.unresolved.len(),
            "scan complete"
        );
        self.phase = ScanPhase::Reported;
        Ok(report)
    }

    /// 해석된 아카이브들을 워커 풀에서 스캔합니다.
    ///
    /// 반환 목록은 디스패치 인덱스로 정렬됩니다.
    async fn scan_archives(
        &self,
        artifacts: Vec<ResolvedArtifact>,
    ) -> Result<Vec<ArchiveOutcome>, ScannerError> {
        let semaphore = Arc::new(Semaphore::new(self.config.max_workers));
        let cancel = self.cancel.clone();
        let mut join_set = JoinSet::new();

        for (index, artifact) in artifacts.into_iter().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            let token = cancel.clone();
            let criterion = self.criterion.clone();

            join_set.spawn(async move {
                let permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        return (index, artifact, Err("worker pool closed".to_owned()));
                    }
                };
                if token.is_cancelled() {
                    return (index, artifact, Err("scan cancelled".to_owned()));
                }

                let fallback = artifact.clone();
                let joined = tokio::task::spawn_blocking(move || {
                    let outcome = scan_one(&artifact, &criterion, &token);
                    (artifact, outcome)
                })
                .await;
                drop(permit);

                match joined {
                    Ok((artifact, outcome)) => (index, artifact, outcome),
                    Err(e) => (index, fallback, Err(format!("worker panicked: {e}"))),
                }
            });
        }

        let mut outcomes: Vec<ArchiveOutcome> = Vec::new();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    cancel.cancel();
                    return Err(ScannerError::TaskJoin(e.to_string()));
                }
            }
        }

        outcomes.sort_by_key(|(index, ..)| *index);
        Ok(outcomes)
    }
}

/// (디스패치 인덱스, 아카이브, 매치 경로 목록 또는 실패 사유)
type ArchiveOutcome = (usize, ResolvedArtifact, Result<Vec<String>, String>);

/// 아카이브 하나를 스캔하여 매치된 엔트리 경로를 반환합니다.
///
/// 취소 토큰은 엔트리 경계마다 확인하며, 취소되면 남은 엔트리를 읽지
/// 않고 중단합니다.
fn scan_one(
    artifact: &ResolvedArtifact,
    criterion: &SearchCriterion,
    cancel: &CancellationToken,
) -> Result<Vec<String>, String> {
    let mut inspector = ArchiveInspector::open(&artifact.path).map_err(|e| e.to_string())?;
    let mut matched = Vec::new();
    for entry in inspector.entries(EntrySelection::for_criterion(criterion)) {
        if cancel.is_cancelled() {
            return Err("scan cancelled".to_owned());
        }
        let entry = entry.map_err(|e| e.to_string())?;
        if matcher::matches(criterion, &entry) {
            matched.push(entry.path);
        }
    }
    Ok(matched)
}

/// [`DependencyScanner`] 빌더
pub struct DependencyScannerBuilder {
    config: ScannerConfig,
    criterion: Option<SearchCriterion>,
    cancel: Option<CancellationToken>,
}

impl DependencyScannerBuilder {
    /// 기본 설정을 가진 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self {
            config: ScannerConfig::default(),
            criterion: None,
            cancel: None,
        }
    }

    /// 스캔 설정을 지정합니다.
    pub fn config(mut self, config: ScannerConfig) -> Self {
        self.config = config;
        self
    }

    /// 검색 조건을 지정합니다.
    pub fn criterion(mut self, criterion: SearchCriterion) -> Self {
        self.criterion = Some(criterion);
        self
    }

    /// 외부 취소 토큰을 지정합니다.
    ///
    /// 지정하지 않으면 run 전용 토큰을 내부에서 생성합니다.
    pub fn cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// 설정과 조건을 검증하고 스캐너를 빌드합니다.
    ///
    /// # Errors
    ///
    /// 설정 검증 실패, 조건 미지정 또는 빈 조건 시
    /// `ScannerError::Config` 반환
    pub fn build(self) -> Result<DependencyScanner, ScannerError> {
        self.config.validate()?;
        let criterion = self.criterion.ok_or_else(|| ScannerError::Config {
            field: "criterion".to_owned(),
            reason: "search criterion required".to_owned(),
        })?;
        criterion.validate()?;

        Ok(DependencyScanner {
            config: self.config,
            criterion,
            phase: ScanPhase::Initialized,
            cancel: self.cancel.unwrap_or_default(),
            archives_scanned: AtomicU64::new(0),
            entries_matched: AtomicU64::new(0),
        })
    }
}

impl Default for DependencyScannerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
