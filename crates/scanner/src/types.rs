//! 도메인 타입 -- 스캔 엔진 전용 데이터 구조
//!
//! 의존성 그래프, 해석된 아티팩트, 검색 조건, 스캔 결과 등
//! 스캔 파이프라인을 흐르는 핵심 타입을 정의합니다.

use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use depsniff_core::types::{Coordinate, Scope};

use crate::error::ScannerError;

/// 의존성 트리의 단일 노드
///
/// 같은 좌표가 트리의 여러 위치에 나타날 수 있으며(빌드 도구가 이미
/// 충돌 해소를 끝낸 상태), 각 위치는 별도 사용처로 모두 보존됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyNode {
    /// 좌표
    pub coordinate: Coordinate,
    /// 리포트에 기록된 스코프
    pub scope: Scope,
    /// 자식 노드 (리포트 순서 유지)
    pub children: Vec<DependencyNode>,
}

impl DependencyNode {
    /// 자식 없는 노드를 생성합니다.
    pub fn new(coordinate: Coordinate, scope: Scope) -> Self {
        Self {
            coordinate,
            scope,
            children: Vec::new(),
        }
    }

    /// 이 노드를 루트로 하는 서브트리의 노드 수를 반환합니다.
    pub fn subtree_size(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(DependencyNode::subtree_size)
            .sum::<usize>()
    }
}

/// 의존성 그래프 -- 리포트 전체를 파싱한 결과
///
/// 루트 노드 목록과, 루트에서 도달 가능한 모든 좌표의 평탄화된
/// 중복 제거 집합을 제공합니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyGraph {
    /// 루트 노드 목록 (멀티모듈 리포트는 루트가 여러 개)
    pub roots: Vec<DependencyNode>,
}

impl DependencyGraph {
    /// 루트 목록으로 그래프를 생성합니다.
    pub fn new(roots: Vec<DependencyNode>) -> Self {
        Self { roots }
    }

    /// 그래프 전체 노드 수를 반환합니다.
    pub fn node_count(&self) -> usize {
        self.roots.iter().map(DependencyNode::subtree_size).sum()
    }

    /// 도달 가능한 모든 좌표를 최초 등장 순서로, 중복 없이 반환합니다.
    ///
    /// `include_test_scope`가 false면 test/provided 스코프로 기록된
    /// 등장은 건너뜁니다. 같은 좌표가 compile 스코프로도 등장하면
    /// 그 등장을 통해 집합에 포함됩니다.
    pub fn coordinates(&self, include_test_scope: bool) -> Vec<Coordinate> {
        let mut seen = HashSet::new();
        let mut ordered = Vec::new();
        let mut stack: Vec<&DependencyNode> = self.roots.iter().rev().collect();

        while let Some(node) = stack.pop() {
            for child in node.children.iter().rev() {
                stack.push(child);
            }

            if !include_test_scope && matches!(node.scope, Scope::Test | Scope::Provided) {
                continue;
            }
            if seen.insert(node.coordinate.clone()) {
                ordered.push(node.coordinate.clone());
            }
        }

        ordered
    }
}

impl fmt::Display for DependencyGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DependencyGraph({} roots, {} nodes)",
            self.roots.len(),
            self.node_count(),
        )
    }
}

/// 리포트 파싱 경고 -- 복구된 파싱 문제의 사이드 채널
///
/// 예외가 아닌 진단 목록으로 반환되어 호출자가 제어 흐름 변경 없이
/// 확인할 수 있습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportWarning {
    /// 문제가 된 리포트 줄 번호 (1부터 시작)
    pub line: usize,
    /// 경고 사유
    pub reason: String,
}

impl fmt::Display for ReportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.reason)
    }
}

/// 좌표를 로컬 아카이브로 해석한 결과
///
/// 스캔 run마다 좌표당 하나 생성되며 run 기간 동안만 유지됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedArtifact {
    /// 해석 대상 좌표
    pub coordinate: Coordinate,
    /// 예상 또는 발견된 아카이브 경로
    pub path: PathBuf,
    /// 로컬 캐시에 실제 존재하는지 여부
    ///
    /// false는 에러가 아니라 "선언되었지만 로컬에 캐시되지 않음"이며
    /// 커버리지 공백으로 별도 보고됩니다.
    pub exists: bool,
}

impl fmt::Display for ResolvedArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}{}",
            self.coordinate,
            self.path.display(),
            if self.exists { "" } else { " (missing)" },
        )
    }
}

/// 검색 조건 -- 아티팩트 ID 또는 패키지명 접두사 중 정확히 하나
///
/// run 전체의 불변 입력입니다. 둘 다 지정하거나 둘 다 생략하는 것은
/// CLI 계층에서 거부되지만, 엔진도 빈 값을 방어적으로 거부합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchCriterion {
    /// Maven 좌표의 artifact ID (예: `slf4j-api`)
    Artifact(String),
    /// 패키지명 접두사 (예: `org.slf4j`)
    PackagePrefix(String),
}

impl SearchCriterion {
    /// 조건 값이 비어 있지 않은지 검증합니다.
    pub fn validate(&self) -> Result<(), ScannerError> {
        let value = match self {
            Self::Artifact(v) | Self::PackagePrefix(v) => v,
        };
        if value.trim().is_empty() {
            return Err(ScannerError::Config {
                field: "criterion".to_owned(),
                reason: "search criterion must not be empty".to_owned(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for SearchCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Artifact(v) => write!(f, "artifact '{v}'"),
            Self::PackagePrefix(v) => write!(f, "package '{v}'"),
        }
    }
}

/// 하나의 아카이브에서 발견된 매치 결과
///
/// 매치가 1건 이상인 아카이브당 하나 생성됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// 매치가 발견된 아카이브
    pub artifact: ResolvedArtifact,
    /// 매치된 내부 엔트리 경로 (아카이브 선언 순서)
    pub matched_entries: Vec<String>,
}

/// 아카이브 하나의 스캔 실패 기록
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanFailure {
    /// 실패한 아카이브
    pub artifact: ResolvedArtifact,
    /// 실패 사유
    pub reason: String,
}

/// 스캔 run 전체의 집계 결과
///
/// 세 출력 목록(매치, 미해석 좌표, 스캔 실패)은 모두 스캔 순서를
/// 유지하며, 삽입 후 변경되지 않습니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanReport {
    /// 매치가 발견된 아카이브 목록 (0건 매치는 제외)
    pub matches: Vec<MatchResult>,
    /// 선언되었지만 로컬에서 찾지 못한 좌표 목록
    pub unresolved: Vec<Coordinate>,
    /// 아카이브 스캔 실패 목록
    pub failures: Vec<ScanFailure>,
    /// 리포트 파싱 경고 목록
    pub warnings: Vec<ReportWarning>,
}

impl ScanReport {
    /// 매치된 아카이브 수를 반환합니다.
    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    /// 매치, 미해석, 실패가 모두 없는지 반환합니다.
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty() && self.unresolved.is_empty() && self.failures.is_empty()
    }
}
