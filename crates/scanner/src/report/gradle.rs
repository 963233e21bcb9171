//! Gradle 텍스트 의존성 트리 파서
//!
//! [`GradleTextParser`]는 `gradle dependencies`가 출력하는 들여쓰기
//! 글리프 트리를 파싱합니다. 각 줄의 깊이는 선행 글리프(`+--- `,
//! `\--- `, `|    `) 블록 폭으로 계산되며, 꼬리 토큰은
//! `group:artifact:version[:scope]` 형식의 좌표 문자열입니다.
//!
//! # 형식 예시
//!
//! ```text
//! runtimeClasspath - Runtime classpath of source set 'main'.
//! +--- org.slf4j:slf4j-api:2.0.16
//! \--- com.example:lib:1.0.0
//!      \--- org.slf4j:slf4j-api:1.7.30 -> 2.0.16 (*)
//! ```
//!
//! 충돌 해소로 버전이 바뀐 줄(`1.7.30 -> 2.0.16`)은 최종 버전을
//! 사용하고, `(*)` `(c)` 같은 주석 접미사는 제거합니다.
//!
//! # 복구 정책
//!
//! 깊이가 한 번에 두 단계 이상 증가하거나 좌표 토큰이 파싱되지 않는
//! 줄은 경고로 기록하고 그 줄의 서브트리를 건너뜁니다. 트리 줄이
//! 하나도 없으면 리포트 전체가 치명적 파싱 실패입니다.

use depsniff_core::types::{Coordinate, Scope};

use crate::error::ScannerError;
use crate::report::{ReportFormat, ReportParser};
use crate::types::{DependencyGraph, DependencyNode, ReportWarning};

/// Gradle 텍스트 트리 파서
pub struct GradleTextParser;

/// 글리프 블록 폭 (`+--- `, `|    ` 모두 5자)
const GLYPH_BLOCK: usize = 5;

impl ReportParser for GradleTextParser {
    fn format(&self) -> ReportFormat {
        ReportFormat::GradleText
    }

    fn parse(
        &self,
        content: &str,
    ) -> Result<(DependencyGraph, Vec<ReportWarning>), ScannerError> {
        let mut roots: Vec<DependencyNode> = Vec::new();
        let mut warnings: Vec<ReportWarning> = Vec::new();
        // 마지막으로 붙인 노드까지의 인덱스 경로 (길이 == 그 노드의 깊이)
        let mut path: Vec<usize> = Vec::new();
        // Some(d)면 깊이 d보다 깊은 줄(건너뛴 서브트리)을 무시
        let mut skip_deeper: Option<usize> = None;

        for (idx, line) in content.lines().enumerate() {
            let line_no = idx + 1;

            // 트리 커넥터가 없는 줄은 헤더/빈 줄 등 장식이므로 무시
            let Some(pos) = connector_position(line) else {
                continue;
            };

            if pos % GLYPH_BLOCK != 0 {
                warnings.push(ReportWarning {
                    line: line_no,
                    reason: format!("misaligned tree glyph at column {pos}"),
                });
                skip_deeper = Some(pos / GLYPH_BLOCK + 1);
                continue;
            }
            let depth = pos / GLYPH_BLOCK + 1;

            if let Some(limit) = skip_deeper {
                if depth > limit {
                    continue;
                }
                skip_deeper = None;
            }

            let token = &line[pos + GLYPH_BLOCK..];
            let Some((coordinate, scope)) = parse_tree_token(token) else {
                warnings.push(ReportWarning {
                    line: line_no,
                    reason: format!("unparseable coordinate token '{}'", token.trim()),
                });
                skip_deeper = Some(depth);
                continue;
            };

            if depth > path.len() + 1 {
                warnings.push(ReportWarning {
                    line: line_no,
                    reason: format!(
                        "depth jump from {} to {depth}, skipping subtree",
                        path.len()
                    ),
                });
                skip_deeper = Some(depth);
                continue;
            }

            path.truncate(depth - 1);
            let siblings = children_at(&mut roots, &path);
            siblings.push(DependencyNode::new(coordinate, scope));
            path.push(siblings.len() - 1);
        }

        if roots.is_empty() {
            return Err(ScannerError::MalformedReport {
                reason: "no dependency tree lines found in report".to_owned(),
            });
        }

        Ok((DependencyGraph::new(roots), warnings))
    }
}

/// 줄에서 트리 커넥터(`+--- ` 또는 `\--- `)의 시작 위치를 찾습니다.
fn connector_position(line: &str) -> Option<usize> {
    let plus = line.find("+--- ");
    let back = line.find("\\--- ");
    match (plus, back) {
        (Some(p), Some(b)) => Some(p.min(b)),
        (Some(p), None) => Some(p),
        (None, Some(b)) => Some(b),
        (None, None) => None,
    }
}

/// 인덱스 경로를 따라 내려가 해당 부모의 자식 목록을 반환합니다.
fn children_at<'a>(
    roots: &'a mut Vec<DependencyNode>,
    path: &[usize],
) -> &'a mut Vec<DependencyNode> {
    let mut current = roots;
    for &i in path {
        current = &mut current[i].children;
    }
    current
}

/// 좌표 토큰을 파싱합니다.
///
/// 주석 접미사(`(*)`, `(c)`, `(n)`)와 충돌 해소 표기(`1.0 -> 1.2`)를
/// 정리한 뒤 콜론으로 분리합니다. 세그먼트가 3개 미만이거나 비어
/// 있으면 `None`을 반환합니다.
fn parse_tree_token(token: &str) -> Option<(Coordinate, Scope)> {
    let (mut coordinate, scope) = Coordinate::parse(strip_annotation(token))?;

    // 충돌 해소: "1.7.30 -> 2.0.16"은 최종 버전을 취한다
    if let Some(pos) = coordinate.version.find(" -> ") {
        let version = coordinate.version[pos + 4..].trim();
        if version.is_empty() {
            return None;
        }
        coordinate.version = version.to_owned();
    }

    Some((coordinate, scope))
}

/// 꼬리 주석(`(*)` 등)과 `FAILED` 표기를 제거합니다.
fn strip_annotation(token: &str) -> &str {
    let mut t = token.trim();
    if t.ends_with(')') {
        if let Some(pos) = t.rfind(" (") {
            t = t[..pos].trim_end();
        }
    }
    if let Some(stripped) = t.strip_suffix(" FAILED") {
        t = stripped.trim_end();
    }
    t
}
