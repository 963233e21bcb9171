//! Maven JSON 의존성 트리 파서
//!
//! [`MavenJsonParser`]는 `mvn dependency:tree -DoutputType=json`이
//! 출력하는 중첩 JSON 트리를 구조적으로 순회하여
//! [`DependencyGraph`]를 생성합니다. 문자열 휴리스틱은 사용하지 않습니다.
//!
//! # 형식 예시
//!
//! ```json
//! {
//!   "groupId": "com.example", "artifactId": "app", "version": "1.0.0",
//!   "scope": "compile",
//!   "children": [
//!     { "groupId": "org.slf4j", "artifactId": "slf4j-api", "version": "2.0.16",
//!       "scope": "compile", "children": [] }
//!   ]
//! }
//! ```
//!
//! 멀티모듈 빌드는 최상위가 노드 배열일 수 있으며 두 형태 모두
//! 허용됩니다.

use serde::Deserialize;

use depsniff_core::types::{Coordinate, Scope};

use crate::error::ScannerError;
use crate::report::{ReportFormat, ReportParser};
use crate::types::{DependencyGraph, DependencyNode, ReportWarning};

/// Maven JSON 트리 파서
pub struct MavenJsonParser;

/// JSON 트리 노드 (파싱용)
#[derive(Deserialize)]
struct MavenTreeNode {
    #[serde(rename = "groupId")]
    group_id: String,
    #[serde(rename = "artifactId")]
    artifact_id: String,
    version: String,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default)]
    children: Vec<MavenTreeNode>,
}

/// 최상위가 단일 객체 또는 배열 양쪽 모두 올 수 있습니다.
#[derive(Deserialize)]
#[serde(untagged)]
enum MavenReport {
    Many(Vec<MavenTreeNode>),
    One(Box<MavenTreeNode>),
}

impl MavenTreeNode {
    fn into_node(self) -> DependencyNode {
        let scope = self
            .scope
            .as_deref()
            .map(Scope::from_str_loose)
            .unwrap_or(Scope::Other);
        DependencyNode {
            coordinate: Coordinate::new(self.group_id, self.artifact_id, self.version),
            scope,
            children: self
                .children
                .into_iter()
                .map(MavenTreeNode::into_node)
                .collect(),
        }
    }
}

impl ReportParser for MavenJsonParser {
    fn format(&self) -> ReportFormat {
        ReportFormat::MavenJson
    }

    fn parse(
        &self,
        content: &str,
    ) -> Result<(DependencyGraph, Vec<ReportWarning>), ScannerError> {
        let report: MavenReport =
            serde_json::from_str(content).map_err(|e| ScannerError::MalformedReport {
                reason: format!("invalid maven json tree: {e}"),
            })?;

        let roots = match report {
            MavenReport::Many(nodes) => nodes.into_iter().map(MavenTreeNode::into_node).collect(),
            MavenReport::One(node) => vec![node.into_node()],
        };

        // 구조적 순회이므로 부분 경고 없이 전부 성공하거나 전부 실패합니다.
        Ok((DependencyGraph::new(roots), Vec::new()))
    }
}
