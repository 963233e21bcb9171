//! 의존성 리포트 파서 -- Maven JSON 트리, Gradle 텍스트 트리
//!
//! [`ReportParser`] trait은 각 리포트 형식의 파서가 구현해야 하는
//! 인터페이스입니다. 형식은 run 시작 시 한 번 [`ReportFormat`]으로
//! 결정되며, 호출마다 형식 분기를 다시 하지 않습니다.
//!
//! # 지원 형식
//!
//! - Maven `mvn dependency:tree -DoutputType=json` (구조적 JSON) --
//!   [`MavenJsonParser`](maven::MavenJsonParser)
//! - Gradle `gradle dependencies` (들여쓰기 글리프 텍스트) --
//!   [`GradleTextParser`](gradle::GradleTextParser)
//!
//! # 에러 정책
//!
//! 리포트 전체가 어떤 그래프로도 파싱되지 않으면 치명적 에러인
//! [`ScannerError::MalformedReport`]를 반환합니다. 그 외의
//! 부분적 문제(깊이 점프, 깨진 좌표 토큰)는 해당 서브트리만 건너뛰고
//! [`ReportWarning`] 목록으로 함께 반환됩니다.

pub mod gradle;
pub mod maven;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ScannerError;
use crate::types::{DependencyGraph, ReportWarning};

/// 의존성 리포트 형식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    /// Maven JSON 의존성 트리
    MavenJson,
    /// Gradle 텍스트 의존성 트리
    GradleText,
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MavenJson => write!(f, "maven"),
            Self::GradleText => write!(f, "gradle"),
        }
    }
}

impl ReportFormat {
    /// 문자열에서 리포트 형식을 파싱합니다 (대소문자 구분 없음).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "maven" | "mvn" | "json" => Some(Self::MavenJson),
            "gradle" | "text" => Some(Self::GradleText),
            _ => None,
        }
    }
}

/// 리포트 파서 trait
///
/// 리포트 텍스트를 [`DependencyGraph`]와 경고 목록으로 변환합니다.
pub trait ReportParser: Send + Sync {
    /// 이 파서가 담당하는 리포트 형식을 반환합니다.
    fn format(&self) -> ReportFormat;

    /// 리포트 내용을 파싱하여 의존성 그래프와 경고 목록을 반환합니다.
    ///
    /// # Errors
    ///
    /// 리포트가 어떤 유효한 그래프로도 파싱되지 않으면
    /// `ScannerError::MalformedReport` 반환
    fn parse(&self, content: &str)
    -> Result<(DependencyGraph, Vec<ReportWarning>), ScannerError>;
}

/// 형식에 맞는 파서를 생성합니다.
pub fn parser_for(format: ReportFormat) -> Box<dyn ReportParser> {
    match format {
        ReportFormat::MavenJson => Box::new(maven::MavenJsonParser),
        ReportFormat::GradleText => Box::new(gradle::GradleTextParser),
    }
}
