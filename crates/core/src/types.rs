//! 도메인 타입 -- 시스템 전역에서 사용되는 공통 타입
//!
//! 의존성 좌표([`Coordinate`])와 스코프([`Scope`])를 정의합니다.
//! 좌표는 그래프의 노드 키이자 저장소 리졸버의 조회 키로 사용됩니다.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maven 좌표 -- 의존성을 식별하는 불변 값
///
/// `group:artifact:version` 세 값의 구조적 동등성으로 비교됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    /// 그룹 ID (예: `org.slf4j`)
    pub group: String,
    /// 아티팩트 ID (예: `slf4j-api`)
    pub artifact: String,
    /// 버전 (예: `2.0.16`)
    pub version: String,
}

impl Coordinate {
    /// 세 구성 요소로 좌표를 생성합니다.
    pub fn new(
        group: impl Into<String>,
        artifact: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
            version: version.into(),
        }
    }

    /// 콜론 구분 토큰(`group:artifact:version[:scope]`)을 파싱합니다.
    ///
    /// 세 구성 요소 중 하나라도 비어 있으면 `None`을 반환합니다.
    /// 네 번째 세그먼트(스코프)는 있으면 함께 반환하고, 없으면
    /// [`Scope::Other`]로 채웁니다.
    pub fn parse(token: &str) -> Option<(Self, Scope)> {
        let mut parts = token.split(':');
        let group = parts.next()?.trim();
        let artifact = parts.next()?.trim();
        let version = parts.next()?.trim();
        if group.is_empty() || artifact.is_empty() || version.is_empty() {
            return None;
        }
        let scope = parts
            .next()
            .map(|s| Scope::from_str_loose(s.trim()))
            .unwrap_or(Scope::Other);
        Some((Self::new(group, artifact, version), scope))
    }

    /// 저장소 내 아카이브 파일명(`artifact-version.jar`)을 반환합니다.
    pub fn archive_file_name(&self) -> String {
        format!("{}-{}.jar", self.artifact, self.version)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact, self.version)
    }
}

/// 의존성 스코프
///
/// 빌드 도구 리포트에 기록된 스코프를 나타냅니다.
/// 알 수 없는 스코프 문자열은 [`Scope::Other`]로 매핑됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    /// 컴파일 스코프
    Compile,
    /// 런타임 스코프
    Runtime,
    /// 테스트 스코프
    Test,
    /// 제공(provided) 스코프
    Provided,
    /// 기타 (Gradle 텍스트 리포트처럼 스코프가 없는 경우 포함)
    Other,
}

impl Scope {
    /// 문자열에서 스코프를 파싱합니다 (대소문자 구분 없음).
    pub fn from_str_loose(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "compile" => Self::Compile,
            "runtime" => Self::Runtime,
            "test" => Self::Test,
            "provided" => Self::Provided,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compile => write!(f, "compile"),
            Self::Runtime => write!(f, "runtime"),
            Self::Test => write!(f, "test"),
            Self::Provided => write!(f, "provided"),
            Self::Other => write!(f, "other"),
        }
    }
}
