//! 스캔 엔진 에러 타입
//!
//! [`ScannerError`]는 스캔 엔진 내에서 발생할 수 있는 모든 에러를 나타냅니다.
//! `From<ScannerError> for DepsniffError` 구현을 통해 `?` 연산자로
//! 상위 에러 타입으로 자연스럽게 전파됩니다.
//!
//! # 에러 분류
//!
//! - **치명적 (run 중단)**: `MalformedReport`, `Config`
//! - **복구됨 (리포트에 기록)**: `UnreadableArchive` -- 아카이브 하나의
//!   실패는 해당 아카이브의 스캔 실패 항목으로만 남고 나머지 스캔은
//!   계속됩니다. 해석 실패(로컬 캐시 없음)는 에러가 아니라
//!   `exists=false`인 [`ResolvedArtifact`](crate::types::ResolvedArtifact)로
//!   보고됩니다.

use depsniff_core::error::DepsniffError;

/// 스캔 엔진 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum ScannerError {
    /// 리포트가 어떤 유효한 그래프로도 파싱되지 않음 (치명적)
    #[error("malformed dependency report: {reason}")]
    MalformedReport {
        /// 파싱 실패 사유
        reason: String,
    },

    /// 아카이브가 존재하지만 열거나 파싱할 수 없음 (아카이브 단위 복구)
    #[error("unreadable archive: {path}: {reason}")]
    UnreadableArchive {
        /// 아카이브 경로
        path: String,
        /// 실패 사유
        reason: String,
    },

    /// 설정 에러 (빈 검색 조건 등)
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// 워커 태스크 join 실패
    #[error("task join error: {0}")]
    TaskJoin(String),
}

impl From<ScannerError> for DepsniffError {
    fn from(e: ScannerError) -> Self {
        DepsniffError::Scan(e.to_string())
    }
}
