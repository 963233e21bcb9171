//! 스캔 엔진 설정
//!
//! [`ScannerConfig`]는 core의 [`DepsniffConfig`](depsniff_core::config::DepsniffConfig)
//! 에서 파생되며, run 단위 설정(리포트 형식, 저장소 루트, 워커 수)을 담습니다.
//!
//! # 사용 예시
//!
//! ```
//! use depsniff_scanner::ScannerConfigBuilder;
//! use depsniff_scanner::report::ReportFormat;
//!
//! // 저장소 루트는 둘 중 하나 이상 필요하다
//! let config = ScannerConfigBuilder::new()
//!     .report_format(ReportFormat::GradleText)
//!     .maven_home("/opt/m2/repository")
//!     .max_workers(4)
//!     .build()
//!     .unwrap();
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ScannerError;
use crate::report::ReportFormat;

/// 스캔 엔진 설정
///
/// # 필드
///
/// - **report_format**: 의존성 리포트 형식 (run 시작 시 한 번 결정)
/// - **maven_home / gradle_home**: 두 저장소 레이아웃의 루트 (빈 문자열이면 제외)
/// - **max_workers**: 동시 아카이브 스캔 워커 상한
/// - **include_test_scope**: test/provided 스코프 해석 여부
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// 의존성 리포트 형식
    pub report_format: ReportFormat,
    /// Maven 로컬 저장소 루트 (계층형 레이아웃)
    pub maven_home: String,
    /// Gradle 모듈 캐시 루트 (해시 디렉토리 레이아웃)
    pub gradle_home: String,
    /// 동시 스캔 워커 수
    pub max_workers: usize,
    /// test/provided 스코프 의존성도 해석할지 여부
    pub include_test_scope: bool,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            report_format: ReportFormat::MavenJson,
            maven_home: String::new(),
            gradle_home: String::new(),
            max_workers: 8,
            include_test_scope: false,
        }
    }
}

/// 워커 수 상한
const MAX_WORKERS_LIMIT: usize = 64;

impl ScannerConfig {
    /// core 설정에서 스캔 엔진 설정을 생성합니다.
    ///
    /// 리포트 형식은 core 설정에 없으므로 기본값을 사용하며,
    /// 호출자가 빌더 또는 필드 대입으로 지정합니다.
    pub fn from_core(core: &depsniff_core::config::DepsniffConfig) -> Self {
        Self {
            maven_home: core.repository.maven_home.clone(),
            gradle_home: core.repository.gradle_home.clone(),
            max_workers: core.scan.max_workers,
            include_test_scope: core.scan.include_test_scope,
            ..Self::default()
        }
    }

    /// 설정 값의 유효성을 검증합니다.
    ///
    /// # 검증 규칙
    ///
    /// - `max_workers`: 1-64
    /// - 저장소 루트: 둘 중 하나 이상 필요
    pub fn validate(&self) -> Result<(), ScannerError> {
        if self.max_workers == 0 || self.max_workers > MAX_WORKERS_LIMIT {
            return Err(ScannerError::Config {
                field: "max_workers".to_owned(),
                reason: format!("must be 1-{MAX_WORKERS_LIMIT}"),
            });
        }

        if self.maven_home.is_empty() && self.gradle_home.is_empty() {
            return Err(ScannerError::Config {
                field: "maven_home/gradle_home".to_owned(),
                reason: "at least one repository root required".to_owned(),
            });
        }

        Ok(())
    }
}

/// [`ScannerConfig`] 빌더
#[derive(Default)]
pub struct ScannerConfigBuilder {
    config: ScannerConfig,
}

impl ScannerConfigBuilder {
    /// 기본값을 가진 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 리포트 형식을 설정합니다.
    pub fn report_format(mut self, format: ReportFormat) -> Self {
        self.config.report_format = format;
        self
    }

    /// Maven 저장소 루트를 설정합니다.
    pub fn maven_home(mut self, path: impl Into<String>) -> Self {
        self.config.maven_home = path.into();
        self
    }

    /// Gradle 캐시 루트를 설정합니다.
    pub fn gradle_home(mut self, path: impl Into<String>) -> Self {
        self.config.gradle_home = path.into();
        self
    }

    /// 동시 워커 수를 설정합니다.
    pub fn max_workers(mut self, workers: usize) -> Self {
        self.config.max_workers = workers;
        self
    }

    /// test/provided 스코프 포함 여부를 설정합니다.
    pub fn include_test_scope(mut self, include: bool) -> Self {
        self.config.include_test_scope = include;
        self
    }

    /// 설정을 검증하고 빌드합니다.
    ///
    /// # Errors
    ///
    /// 유효성 검증 실패 시 `ScannerError::Config` 반환
    pub fn build(self) -> Result<ScannerConfig, ScannerError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
