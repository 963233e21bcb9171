//! 설정 관리 -- depsniff.toml 파싱 및 런타임 설정
//!
//! [`DepsniffConfig`]는 모든 모듈의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`DEPSNIFF_REPOSITORY_MAVEN_HOME=/opt/m2` 형식)
//! 3. 설정 파일 (`depsniff.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! 저장소 홈 경로의 기본값(`$HOME/.m2/repository` 등)은 이 설정
//! 계층에서만 계산됩니다. 리졸버는 항상 명시적 경로를 받으므로
//! 테스트에서 환경변수 조작 없이 임시 디렉토리를 주입할 수 있습니다.
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), depsniff_core::error::DepsniffError> {
//! use depsniff_core::config::DepsniffConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = DepsniffConfig::load("depsniff.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = DepsniffConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, DepsniffError};

/// Depsniff 통합 설정
///
/// `depsniff.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DepsniffConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 로컬 저장소 설정
    #[serde(default)]
    pub repository: RepositoryConfig,
    /// 스캔 설정
    #[serde(default)]
    pub scan: ScanConfig,
}

impl DepsniffConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, DepsniffError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, DepsniffError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DepsniffError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                DepsniffError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, DepsniffError> {
        toml::from_str(toml_str).map_err(|e| {
            DepsniffError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `DEPSNIFF_{SECTION}_{FIELD}`
    /// 예: `DEPSNIFF_REPOSITORY_MAVEN_HOME=/opt/m2`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "DEPSNIFF_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "DEPSNIFF_GENERAL_LOG_FORMAT");

        // Repository
        override_string(
            &mut self.repository.maven_home,
            "DEPSNIFF_REPOSITORY_MAVEN_HOME",
        );
        override_string(
            &mut self.repository.gradle_home,
            "DEPSNIFF_REPOSITORY_GRADLE_HOME",
        );

        // Scan
        override_usize(&mut self.scan.max_workers, "DEPSNIFF_SCAN_MAX_WORKERS");
        override_usize(
            &mut self.scan.max_report_size,
            "DEPSNIFF_SCAN_MAX_REPORT_SIZE",
        );
        override_bool(
            &mut self.scan.include_test_scope,
            "DEPSNIFF_SCAN_INCLUDE_TEST_SCOPE",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), DepsniffError> {
        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        // log_format 검증
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        // 저장소 경로 검증
        if self.repository.maven_home.is_empty() && self.repository.gradle_home.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "repository".to_owned(),
                reason: "at least one of maven_home / gradle_home required".to_owned(),
            }
            .into());
        }

        // 워커 수 검증
        if self.scan.max_workers == 0 || self.scan.max_workers > MAX_WORKERS_LIMIT {
            return Err(ConfigError::InvalidValue {
                field: "scan.max_workers".to_owned(),
                reason: format!("must be 1-{MAX_WORKERS_LIMIT}"),
            }
            .into());
        }

        // 리포트 크기 검증
        if self.scan.max_report_size == 0 || self.scan.max_report_size > MAX_REPORT_SIZE_LIMIT {
            return Err(ConfigError::InvalidValue {
                field: "scan.max_report_size".to_owned(),
                reason: format!("must be 1-{MAX_REPORT_SIZE_LIMIT}"),
            }
            .into());
        }

        Ok(())
    }
}

/// 설정 상한값 상수
const MAX_WORKERS_LIMIT: usize = 64;
const MAX_REPORT_SIZE_LIMIT: usize = 100 * 1024 * 1024; // 100 MB

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 로컬 저장소 설정
///
/// 두 저장소 레이아웃의 루트 경로를 담습니다. 빈 문자열이면 해당
/// 레이아웃은 해석 대상에서 제외됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    /// Maven 로컬 저장소 (계층형 레이아웃)
    pub maven_home: String,
    /// Gradle 모듈 캐시 (해시 디렉토리 레이아웃)
    pub gradle_home: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            maven_home: default_maven_home(),
            gradle_home: default_gradle_home(),
        }
    }
}

/// 스캔 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// 동시 스캔 워커 수 (1-64)
    pub max_workers: usize,
    /// 의존성 리포트 최대 허용 크기 (바이트)
    pub max_report_size: usize,
    /// test/provided 스코프 의존성도 해석할지 여부
    pub include_test_scope: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_workers: 8,
            max_report_size: 10 * 1024 * 1024, // 10 MB
            include_test_scope: false,
        }
    }
}

/// `$HOME/.m2/repository` 기본 경로를 계산합니다.
fn default_maven_home() -> String {
    home_joined(&[".m2", "repository"])
}

/// `$HOME/.gradle/caches/modules-2/files-2.1` 기본 경로를 계산합니다.
fn default_gradle_home() -> String {
    home_joined(&[".gradle", "caches", "modules-2", "files-2.1"])
}

fn home_joined(segments: &[&str]) -> String {
    let mut path = match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home),
        None => return String::new(),
    };
    for segment in segments {
        path.push(segment);
    }
    path.display().to_string()
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}
