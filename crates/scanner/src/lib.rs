#![doc = include_str!("../README.md")]
//!
//! # 파이프라인
//!
//! ```text
//! 의존성 리포트 (maven json / gradle text)
//!        |
//!        v
//!  report::ReportParser ---> DependencyGraph + ReportWarning
//!        |
//!        v
//!  resolver::RepositoryResolver ---> ResolvedArtifact (exists 여부)
//!        |
//!        v
//!  scanner::DependencyScanner (워커 풀)
//!        |        archive::ArchiveInspector + matcher::matches
//!        v
//!  ScanReport (매치 / 미해석 / 실패 / 경고)
//! ```

pub mod archive;
pub mod config;
pub mod error;
pub mod matcher;
pub mod report;
pub mod resolver;
pub mod scanner;
pub mod types;

// --- 주요 타입 re-export ---
pub use config::{ScannerConfig, ScannerConfigBuilder};
pub use error::ScannerError;
pub use report::ReportFormat;
pub use scanner::{DependencyScanner, DependencyScannerBuilder, ScanPhase};
pub use types::{
    DependencyGraph, MatchResult, ResolvedArtifact, ScanFailure, ScanReport, SearchCriterion,
};
