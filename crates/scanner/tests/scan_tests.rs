//! 스캔 파이프라인 통합 테스트
//!
//! 임시 디렉토리에 실제 저장소 레이아웃과 jar 아카이브를 구성하여
//! 리포트 파싱부터 집계까지 전체 파이프라인을 검증합니다.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;

use depsniff_scanner::{
    DependencyScanner, ReportFormat, ScanReport, ScannerConfigBuilder, SearchCriterion,
};

fn write_jar(path: &Path, entries: &[(&str, &str)]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let file = File::create(path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    for (name, content) in entries {
        writer.start_file(*name, SimpleFileOptions::default()).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap();
}

fn maven_jar_path(repo: &Path, group: &str, artifact: &str, version: &str) -> PathBuf {
    let mut path = repo.to_path_buf();
    for segment in group.split('.') {
        path.push(segment);
    }
    path.push(artifact);
    path.push(version);
    path.push(format!("{artifact}-{version}.jar"));
    path
}

/// slf4j-api가 직접 의존성으로도, nohttp-cli 안에 셰이딩된 형태로도
/// 존재하는 저장소를 구성합니다.
fn seed_shaded_repo(repo: &Path) {
    write_jar(
        &maven_jar_path(repo, "org.slf4j", "slf4j-api", "2.0.16"),
        &[
            (
                "META-INF/MANIFEST.MF",
                "Manifest-Version: 1.0\nBundle-SymbolicName: slf4j.api\nImplementation-Title: slf4j-api\n",
            ),
            (
                "META-INF/maven/org.slf4j/slf4j-api/pom.properties",
                "groupId=org.slf4j\nartifactId=slf4j-api\nversion=2.0.16\n",
            ),
            ("org/slf4j/Logger.class", ""),
            ("org/slf4j/LoggerFactory.class", ""),
        ],
    );
    // 팻 jar: 자기 클래스와 함께 slf4j 클래스, 메타데이터가 통째로 들어있다
    write_jar(
        &maven_jar_path(repo, "io.spring.nohttp", "nohttp-cli", "0.0.11"),
        &[
            (
                "META-INF/MANIFEST.MF",
                "Manifest-Version: 1.0\nMain-Class: io.spring.nohttp.cli.Main\n",
            ),
            (
                "META-INF/maven/org.slf4j/slf4j-api/pom.properties",
                "groupId=org.slf4j\nartifactId=slf4j-api\nversion=2.0.16\n",
            ),
            ("io/spring/nohttp/cli/Main.class", ""),
            ("org/slf4j/Logger.class", ""),
        ],
    );
}

const SHADED_REPORT: &str = r#"{
    "groupId": "com.example", "artifactId": "app", "version": "1.0.0",
    "scope": "compile",
    "children": [
        { "groupId": "org.slf4j", "artifactId": "slf4j-api", "version": "2.0.16",
          "scope": "compile", "children": [] },
        { "groupId": "io.spring.nohttp", "artifactId": "nohttp-cli", "version": "0.0.11",
          "scope": "compile", "children": [] }
    ]
}"#;

async fn run_scan(repo: &Path, criterion: SearchCriterion, report: &str) -> ScanReport {
    let config = ScannerConfigBuilder::new()
        .maven_home(repo.to_string_lossy())
        .max_workers(4)
        .build()
        .unwrap();
    DependencyScanner::builder()
        .config(config)
        .criterion(criterion)
        .build()
        .unwrap()
        .scan(report)
        .await
        .unwrap()
}

fn matched_artifacts(report: &ScanReport) -> Vec<String> {
    report
        .matches
        .iter()
        .map(|m| m.artifact.coordinate.artifact.clone())
        .collect()
}

#[tokio::test]
async fn artifact_search_finds_direct_and_shaded_copies() {
    let temp = tempfile::tempdir().unwrap();
    seed_shaded_repo(temp.path());

    let report = run_scan(
        temp.path(),
        SearchCriterion::Artifact("slf4j-api".to_owned()),
        SHADED_REPORT,
    )
    .await;

    // 직접 의존성과 셰이딩된 사본 모두에서 발견된다 (app 자체는 로컬에 없음)
    assert_eq!(matched_artifacts(&report), vec!["slf4j-api", "nohttp-cli"]);
    // 직접 의존성은 매니페스트 제목과 pom.properties 두 증거를 모두 남긴다
    let direct = &report.matches[0];
    assert!(direct
        .matched_entries
        .contains(&"META-INF/MANIFEST.MF".to_owned()));
    assert!(direct
        .matched_entries
        .contains(&"META-INF/maven/org.slf4j/slf4j-api/pom.properties".to_owned()));
    assert!(report
        .matches
        .iter()
        .all(|m| m.matched_entries.iter().any(|e| e.ends_with("pom.properties"))));
    assert_eq!(report.unresolved.len(), 1);
    assert_eq!(report.unresolved[0].artifact, "app");
}

#[tokio::test]
async fn package_search_finds_class_path_evidence() {
    let temp = tempfile::tempdir().unwrap();
    seed_shaded_repo(temp.path());

    let report = run_scan(
        temp.path(),
        SearchCriterion::PackagePrefix("org.slf4j".to_owned()),
        SHADED_REPORT,
    )
    .await;

    assert_eq!(matched_artifacts(&report), vec!["slf4j-api", "nohttp-cli"]);
    let fat_jar = &report.matches[1];
    assert!(fat_jar
        .matched_entries
        .contains(&"org/slf4j/Logger.class".to_owned()));
}

#[tokio::test]
async fn one_corrupt_archive_does_not_abort_the_run() {
    let temp = tempfile::tempdir().unwrap();
    seed_shaded_repo(temp.path());
    let broken = maven_jar_path(temp.path(), "com.broken", "broken-lib", "1.0.0");
    fs::create_dir_all(broken.parent().unwrap()).unwrap();
    fs::write(&broken, b"garbage bytes, no zip here").unwrap();

    let report_json = r#"[
        { "groupId": "org.slf4j", "artifactId": "slf4j-api", "version": "2.0.16", "children": [] },
        { "groupId": "com.broken", "artifactId": "broken-lib", "version": "1.0.0", "children": [] },
        { "groupId": "io.spring.nohttp", "artifactId": "nohttp-cli", "version": "0.0.11", "children": [] }
    ]"#;

    let report = run_scan(
        temp.path(),
        SearchCriterion::Artifact("slf4j-api".to_owned()),
        report_json,
    )
    .await;

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].artifact.coordinate.artifact, "broken-lib");
    assert_eq!(matched_artifacts(&report), vec!["slf4j-api", "nohttp-cli"]);
}

#[tokio::test]
async fn gradle_report_against_gradle_cache_layout() {
    let temp = tempfile::tempdir().unwrap();
    let cache = temp.path();
    write_jar(
        &cache
            .join("org.slf4j/slf4j-api/2.0.16/abc123")
            .join("slf4j-api-2.0.16.jar"),
        &[
            (
                "META-INF/maven/org.slf4j/slf4j-api/pom.properties",
                "artifactId=slf4j-api\n",
            ),
            ("org/slf4j/Logger.class", ""),
        ],
    );

    let gradle_report = "\
runtimeClasspath - Runtime classpath of source set 'main'.
\\--- org.slf4j:slf4j-api:1.7.30 -> 2.0.16 (*)
";

    let config = ScannerConfigBuilder::new()
        .report_format(ReportFormat::GradleText)
        .gradle_home(cache.to_string_lossy())
        .build()
        .unwrap();
    let report = DependencyScanner::builder()
        .config(config)
        .criterion(SearchCriterion::Artifact("slf4j-api".to_owned()))
        .build()
        .unwrap()
        .scan(gradle_report)
        .await
        .unwrap();

    // 충돌 해소된 최종 버전(2.0.16)이 해시 디렉토리 레이아웃에서 해석된다
    assert_eq!(matched_artifacts(&report), vec!["slf4j-api"]);
    assert!(report.unresolved.is_empty());
}

#[tokio::test]
async fn repeated_runs_produce_identical_reports() {
    let temp = tempfile::tempdir().unwrap();
    seed_shaded_repo(temp.path());
    let criterion = SearchCriterion::Artifact("slf4j-api".to_owned());

    let first = run_scan(temp.path(), criterion.clone(), SHADED_REPORT).await;
    let second = run_scan(temp.path(), criterion, SHADED_REPORT).await;

    assert_eq!(matched_artifacts(&first), matched_artifacts(&second));
    assert_eq!(first.unresolved, second.unresolved);
    assert_eq!(
        first.matches[0].matched_entries,
        second.matches[0].matched_entries
    );
}

#[tokio::test]
async fn zero_match_archives_are_omitted_from_results() {
    let temp = tempfile::tempdir().unwrap();
    seed_shaded_repo(temp.path());
    write_jar(
        &maven_jar_path(temp.path(), "com.google.guava", "guava", "33.0.0-jre"),
        &[
            ("META-INF/MANIFEST.MF", "Implementation-Title: Guava\n"),
            ("com/google/common/collect/ImmutableList.class", ""),
        ],
    );

    let report_json = r#"[
        { "groupId": "org.slf4j", "artifactId": "slf4j-api", "version": "2.0.16", "children": [] },
        { "groupId": "com.google.guava", "artifactId": "guava", "version": "33.0.0-jre", "children": [] }
    ]"#;

    let report = run_scan(
        temp.path(),
        SearchCriterion::Artifact("slf4j-api".to_owned()),
        report_json,
    )
    .await;

    assert_eq!(matched_artifacts(&report), vec!["slf4j-api"]);
    assert!(report.failures.is_empty());
}
