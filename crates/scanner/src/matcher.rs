//! 마커 매처 -- 엔트리 하나에 대한 순수 판정
//!
//! [`matches`]는 분류된 아카이브 엔트리 하나가 검색 조건의 증거인지
//! 판정하는 순수 함수입니다. I/O와 상태가 없으므로 엔트리 순서와
//! 무관하게 같은 입력이면 항상 같은 결과를 냅니다.
//!
//! # 마커 규칙
//!
//! artifact ID `a` 검색:
//! - `META-INF/maven/<group>/<a>/pom.properties` 경로 (그룹 세그먼트는
//!   제약 없음)
//! - pom.properties 내용의 `artifactId=<a>` 줄
//! - MANIFEST.MF의 `Implementation-Title` 또는 `Bundle-*Name` 속성 값에
//!   `a`가 포함
//!
//! 패키지명 접두사 `p` 검색:
//! - MANIFEST.MF의 `Implementation-Title` 또는 `Bundle-*Name` 속성 값이
//!   `p`와 같거나 `p.`로 시작
//! - 클래스 파일 경로가 `p`의 점을 슬래시로 바꾼 접두사로 시작
//!   (`org.slf4j` -> `org/slf4j/`)
//!
//! 셰이딩 도구는 클래스를 재배치해도 `META-INF/maven/` 메타데이터와
//! 원본 패키지 디렉토리를 흔히 남기므로, 이 마커들이 재배치된 의존성의
//! 증거가 됩니다.

use crate::archive::{Entry, EntryKind};
use crate::types::SearchCriterion;

/// 엔트리가 검색 조건의 증거인지 판정합니다.
pub fn matches(criterion: &SearchCriterion, entry: &Entry) -> bool {
    match criterion {
        SearchCriterion::Artifact(artifact) => match entry.kind {
            EntryKind::PomProperties => {
                pom_properties_path_matches(&entry.path, artifact)
                    || entry
                        .content
                        .as_deref()
                        .is_some_and(|c| pom_properties_content_matches(c, artifact))
            }
            EntryKind::Manifest => entry
                .content
                .as_deref()
                .is_some_and(|c| manifest_names_artifact(c, artifact)),
            _ => false,
        },
        SearchCriterion::PackagePrefix(prefix) => match entry.kind {
            EntryKind::Manifest => entry
                .content
                .as_deref()
                .is_some_and(|c| manifest_matches(c, prefix)),
            EntryKind::ClassFile => class_path_matches(&entry.path, prefix),
            _ => false,
        },
    }
}

/// `META-INF/maven/<group>/<artifact>/pom.properties` 경로 판정.
fn pom_properties_path_matches(path: &str, artifact: &str) -> bool {
    let Some(rest) = path.strip_prefix("META-INF/maven/") else {
        return false;
    };
    let Some(dirs) = rest.strip_suffix("/pom.properties") else {
        return false;
    };
    // 마지막 세그먼트가 artifact ID, 그 앞은 그룹
    dirs.rsplit('/').next() == Some(artifact)
}

/// pom.properties 내용의 `artifactId=` 줄 판정.
fn pom_properties_content_matches(content: &str, artifact: &str) -> bool {
    content
        .lines()
        .filter_map(|line| line.trim().strip_prefix("artifactId="))
        .any(|value| value.trim() == artifact)
}

/// MANIFEST.MF의 이름 속성(`Implementation-Title`, `Bundle-Name`,
/// `Bundle-SymbolicName` 계열) 값을 순회합니다.
///
/// Bundle-SymbolicName 값의 `;singleton:=true` 같은 지시어는 제거합니다.
fn manifest_name_values(content: &str) -> impl Iterator<Item = &str> {
    content.lines().filter_map(|line| {
        let (key, value) = line.split_once(':')?;
        let key = key.trim();
        if key != "Implementation-Title" && !(key.starts_with("Bundle-") && key.ends_with("Name")) {
            return None;
        }
        let value = value.trim();
        Some(value.split(';').next().unwrap_or(value).trim())
    })
}

/// MANIFEST.MF 속성 값의 패키지명 접두사 판정.
///
/// 값이 접두사와 같거나 `<p>.`으로 시작하면 매치입니다.
fn manifest_matches(content: &str, prefix: &str) -> bool {
    let dotted = format!("{prefix}.");
    manifest_name_values(content).any(|value| value == prefix || value.starts_with(&dotted))
}

/// MANIFEST.MF 속성 값의 artifact ID 판정.
///
/// 이름 속성 값에 artifact ID가 포함되면 매치입니다. 팻 jar가 제목을
/// `<artifact> (shaded)`처럼 꾸미는 경우가 있어 포함 판정을 씁니다.
fn manifest_names_artifact(content: &str, artifact: &str) -> bool {
    manifest_name_values(content).any(|value| value.contains(artifact))
}

/// 클래스 파일 경로의 패키지 디렉토리 접두사 판정.
fn class_path_matches(path: &str, prefix: &str) -> bool {
    let mut dir_prefix = prefix.replace('.', "/");
    dir_prefix.push('/');
    path.starts_with(&dir_prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(path: &str, kind: EntryKind, content: Option<&str>) -> Entry {
        Entry {
            path: path.to_owned(),
            kind,
            content: content.map(str::to_owned),
        }
    }

    fn artifact(a: &str) -> SearchCriterion {
        SearchCriterion::Artifact(a.to_owned())
    }

    fn package(p: &str) -> SearchCriterion {
        SearchCriterion::PackagePrefix(p.to_owned())
    }

    #[test]
    fn pom_properties_path_marker() {
        let e = entry(
            "META-INF/maven/org.slf4j/slf4j-api/pom.properties",
            EntryKind::PomProperties,
            None,
        );
        assert!(matches(&artifact("slf4j-api"), &e));
        assert!(!matches(&artifact("slf4j"), &e));
    }

    #[test]
    fn pom_properties_group_segment_is_unconstrained() {
        // 셰이딩 후에도 원본 그룹 디렉토리가 남는다는 보장은 없다
        let e = entry(
            "META-INF/maven/com.shaded.vendor/slf4j-api/pom.properties",
            EntryKind::PomProperties,
            None,
        );
        assert!(matches(&artifact("slf4j-api"), &e));
    }

    #[test]
    fn pom_properties_content_marker() {
        let e = entry(
            "META-INF/maven/g/other/pom.properties",
            EntryKind::PomProperties,
            Some("#generated\ngroupId=org.slf4j\nartifactId=slf4j-api\nversion=2.0.16\n"),
        );
        assert!(matches(&artifact("slf4j-api"), &e));
    }

    #[test]
    fn artifact_id_requires_exact_value() {
        let e = entry(
            "META-INF/maven/g/other/pom.properties",
            EntryKind::PomProperties,
            Some("artifactId=slf4j-api-extended\n"),
        );
        assert!(!matches(&artifact("slf4j-api"), &e));
    }

    #[test]
    fn manifest_title_names_artifact_id() {
        let e = entry(
            "META-INF/MANIFEST.MF",
            EntryKind::Manifest,
            Some("Manifest-Version: 1.0\nImplementation-Title: slf4j-api\n"),
        );
        assert!(matches(&artifact("slf4j-api"), &e));
        assert!(!matches(&artifact("logback-core"), &e));
    }

    #[test]
    fn manifest_bundle_name_contains_artifact_id() {
        // 팻 jar는 제목을 꾸미므로 포함 판정이어야 한다
        let e = entry(
            "META-INF/MANIFEST.MF",
            EntryKind::Manifest,
            Some("Bundle-Name: slf4j-api (relocated)\n"),
        );
        assert!(matches(&artifact("slf4j-api"), &e));
    }

    #[test]
    fn manifest_non_name_attributes_do_not_name_artifact() {
        let e = entry(
            "META-INF/MANIFEST.MF",
            EntryKind::Manifest,
            Some("Main-Class: org.slf4j.Main\nCreated-By: slf4j-api-gen\n"),
        );
        assert!(!matches(&artifact("slf4j-api"), &e));
    }

    #[test]
    fn manifest_implementation_title() {
        let e = entry(
            "META-INF/MANIFEST.MF",
            EntryKind::Manifest,
            Some("Manifest-Version: 1.0\nImplementation-Title: org.slf4j\n"),
        );
        assert!(matches(&package("org.slf4j"), &e));
    }

    #[test]
    fn manifest_bundle_symbolic_name_with_directive() {
        let e = entry(
            "META-INF/MANIFEST.MF",
            EntryKind::Manifest,
            Some("Bundle-SymbolicName: org.slf4j.api;singleton:=true\n"),
        );
        assert!(matches(&package("org.slf4j"), &e));
    }

    #[test]
    fn manifest_prefix_must_stop_at_segment_boundary() {
        let e = entry(
            "META-INF/MANIFEST.MF",
            EntryKind::Manifest,
            Some("Implementation-Title: org.slf4jx.core\n"),
        );
        assert!(!matches(&package("org.slf4j"), &e));
    }

    #[test]
    fn manifest_ignores_unrelated_attributes() {
        let e = entry(
            "META-INF/MANIFEST.MF",
            EntryKind::Manifest,
            Some("Created-By: org.slf4j\nMain-Class: org.slf4j.Main\n"),
        );
        assert!(!matches(&package("org.slf4j"), &e));
    }

    #[test]
    fn class_path_prefix_marker() {
        let e = entry("org/slf4j/Logger.class", EntryKind::ClassFile, None);
        assert!(matches(&package("org.slf4j"), &e));
        assert!(!matches(&package("org.slf4j.event"), &e));
    }

    #[test]
    fn class_path_boundary_is_directory() {
        let e = entry("org/slf4jx/Logger.class", EntryKind::ClassFile, None);
        assert!(!matches(&package("org.slf4j"), &e));
    }

    #[test]
    fn relocated_class_path_does_not_match_original_prefix() {
        let e = entry(
            "shaded/org/slf4j/Logger.class",
            EntryKind::ClassFile,
            None,
        );
        // 접두사 판정이므로 중간 경로는 매치하지 않는다
        assert!(!matches(&package("org.slf4j"), &e));
    }

    #[test]
    fn criteria_do_not_cross_kinds() {
        let class = entry("org/slf4j/Logger.class", EntryKind::ClassFile, None);
        assert!(!matches(&artifact("slf4j-api"), &class));

        let pom = entry(
            "META-INF/maven/org.slf4j/slf4j-api/pom.properties",
            EntryKind::PomProperties,
            None,
        );
        assert!(!matches(&package("org.slf4j"), &pom));
    }

    #[test]
    fn judgement_is_order_independent() {
        let entries = vec![
            entry("org/slf4j/Logger.class", EntryKind::ClassFile, None),
            entry("com/other/Thing.class", EntryKind::ClassFile, None),
            entry(
                "META-INF/MANIFEST.MF",
                EntryKind::Manifest,
                Some("Implementation-Title: org.slf4j\n"),
            ),
        ];
        let criterion = package("org.slf4j");

        let forward: Vec<bool> = entries.iter().map(|e| matches(&criterion, e)).collect();
        let mut backward: Vec<bool> = entries
            .iter()
            .rev()
            .map(|e| matches(&criterion, e))
            .collect();
        backward.reverse();
        assert_eq!(forward, backward);
    }
}
