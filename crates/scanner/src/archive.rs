//! 아카이브 인스펙터 -- jar(zip) 내부 엔트리 열람
//!
//! [`ArchiveInspector`]는 jar 아카이브의 중앙 디렉토리에서 엔트리
//! 이름을 읽고, 매칭에 내용이 필요한 소수의 메타데이터 엔트리만
//! 선택적으로 압축 해제합니다. 아카이브를 디스크에 풀지 않으며,
//! 클래스 파일은 경로만으로 판정되므로 절대 압축 해제하지 않습니다.
//!
//! # 엔트리 분류
//!
//! - `META-INF/MANIFEST.MF` -> [`EntryKind::Manifest`]
//! - `META-INF/maven/**/pom.properties` -> [`EntryKind::PomProperties`]
//! - `*.class` -> [`EntryKind::ClassFile`]
//! - 그 외 -> [`EntryKind::Other`]
//!
//! # 에러 정책
//!
//! 파일이 zip으로 열리지 않으면 [`ScannerError::UnreadableArchive`]를
//! 반환합니다. 이는 아카이브 단위로 복구되는 에러이며, 호출자는 해당
//! 아카이브만 실패로 기록하고 나머지 스캔을 계속합니다.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;
use zip::ZipArchive;

use crate::error::ScannerError;
use crate::types::SearchCriterion;

/// 아카이브 엔트리의 매칭 역할 분류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// `META-INF/MANIFEST.MF`
    Manifest,
    /// `META-INF/maven/<group>/<artifact>/pom.properties`
    PomProperties,
    /// `.class` 파일
    ClassFile,
    /// 매칭에 쓰이지 않는 나머지 엔트리
    Other,
}

/// 분류된 아카이브 엔트리
///
/// `content`는 선택된 메타데이터 엔트리에만 채워지며, 경로만으로
/// 판정되는 엔트리는 `None`입니다.
#[derive(Debug, Clone)]
pub struct Entry {
    /// 아카이브 내부 경로 (`/` 구분)
    pub path: String,
    /// 분류
    pub kind: EntryKind,
    /// 압축 해제된 내용 (선택된 엔트리만)
    pub content: Option<String>,
}

/// 검색 조건별로 내용이 필요한 엔트리 종류
///
/// artifact ID 검색은 pom.properties의 `artifactId=` 줄과 MANIFEST.MF의
/// 속성 값을, 패키지명 검색은 MANIFEST.MF만 읽어야 합니다. 나머지는
/// 전부 경로 판정입니다.
#[derive(Debug, Clone, Copy)]
pub struct EntrySelection {
    load_manifest: bool,
    load_pom_properties: bool,
}

impl EntrySelection {
    /// 검색 조건에 맞는 최소 선택을 반환합니다.
    pub fn for_criterion(criterion: &SearchCriterion) -> Self {
        match criterion {
            SearchCriterion::Artifact(_) => Self {
                load_manifest: true,
                load_pom_properties: true,
            },
            SearchCriterion::PackagePrefix(_) => Self {
                load_manifest: true,
                load_pom_properties: false,
            },
        }
    }

    fn wants(&self, kind: EntryKind) -> bool {
        match kind {
            EntryKind::Manifest => self.load_manifest,
            EntryKind::PomProperties => self.load_pom_properties,
            EntryKind::ClassFile | EntryKind::Other => false,
        }
    }
}

/// 엔트리 내용 읽기 상한 (메타데이터 파일은 이보다 훨씬 작음)
const MAX_ENTRY_CONTENT: u64 = 1024 * 1024;

/// jar 아카이브 인스펙터
#[derive(Debug)]
pub struct ArchiveInspector {
    archive: ZipArchive<File>,
    path: String,
}

impl ArchiveInspector {
    /// 아카이브를 엽니다.
    ///
    /// # Errors
    ///
    /// 파일을 열 수 없거나 zip 중앙 디렉토리가 손상된 경우
    /// `ScannerError::UnreadableArchive` 반환
    pub fn open(path: &Path) -> Result<Self, ScannerError> {
        let display_path = path.display().to_string();
        let file = File::open(path).map_err(|e| ScannerError::UnreadableArchive {
            path: display_path.clone(),
            reason: e.to_string(),
        })?;
        let archive = ZipArchive::new(file).map_err(|e| ScannerError::UnreadableArchive {
            path: display_path.clone(),
            reason: e.to_string(),
        })?;
        debug!(path = %display_path, entries = archive.len(), "archive opened");
        Ok(Self {
            archive,
            path: display_path,
        })
    }

    /// 아카이브 경로를 반환합니다.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// 엔트리 수를 반환합니다.
    pub fn entry_count(&self) -> usize {
        self.archive.len()
    }

    /// 엔트리를 아카이브 선언 순서대로 내놓는 지연 이터레이터를 반환합니다.
    ///
    /// 이름은 중앙 디렉토리에서 압축 해제 없이 읽으며, `selection`이
    /// 요구하는 종류의 엔트리만 내용을 압축 해제합니다. 엔트리는 하나씩
    /// 소비되고 버려지므로 아카이브 전체가 메모리에 올라가지 않습니다.
    pub fn entries(&mut self, selection: EntrySelection) -> EntryIter<'_> {
        EntryIter {
            inspector: self,
            selection,
            index: 0,
        }
    }

    /// 인덱스 위치의 엔트리를 분류하고, 선택된 종류면 내용을 읽습니다.
    fn entry_at(&mut self, index: usize, selection: EntrySelection) -> Result<Entry, ScannerError> {
        let (path, kind) = {
            let raw = self
                .archive
                .by_index_raw(index)
                .map_err(|e| ScannerError::UnreadableArchive {
                    path: self.path.clone(),
                    reason: format!("entry {index}: {e}"),
                })?;
            let name = raw.name().to_owned();
            let kind = classify(&name);
            (name, kind)
        };

        let content = if selection.wants(kind) {
            Some(self.read_entry(index)?)
        } else {
            None
        };

        Ok(Entry {
            path,
            kind,
            content,
        })
    }

    /// 단일 엔트리를 압축 해제하여 텍스트로 읽습니다.
    fn read_entry(&mut self, index: usize) -> Result<String, ScannerError> {
        let mut file =
            self.archive
                .by_index(index)
                .map_err(|e| ScannerError::UnreadableArchive {
                    path: self.path.clone(),
                    reason: format!("entry {index}: {e}"),
                })?;

        let mut bytes = Vec::new();
        file.by_ref()
            .take(MAX_ENTRY_CONTENT)
            .read_to_end(&mut bytes)
            .map_err(|e| ScannerError::UnreadableArchive {
                path: self.path.clone(),
                reason: format!("entry {index}: {e}"),
            })?;

        // 메타데이터 파일의 인코딩 이상은 매칭 실패로만 이어지면 된다
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// [`ArchiveInspector::entries`]의 지연 이터레이터
///
/// 항목마다 `Result`를 내놓으므로 손상된 엔트리 레코드는
/// `ScannerError::UnreadableArchive`로 전파됩니다.
pub struct EntryIter<'a> {
    inspector: &'a mut ArchiveInspector,
    selection: EntrySelection,
    index: usize,
}

impl Iterator for EntryIter<'_> {
    type Item = Result<Entry, ScannerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.inspector.archive.len() {
            return None;
        }
        let index = self.index;
        self.index += 1;
        Some(self.inspector.entry_at(index, self.selection))
    }
}

/// 엔트리 경로를 매칭 역할로 분류합니다.
pub fn classify(path: &str) -> EntryKind {
    if path == "META-INF/MANIFEST.MF" {
        return EntryKind::Manifest;
    }
    if path.starts_with("META-INF/maven/") && path.ends_with("/pom.properties") {
        return EntryKind::PomProperties;
    }
    if path.ends_with(".class") {
        return EntryKind::ClassFile;
    }
    EntryKind::Other
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use zip::write::SimpleFileOptions;

    use super::*;

    fn write_jar(path: &Path, entries: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        for (name, content) in entries {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn classify_entry_paths() {
        assert_eq!(classify("META-INF/MANIFEST.MF"), EntryKind::Manifest);
        assert_eq!(
            classify("META-INF/maven/org.slf4j/slf4j-api/pom.properties"),
            EntryKind::PomProperties
        );
        assert_eq!(classify("org/slf4j/Logger.class"), EntryKind::ClassFile);
        assert_eq!(classify("META-INF/LICENSE.txt"), EntryKind::Other);
        // 최상위 pom.properties는 마커가 아니다
        assert_eq!(classify("pom.properties"), EntryKind::Other);
    }

    #[test]
    fn entries_preserve_archive_order() {
        let temp = tempfile::tempdir().unwrap();
        let jar = temp.path().join("a.jar");
        write_jar(
            &jar,
            &[
                ("META-INF/MANIFEST.MF", "Manifest-Version: 1.0\n"),
                ("org/slf4j/Logger.class", "\u{0}"),
                ("META-INF/maven/org.slf4j/slf4j-api/pom.properties", "artifactId=slf4j-api\n"),
            ],
        );

        let mut inspector = ArchiveInspector::open(&jar).unwrap();
        let entries: Vec<Entry> = inspector
            .entries(EntrySelection::for_criterion(&SearchCriterion::Artifact(
                "slf4j-api".to_owned(),
            )))
            .collect::<Result<_, _>>()
            .unwrap();

        let paths: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "META-INF/MANIFEST.MF",
                "org/slf4j/Logger.class",
                "META-INF/maven/org.slf4j/slf4j-api/pom.properties",
            ]
        );
    }

    #[test]
    fn artifact_selection_loads_metadata_entries() {
        let temp = tempfile::tempdir().unwrap();
        let jar = temp.path().join("a.jar");
        write_jar(
            &jar,
            &[
                ("META-INF/MANIFEST.MF", "Implementation-Title: demo\n"),
                ("META-INF/maven/g/a/pom.properties", "artifactId=a\n"),
                ("g/A.class", ""),
            ],
        );

        let mut inspector = ArchiveInspector::open(&jar).unwrap();
        let entries: Vec<Entry> = inspector
            .entries(EntrySelection::for_criterion(&SearchCriterion::Artifact(
                "a".to_owned(),
            )))
            .collect::<Result<_, _>>()
            .unwrap();

        // 두 메타데이터 엔트리는 내용이 로드되고, 클래스 파일은 경로만 읽는다
        assert_eq!(
            entries[0].content.as_deref(),
            Some("Implementation-Title: demo\n")
        );
        assert_eq!(entries[1].content.as_deref(), Some("artifactId=a\n"));
        assert!(entries[2].content.is_none());
    }

    #[test]
    fn package_selection_loads_only_manifest() {
        let temp = tempfile::tempdir().unwrap();
        let jar = temp.path().join("a.jar");
        write_jar(
            &jar,
            &[
                ("META-INF/MANIFEST.MF", "Implementation-Title: org.slf4j\n"),
                ("META-INF/maven/g/a/pom.properties", "artifactId=a\n"),
            ],
        );

        let mut inspector = ArchiveInspector::open(&jar).unwrap();
        let entries: Vec<Entry> = inspector
            .entries(EntrySelection::for_criterion(
                &SearchCriterion::PackagePrefix("org.slf4j".to_owned()),
            ))
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(
            entries[0].content.as_deref(),
            Some("Implementation-Title: org.slf4j\n")
        );
        assert!(entries[1].content.is_none());
    }

    #[test]
    fn corrupt_file_is_unreadable_archive() {
        let temp = tempfile::tempdir().unwrap();
        let jar = temp.path().join("broken.jar");
        std::fs::write(&jar, b"this is not a zip file").unwrap();

        let err = ArchiveInspector::open(&jar).unwrap_err();
        assert!(matches!(err, ScannerError::UnreadableArchive { .. }));
    }

    #[test]
    fn missing_file_is_unreadable_archive() {
        let err = ArchiveInspector::open(Path::new("/nonexistent/x.jar")).unwrap_err();
        assert!(matches!(err, ScannerError::UnreadableArchive { .. }));
    }
}
