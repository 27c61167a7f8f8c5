//! 파일 기반 저장소 -- 로컬 JSON 취약점 DB + JSON-lines 스캔 이력
//!
//! # 취약점 DB 형식
//!
//! ```json
//! [
//!   { "cve_id": "CVE-2021-3711", "product": "openssl", "versions": ["1.1.1k", "1.1.1j"] },
//!   { "cve_id": "CVE-2019-18276", "product": "bash", "versions": ["5.0"] }
//! ]
//! ```
//!
//! DB의 버전 문자열은 [`PackageRecord`]와 같은 규칙으로 정규화된 뒤 인덱싱됩니다.
//!
//! # 이력 형식
//!
//! 한 줄에 [`StoredReport`] 하나씩 기록합니다 (`timestamp`는 epoch 초 실수).
//!
//! ```text
//! {"id":"6f1c...","report":{"image_name":"centos:8","timestamp":1600000000.5,...}}
//! ```

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use dockvet_core::types::{PackageRecord, ScanReport, StoredReport};

use crate::error::ScannerError;
use crate::store::{VulnStore, new_report_id};

/// 취약점 DB 파일 최대 크기 (50 MB)
const MAX_VULN_DB_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// 취약점 DB 엔트리 최대 개수 (1,000,000개)
const MAX_VULN_DB_ENTRIES: usize = 1_000_000;

/// 취약점 DB 엔트리
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VulnDbEntry {
    /// CVE ID (예: CVE-2021-3711)
    pub cve_id: String,
    /// 영향받는 패키지명
    pub product: String,
    /// 영향받는 버전 목록 (완전 일치)
    pub versions: Vec<String>,
}

/// 파일 기반 [`VulnStore`]
///
/// 취약점 DB는 `open` 시점에 한 번 읽어 `(product, version)`으로 인덱싱합니다.
/// 이력 파일은 매 호출마다 읽고 씁니다.
pub struct JsonVulnStore {
    entries: Vec<VulnDbEntry>,
    index: HashMap<(String, String), Vec<usize>>,
    history_path: PathBuf,
    /// 이력 append 직렬화
    write_lock: Mutex<()>,
}

impl JsonVulnStore {
    /// 취약점 DB 파일을 로드하고 이력 파일 경로를 설정합니다.
    ///
    /// DB 파일이 없으면 빈 DB로 시작합니다. 이력 파일은 첫 저장 시 생성됩니다.
    ///
    /// # 보안 제한
    ///
    /// - DB 파일 최대 50MB (`MAX_VULN_DB_FILE_SIZE`)
    /// - 엔트리 최대 1,000,000개 (`MAX_VULN_DB_ENTRIES`), 초과분은 버림
    ///
    /// # Note
    ///
    /// 동기 I/O를 수행합니다.
    pub fn open(
        vuln_db_path: impl AsRef<Path>,
        history_path: impl Into<PathBuf>,
    ) -> Result<Self, ScannerError> {
        let db_path = vuln_db_path.as_ref();
        let entries = match std::fs::metadata(db_path) {
            Ok(metadata) => {
                if metadata.len() > MAX_VULN_DB_FILE_SIZE {
                    return Err(ScannerError::VulnDbLoad {
                        path: db_path.display().to_string(),
                        reason: format!(
                            "file size {} bytes exceeds maximum {} bytes",
                            metadata.len(),
                            MAX_VULN_DB_FILE_SIZE
                        ),
                    });
                }
                let content =
                    std::fs::read_to_string(db_path).map_err(|e| ScannerError::VulnDbLoad {
                        path: db_path.display().to_string(),
                        reason: e.to_string(),
                    })?;
                parse_entries(&content).map_err(|e| {
                    ScannerError::VulnDbParse(format!("failed to parse {}: {e}", db_path.display()))
                })?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %db_path.display(), "vuln db file not found, starting with empty database");
                Vec::new()
            }
            Err(e) => {
                return Err(ScannerError::VulnDbLoad {
                    path: db_path.display().to_string(),
                    reason: e.to_string(),
                });
            }
        };

        tracing::info!(path = %db_path.display(), entries = entries.len(), "loaded vuln db");
        Ok(Self::from_entries(entries, history_path))
    }

    /// 취약점 DB 없이 이력 파일만 다루는 저장소를 생성합니다.
    ///
    /// 이력 조회처럼 DB가 필요 없는 경로에서 사용합니다. `has_cves`는 항상 `false`입니다.
    pub fn history_only(history_path: impl Into<PathBuf>) -> Self {
        Self::from_entries(Vec::new(), history_path)
    }

    /// 엔트리 목록으로 저장소를 생성합니다.
    pub fn from_entries(entries: Vec<VulnDbEntry>, history_path: impl Into<PathBuf>) -> Self {
        let index = build_index(&entries);
        Self {
            entries,
            index,
            history_path: history_path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn history_path(&self) -> &Path {
        &self.history_path
    }

    /// `(product, version)`에 해당하는 엔트리를 반환합니다.
    pub fn lookup(&self, product: &str, version: &str) -> Vec<&VulnDbEntry> {
        let key = (product.to_owned(), version.to_owned());
        match self.index.get(&key) {
            Some(indices) => indices.iter().filter_map(|&i| self.entries.get(i)).collect(),
            None => Vec::new(),
        }
    }

    fn history_error(&self, reason: impl ToString) -> ScannerError {
        ScannerError::History {
            path: self.history_path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    fn read_history(&self) -> Result<Vec<StoredReport>, ScannerError> {
        let content = match std::fs::read_to_string(&self.history_path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.history_error(e)),
        };

        let mut stored = Vec::new();
        for (lineno, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<StoredReport>(line) {
                Ok(report) => stored.push(report),
                Err(e) => tracing::warn!(
                    path = %self.history_path.display(),
                    line = lineno + 1,
                    error = %e,
                    "skipping unparseable history line"
                ),
            }
        }
        Ok(stored)
    }
}

fn parse_entries(content: &str) -> Result<Vec<VulnDbEntry>, serde_json::Error> {
    let mut entries: Vec<VulnDbEntry> = serde_json::from_str(content)?;
    if entries.len() > MAX_VULN_DB_ENTRIES {
        tracing::warn!(
            entries = entries.len(),
            max = MAX_VULN_DB_ENTRIES,
            "vulnerability database entry limit reached, truncating"
        );
        entries.truncate(MAX_VULN_DB_ENTRIES);
    }
    Ok(entries)
}

fn build_index(entries: &[VulnDbEntry]) -> HashMap<(String, String), Vec<usize>> {
    let mut index: HashMap<(String, String), Vec<usize>> = HashMap::new();
    for (idx, entry) in entries.iter().enumerate() {
        for version in &entry.versions {
            let record = PackageRecord::new(entry.product.as_str(), version);
            let key = (record.product().to_owned(), record.version().to_owned());
            let slot = index.entry(key).or_default();
            if !slot.contains(&idx) {
                slot.push(idx);
            }
        }
    }
    index
}

impl VulnStore for JsonVulnStore {
    fn has_cves(&self, product: &str, version: &str) -> Result<bool, ScannerError> {
        Ok(self
            .index
            .contains_key(&(product.to_owned(), version.to_owned())))
    }

    fn insert_scan_result(&self, report: &ScanReport) -> Result<StoredReport, ScannerError> {
        let stored = StoredReport {
            id: new_report_id(),
            report: report.clone(),
        };
        let line = serde_json::to_string(&stored).map_err(|e| self.history_error(e))?;

        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| self.history_error("history write lock poisoned"))?;

        if let Some(parent) = self.history_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| self.history_error(e))?;
            }
        }

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.history_path)
            .map_err(|e| self.history_error(e))?;
        writeln!(file, "{line}").map_err(|e| self.history_error(e))?;

        tracing::debug!(id = %stored.id, image = report.image_name(), "stored scan result");
        Ok(stored)
    }

    fn get_history(&self, image_name: &str) -> Result<Vec<ScanReport>, ScannerError> {
        Ok(self
            .read_history()?
            .into_iter()
            .filter(|s| s.report.image_name() == image_name)
            .map(|s| s.report)
            .collect())
    }
}
