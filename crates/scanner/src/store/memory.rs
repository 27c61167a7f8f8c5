//! 메모리 기반 저장소

use std::collections::HashSet;
use std::sync::Mutex;

use dockvet_core::types::{PackageRecord, ScanReport, StoredReport};

use crate::error::ScannerError;
use crate::store::{VulnStore, new_report_id};

/// 메모리 기반 [`VulnStore`]
///
/// 취약한 `(product, version)` 집합과 이력을 프로세스 메모리에 보관합니다.
#[derive(Default)]
pub struct InMemoryVulnStore {
    vulnerable: HashSet<(String, String)>,
    history: Mutex<Vec<StoredReport>>,
}

impl InMemoryVulnStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 취약한 패키지를 추가합니다. 버전은 [`PackageRecord`] 규칙으로 정규화됩니다.
    pub fn with_vulnerable(mut self, product: &str, version: &str) -> Self {
        let record = PackageRecord::new(product, version);
        self.vulnerable
            .insert((record.product().to_owned(), record.version().to_owned()));
        self
    }

    /// 저장된 리포트 전체 (ID 포함)
    pub fn stored(&self) -> Vec<StoredReport> {
        self.history.lock().map(|h| h.clone()).unwrap_or_default()
    }
}

impl VulnStore for InMemoryVulnStore {
    fn has_cves(&self, product: &str, version: &str) -> Result<bool, ScannerError> {
        Ok(self
            .vulnerable
            .contains(&(product.to_owned(), version.to_owned())))
    }

    fn insert_scan_result(&self, report: &ScanReport) -> Result<StoredReport, ScannerError> {
        let stored = StoredReport {
            id: new_report_id(),
            report: report.clone(),
        };
        let mut history = self.history.lock().map_err(|_| ScannerError::History {
            path: "<memory>".to_owned(),
            reason: "history lock poisoned".to_owned(),
        })?;
        history.push(stored.clone());
        Ok(stored)
    }

    fn get_history(&self, image_name: &str) -> Result<Vec<ScanReport>, ScannerError> {
        let history = self.history.lock().map_err(|_| ScannerError::History {
            path: "<memory>".to_owned(),
            reason: "history lock poisoned".to_owned(),
        })?;
        Ok(history
            .iter()
            .filter(|s| s.report.image_name() == image_name)
            .map(|s| s.report.clone())
            .collect())
    }
}
