//! 평가 엔진 -- 패키지 레코드마다 취약점 저장소를 조회해 상태를 부여

use std::sync::Arc;

use chrono::{DateTime, Utc};

use dockvet_core::metrics as m;
use dockvet_core::types::{EvaluatedPackage, PackageRecord, PackageStatus, ScanReport};

use crate::error::ScannerError;
use crate::store::VulnStore;

/// 평가 엔진
///
/// 레코드 순서대로 한 번씩 [`VulnStore::has_cves`]를 호출합니다.
pub struct Evaluator<S: VulnStore> {
    store: Arc<S>,
}

impl<S: VulnStore> Evaluator<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// 레코드 목록을 평가해 리포트를 조립합니다.
    ///
    /// 빈 목록은 모든 카운트가 0인 리포트가 됩니다.
    ///
    /// # Errors
    ///
    /// 저장소 조회 실패 시 첫 번째 에러를 그대로 반환합니다.
    pub fn evaluate(
        &self,
        image_name: &str,
        packages: Vec<PackageRecord>,
        timestamp: DateTime<Utc>,
    ) -> Result<ScanReport, ScannerError> {
        let mut evaluated = Vec::with_capacity(packages.len());

        for record in packages {
            let status = if self.store.has_cves(record.product(), record.version())? {
                PackageStatus::Vuln
            } else {
                PackageStatus::Ok
            };
            tracing::trace!(product = record.product(), version = record.version(), %status, "evaluated package");
            metrics::counter!(m::SCANNER_PACKAGES_EVALUATED_TOTAL, m::LABEL_STATUS => status.to_string())
                .increment(1);
            evaluated.push(EvaluatedPackage::new(record, status));
        }

        let report = ScanReport::new(image_name, timestamp, evaluated);
        tracing::info!(
            image = image_name,
            total = report.total_products(),
            vuln = report.vuln_products(),
            "evaluation completed"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryVulnStore;
    use dockvet_core::types::StoredReport;

    struct FailingStore;

    impl VulnStore for FailingStore {
        fn has_cves(&self, _product: &str, _version: &str) -> Result<bool, ScannerError> {
            Err(ScannerError::VulnDbParse("db unavailable".to_owned()))
        }

        fn insert_scan_result(&self, _report: &ScanReport) -> Result<StoredReport, ScannerError> {
            unreachable!("not used by evaluator")
        }

        fn get_history(&self, _image_name: &str) -> Result<Vec<ScanReport>, ScannerError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn marks_vulnerable_and_ok_in_order() {
        let store = InMemoryVulnStore::new().with_vulnerable("openssl", "1.1.1k");
        let evaluator = Evaluator::new(Arc::new(store));

        let report = evaluator
            .evaluate(
                "centos:8",
                vec![
                    PackageRecord::new("bash", "5.0.17"),
                    PackageRecord::new("openssl", "1.1.1k"),
                    PackageRecord::new("zlib", "1.2.11"),
                ],
                Utc::now(),
            )
            .unwrap();

        let statuses: Vec<_> = report
            .evaluated_packages()
            .iter()
            .map(|p| (p.product(), p.status()))
            .collect();
        assert_eq!(
            statuses,
            vec![
                ("bash", PackageStatus::Ok),
                ("openssl", PackageStatus::Vuln),
                ("zlib", PackageStatus::Ok),
            ]
        );
        assert_eq!(report.total_products(), 3);
        assert_eq!(report.vuln_products(), 1);
        assert_eq!(report.ok_products(), 2);
    }

    #[test]
    fn empty_inventory_gives_zero_counts() {
        let evaluator = Evaluator::new(Arc::new(InMemoryVulnStore::new()));
        let report = evaluator.evaluate("scratch", Vec::new(), Utc::now()).unwrap();
        assert_eq!(report.total_products(), 0);
        assert_eq!(report.vuln_products(), 0);
        assert_eq!(report.ok_products(), 0);
        assert!(report.evaluated_packages().is_empty());
    }

    #[test]
    fn duplicates_are_evaluated_separately() {
        let store = InMemoryVulnStore::new().with_vulnerable("libc6", "2.31");
        let evaluator = Evaluator::new(Arc::new(store));
        let report = evaluator
            .evaluate(
                "ubuntu:20.04",
                vec![PackageRecord::new("libc6", "2.31"), PackageRecord::new("libc6", "2.31")],
                Utc::now(),
            )
            .unwrap();
        assert_eq!(report.total_products(), 2);
        assert_eq!(report.vuln_products(), 2);
    }

    #[test]
    fn store_error_propagates() {
        let evaluator = Evaluator::new(Arc::new(FailingStore));
        let err = evaluator
            .evaluate("x", vec![PackageRecord::new("bash", "5.0")], Utc::now())
            .unwrap_err();
        assert!(matches!(err, ScannerError::VulnDbParse(_)));
    }
}
