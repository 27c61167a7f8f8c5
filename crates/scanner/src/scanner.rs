//! 스캔 오케스트레이터 -- 수집 → 평가 → 저장 → 출력 변환
//!
//! [`ImageScanner`]는 [`InventoryCollector`], [`Evaluator`], [`VulnStore`]를 묶어
//! 한 번의 스캔을 순차적으로 수행합니다.

use std::sync::Arc;

use chrono::Utc;

use dockvet_core::metrics as m;
use dockvet_core::types::ScanReport;
use dockvet_inventory::{CollectorConfig, ContainerRuntime, Inventory, InventoryCollector};

use crate::error::ScannerError;
use crate::evaluate::Evaluator;
use crate::report::OutputReport;
use crate::store::VulnStore;

/// 이미지 / 컨테이너 스캐너
pub struct ImageScanner<R: ContainerRuntime, S: VulnStore> {
    collector: InventoryCollector<R>,
    evaluator: Evaluator<S>,
    store: Arc<S>,
}

impl<R: ContainerRuntime, S: VulnStore> ImageScanner<R, S> {
    pub fn new(runtime: Arc<R>, store: Arc<S>, config: CollectorConfig) -> Self {
        Self::with_collector(InventoryCollector::new(runtime, config), store)
    }

    /// 미리 구성한 수집기로 스캐너를 생성합니다.
    pub fn with_collector(collector: InventoryCollector<R>, store: Arc<S>) -> Self {
        Self {
            collector,
            evaluator: Evaluator::new(Arc::clone(&store)),
            store,
        }
    }

    pub fn collector(&self) -> &InventoryCollector<R> {
        &self.collector
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// 이미지로 컨테이너를 띄워 스캔합니다.
    pub async fn scan_image(&self, image: &str) -> Result<OutputReport, ScannerError> {
        let result = match self.collector.collect_from_image(image).await {
            Ok(inventory) => self.finish(inventory),
            Err(e) => Err(e.into()),
        };
        record_scan(&result);
        result
    }

    /// 실행 중인 컨테이너를 스캔합니다.
    pub async fn scan_container(&self, container_id: &str) -> Result<OutputReport, ScannerError> {
        let result = match self.collector.collect_from_container(container_id).await {
            Ok(inventory) => self.finish(inventory),
            Err(e) => Err(e.into()),
        };
        record_scan(&result);
        result
    }

    /// 이미지의 저장된 스캔 이력을 저장 순서대로 반환합니다.
    pub fn history(&self, image: &str) -> Result<Vec<ScanReport>, ScannerError> {
        self.store.get_history(image)
    }

    fn finish(&self, inventory: Inventory) -> Result<OutputReport, ScannerError> {
        // 스캔당 한 번만 캡처
        let timestamp = Utc::now();
        let report = self
            .evaluator
            .evaluate(&inventory.image_name, inventory.packages, timestamp)?;

        let stored = self.store.insert_scan_result(&report)?;
        tracing::info!(
            id = %stored.id,
            image = report.image_name(),
            family = %inventory.family,
            total = report.total_products(),
            vuln = report.vuln_products(),
            "scan completed"
        );

        Ok(OutputReport::from_report(&report))
    }
}

fn record_scan(result: &Result<OutputReport, ScannerError>) {
    let outcome = if result.is_ok() { "success" } else { "failure" };
    metrics::counter!(m::SCANNER_SCANS_TOTAL, m::LABEL_RESULT => outcome).increment(1);
}
