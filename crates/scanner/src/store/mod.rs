//! 취약점 조회 및 스캔 이력 저장소
//!
//! [`VulnStore`] trait은 평가 엔진과 스캐너가 사용하는 영속성 인터페이스입니다.
//!
//! # 구현체
//!
//! - [`JsonVulnStore`]: 로컬 JSON 취약점 DB + JSON-lines 이력 파일
//! - [`InMemoryVulnStore`]: 메모리 기반 (테스트 / 임베딩용)
//!
//! 조회는 `(product, version)` 완전 일치입니다. 버전 범위 비교는 하지 않습니다.

pub mod json;
pub mod memory;

pub use json::{JsonVulnStore, VulnDbEntry};
pub use memory::InMemoryVulnStore;

use dockvet_core::types::{ScanReport, StoredReport};

use crate::error::ScannerError;

/// 취약점 조회 + 스캔 이력 저장소
///
/// 모든 메서드는 동기 호출입니다. 평가는 레코드마다 한 번씩 순차적으로 호출합니다.
pub trait VulnStore: Send + Sync {
    /// `(product, version)`에 알려진 CVE가 있는지 확인합니다.
    fn has_cves(&self, product: &str, version: &str) -> Result<bool, ScannerError>;

    /// 스캔 리포트를 저장하고 저장소 ID를 부여합니다.
    fn insert_scan_result(&self, report: &ScanReport) -> Result<StoredReport, ScannerError>;

    /// 이미지의 스캔 이력을 저장 순서대로 반환합니다.
    fn get_history(&self, image_name: &str) -> Result<Vec<ScanReport>, ScannerError>;
}

/// 저장소 ID 생성 (UUID v4)
pub(crate) fn new_report_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
