//! 리포트 조립 -- 저장용 리포트를 출력 형식으로 변환
//!
//! 두 가지 표현이 있습니다.
//!
//! - [`OutputReport`]: 스캔 직후 출력. `timestamp`는 UTC 문자열
//!   (`"%Y-%m-%d %H:%M:%S"`, 마이크로초가 0이 아니면 `.ffffff` 추가),
//!   저장소 ID는 포함하지 않습니다.
//! - [`HistoryReport`]: 저장된 그대로의 [`ScanReport`]. `timestamp`는 epoch 초 실수.
//!
//! 두 형식 모두 `{image_name, timestamp, evaluated_packages_info, total_products,
//! vuln_products, ok_products}` 구조로 직렬화됩니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dockvet_core::types::{EvaluatedPackage, ScanReport};

/// 출력용 타임스탬프 형식 (초 단위)
pub const OUTPUT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 소수부 형식, 마이크로초가 0이 아닐 때만 붙음
const OUTPUT_FRACTION_FORMAT: &str = "%.6f";

/// 출력용 UTC 타임스탬프 문자열을 만듭니다.
///
/// `2020-09-13 12:26:40` 또는 `2020-09-13 12:26:40.123456`
pub fn format_output_timestamp(ts: DateTime<Utc>) -> String {
    if ts.timestamp_subsec_micros() == 0 {
        ts.format(OUTPUT_TIMESTAMP_FORMAT).to_string()
    } else {
        ts.format(&format!("{OUTPUT_TIMESTAMP_FORMAT}{OUTPUT_FRACTION_FORMAT}"))
            .to_string()
    }
}

/// 이력 조회 결과 (저장 형식 그대로)
pub type HistoryReport = ScanReport;

/// 스캔 출력 리포트
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputReport {
    pub image_name: String,
    pub timestamp: String,
    pub evaluated_packages_info: Vec<EvaluatedPackage>,
    pub total_products: usize,
    pub vuln_products: usize,
    pub ok_products: usize,
}

impl OutputReport {
    pub fn from_report(report: &ScanReport) -> Self {
        Self {
            image_name: report.image_name().to_owned(),
            timestamp: format_output_timestamp(report.timestamp()),
            evaluated_packages_info: report.evaluated_packages().to_vec(),
            total_products: report.total_products(),
            vuln_products: report.vuln_products(),
            ok_products: report.ok_products(),
        }
    }

    /// 취약 패키지만 반환합니다.
    pub fn vulnerable_packages(&self) -> impl Iterator<Item = &EvaluatedPackage> {
        self.evaluated_packages_info.iter().filter(|p| p.is_vulnerable())
    }
}

impl From<&ScanReport> for OutputReport {
    fn from(report: &ScanReport) -> Self {
        Self::from_report(report)
    }
}
