//! dockvet 스캐너
//!
//! 인벤토리를 취약점 저장소와 대조해 리포트를 만들고 이력을 저장합니다.
//!
//! # Module Structure
//!
//! - [`error`]: 도메인 에러 (`ScannerError`)
//! - [`store`]: 영속성 (`VulnStore` trait, `JsonVulnStore`, `InMemoryVulnStore`)
//! - [`evaluate`]: 평가 엔진 (`Evaluator`)
//! - [`report`]: 출력 변환 (`OutputReport`, `HistoryReport`)
//! - [`scanner`]: 오케스트레이터 (`ImageScanner`)
//!
//! # Architecture
//!
//! ```text
//! InventoryCollector --> Vec<PackageRecord>
//!                             |
//!                        Evaluator (VulnStore::has_cves)
//!                             |
//!                        ScanReport --> VulnStore::insert_scan_result
//!                             |
//!                        OutputReport --> stdout
//! ```

pub mod error;
pub mod evaluate;
pub mod report;
pub mod scanner;
pub mod store;

// --- Public API Re-exports ---

pub use error::ScannerError;
pub use evaluate::Evaluator;
pub use report::{HistoryReport, OUTPUT_TIMESTAMP_FORMAT, OutputReport, format_output_timestamp};
pub use scanner::ImageScanner;
pub use store::{InMemoryVulnStore, JsonVulnStore, VulnDbEntry, VulnStore};
