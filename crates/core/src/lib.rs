//! dockvet 공통 크레이트
//!
//! 모든 크레이트가 공유하는 도메인 타입, 에러, 설정, 메트릭 이름을 정의합니다.
//!
//! - [`types`]: `PackageRecord`, `EvaluatedPackage`, `ScanReport`, `ContainerInfo`
//! - [`error`]: `DockvetError`와 도메인별 하위 에러
//! - [`config`]: `dockvet.toml` 로딩 및 환경변수 오버라이드
//! - [`metrics`]: 메트릭 이름 상수

pub mod config;
pub mod error;
pub mod metrics;
pub mod types;

// --- 주요 타입 re-export ---

// 에러
pub use error::{ConfigError, DockvetError, RuntimeError, StoreError};

// 설정
pub use config::DockvetConfig;

// 도메인 타입
pub use types::{
    ContainerInfo, EvaluatedPackage, PackageRecord, PackageStatus, ScanReport, StoredReport,
};
