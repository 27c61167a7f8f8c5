//! dockvet 인벤토리 수집
//!
//! 컨테이너 안에서 설치된 패키지 목록을 수집해 `(product, version)` 레코드로 변환합니다.
//!
//! # Module Structure
//!
//! - [`error`]: 도메인 에러 (`InventoryError`)
//! - [`distro`]: `/etc/os-release` 기반 배포판 판별 (`DistroFamily`)
//! - [`parser`]: rpm / dpkg / apk 매니페스트 파서 (`ManifestParser`, `ParserRegistry`)
//! - [`docker`]: 컨테이너 런타임 추상화 (`ContainerRuntime` trait, `BollardRuntime`)
//! - [`collector`]: 수집 오케스트레이션 (`InventoryCollector`)
//!
//! # Architecture
//!
//! ```text
//! image / container id
//!        |
//!   ContainerRuntime.exec("cat /etc/os-release")
//!        |
//!   DistroFamily::classify() --> listing command
//!        |
//!   ContainerRuntime.exec(listing command)
//!        |
//!   ParserRegistry.get(family).parse() --> Vec<PackageRecord>
//! ```

pub mod collector;
pub mod distro;
pub mod docker;
pub mod error;
pub mod parser;

// --- Public API Re-exports ---

// Collector
pub use collector::{CollectorConfig, Inventory, InventoryCollector};

// Error
pub use error::InventoryError;

// Distribution
pub use distro::{DistroFamily, os_name_line};

// Runtime
pub use docker::{BollardRuntime, ContainerRuntime, ExecOutput, validate_container_id};

// Parsers
pub use parser::{ApkParser, DpkgParser, ManifestParser, ParserRegistry, RpmParser};
