//! 메트릭 상수
//!
//! 모든 메트릭의 이름을 중앙에서 정의합니다.
//! 각 크레이트는 이 상수를 사용하여 `metrics::counter!()` 매크로를 호출합니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `dockvet_`
//! - 모듈명: `inventory_`, `scanner_`
//! - 접미어: `_total` (counter)

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 배포판 계열 레이블 키 (redhat, debian, alpine)
pub const LABEL_FAMILY: &str = "family";

/// 패키지 상태 레이블 키 (OK, VULN)
pub const LABEL_STATUS: &str = "status";

/// 결과 레이블 키 (success, failure)
pub const LABEL_RESULT: &str = "result";

// ─── Inventory 메트릭 ──────────────────────────────────────────────

/// Inventory: 매니페스트에서 파싱된 패키지 수 (counter, label: family)
pub const INVENTORY_PACKAGES_PARSED_TOTAL: &str = "dockvet_inventory_packages_parsed_total";

/// Inventory: 컨테이너 내부 명령 실행 수 (counter, label: result)
pub const INVENTORY_EXECS_TOTAL: &str = "dockvet_inventory_execs_total";

// ─── Scanner 메트릭 ────────────────────────────────────────────────

/// Scanner: 평가된 패키지 수 (counter, label: status)
pub const SCANNER_PACKAGES_EVALUATED_TOTAL: &str = "dockvet_scanner_packages_evaluated_total";

/// Scanner: 완료된 스캔 수 (counter, label: result)
pub const SCANNER_SCANS_TOTAL: &str = "dockvet_scanner_scans_total";
