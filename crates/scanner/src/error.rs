//! 스캐너 에러 타입
//!
//! [`ScannerError`]는 평가, 이력 저장, 수집 단계의 에러를 모두 포함합니다.
//! `From<ScannerError> for DockvetError` 구현을 통해 `?` 연산자로
//! 상위 에러 타입으로 전파됩니다.
//!
//! # 에러 카테고리
//!
//! - **인벤토리 수집**: `Inventory`
//! - **취약점 DB**: `VulnDbLoad`, `VulnDbParse`
//! - **스캔 이력**: `History`

use dockvet_core::error::{DockvetError, StoreError};
use dockvet_inventory::InventoryError;

/// 스캐너 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum ScannerError {
    /// 인벤토리 수집 실패
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    /// 취약점 DB 로딩 실패
    #[error("vulnerability db load error: {path}: {reason}")]
    VulnDbLoad {
        /// DB 파일 경로
        path: String,
        /// 로딩 실패 사유
        reason: String,
    },

    /// 취약점 DB 파싱 실패
    #[error("vulnerability db parse error: {0}")]
    VulnDbParse(String),

    /// 스캔 이력 읽기/쓰기 실패
    #[error("history error: {path}: {reason}")]
    History {
        /// 이력 파일 경로
        path: String,
        /// 실패 사유
        reason: String,
    },
}

impl From<ScannerError> for DockvetError {
    fn from(err: ScannerError) -> Self {
        match err {
            ScannerError::Inventory(e) => e.into(),
            ScannerError::VulnDbLoad { path, reason } => DockvetError::Store(StoreError::VulnDb(
                format!("vulnerability db load error: {path}: {reason}"),
            )),
            ScannerError::VulnDbParse(msg) => DockvetError::Store(StoreError::VulnDb(msg)),
            ScannerError::History { path, reason } => {
                DockvetError::Store(StoreError::History(format!("{path}: {reason}")))
            }
        }
    }
}
