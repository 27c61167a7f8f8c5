//! 인벤토리 수집 에러 타입
//!
//! [`InventoryError`]는 컨테이너 런타임 호출과 인벤토리 수집 중 발생하는 모든 에러를 표현합니다.
//! `From<InventoryError> for DockvetError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.
//!
//! 매니페스트의 개별 라인 파싱 실패는 에러가 아닙니다. 파서는 해당 라인을 건너뜁니다.

use dockvet_core::error::{DockvetError, RuntimeError};

/// 인벤토리 수집 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    /// `/etc/os-release`에서 지원하는 배포판을 찾지 못함
    #[error("linux image distribution not supported: {name_line}")]
    UnsupportedDistribution {
        /// 발견된 `NAME=` 라인 (없으면 `<missing NAME= line>`)
        name_line: String,
    },

    /// Docker API 호출 실패
    #[error("docker api error: {0}")]
    DockerApi(String),

    /// Docker 소켓 연결 실패
    #[error("docker connection error: {0}")]
    DockerConnection(String),

    /// 컨테이너를 찾을 수 없음
    #[error("container not found: {0}")]
    ContainerNotFound(String),

    /// 컨테이너 내부 명령 실행 실패
    #[error("exec '{command}' failed in container '{container_id}': {reason}")]
    Exec {
        /// 대상 컨테이너 ID
        container_id: String,
        /// 실행한 명령
        command: String,
        /// 실패 사유
        reason: String,
    },

    /// 컨테이너 내부 명령 실행 시간 초과
    #[error("exec '{command}' timed out after {timeout_secs}s")]
    ExecTimeout {
        /// 실행한 명령
        command: String,
        /// 제한 시간 (초)
        timeout_secs: u64,
    },
}

impl From<InventoryError> for DockvetError {
    fn from(err: InventoryError) -> Self {
        match &err {
            InventoryError::UnsupportedDistribution { name_line } => {
                DockvetError::Runtime(RuntimeError::UnsupportedDistribution(name_line.clone()))
            }
            InventoryError::ContainerNotFound(id) => {
                DockvetError::Runtime(RuntimeError::NotFound(id.clone()))
            }
            InventoryError::Exec { .. } | InventoryError::ExecTimeout { .. } => {
                DockvetError::Runtime(RuntimeError::Exec(err.to_string()))
            }
            InventoryError::DockerApi(msg) | InventoryError::DockerConnection(msg) => {
                DockvetError::Runtime(RuntimeError::DockerApi(msg.clone()))
            }
        }
    }
}
