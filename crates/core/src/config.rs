//! 설정 관리 -- dockvet.toml 파싱 및 런타임 설정
//!
//! [`DockvetConfig`]는 모든 크레이트의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`DOCKVET_DOCKER_SOCKET=/run/docker.sock` 형식)
//! 3. 설정 파일 (`dockvet.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), dockvet_core::error::DockvetError> {
//! use dockvet_core::config::DockvetConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = DockvetConfig::load("dockvet.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = DockvetConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, DockvetError};

/// dockvet 통합 설정
///
/// `dockvet.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DockvetConfig {
    /// 일반 설정 (로깅)
    #[serde(default)]
    pub general: GeneralConfig,
    /// Docker 런타임 설정
    #[serde(default)]
    pub docker: DockerConfig,
    /// 취약점 DB / 스캔 이력 저장소 설정
    #[serde(default)]
    pub store: StoreConfig,
}

impl DockvetConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, DockvetError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 설정 파일이 없으면 기본값으로 시작합니다.
    ///
    /// CLI가 기본 경로(`dockvet.toml`)를 사용할 때만 쓰입니다.
    /// 명시적으로 지정된 경로가 없으면 [`load`](Self::load)로 에러를 반환해야 합니다.
    pub async fn load_or_default(path: impl AsRef<Path>) -> Result<Self, DockvetError> {
        let path = path.as_ref();
        let mut config = match Self::from_file(path).await {
            Ok(config) => config,
            Err(DockvetError::Config(ConfigError::FileNotFound { .. })) => {
                tracing::debug!(path = %path.display(), "config file not found, using defaults");
                Self::default()
            }
            Err(e) => return Err(e),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드, 검증 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, DockvetError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DockvetError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                DockvetError::Io(e)
            }
        })?;
        Self::parse(&content)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, DockvetError> {
        toml::from_str(toml_str).map_err(|e| {
            DockvetError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `DOCKVET_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "DOCKVET_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "DOCKVET_GENERAL_LOG_FORMAT");

        // Docker
        override_string(&mut self.docker.socket, "DOCKVET_DOCKER_SOCKET");
        override_u64(
            &mut self.docker.stop_timeout_secs,
            "DOCKVET_DOCKER_STOP_TIMEOUT_SECS",
        );
        override_u64(
            &mut self.docker.exec_timeout_secs,
            "DOCKVET_DOCKER_EXEC_TIMEOUT_SECS",
        );
        override_bool(
            &mut self.docker.remove_after_scan,
            "DOCKVET_DOCKER_REMOVE_AFTER_SCAN",
        );

        // Store
        override_string(&mut self.store.vuln_db_path, "DOCKVET_STORE_VULN_DB_PATH");
        override_string(&mut self.store.history_path, "DOCKVET_STORE_HISTORY_PATH");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), DockvetError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if self.store.vuln_db_path.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "store.vuln_db_path".to_owned(),
                reason: "must not be empty".to_owned(),
            }
            .into());
        }

        if self.store.history_path.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "store.history_path".to_owned(),
                reason: "must not be empty".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// Docker 런타임 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DockerConfig {
    /// Docker 소켓 경로 (빈 문자열이면 플랫폼 기본값)
    pub socket: String,
    /// 스캔용 컨테이너 정지 유예 시간 (초)
    pub stop_timeout_secs: u64,
    /// 컨테이너 내부 명령 실행 제한 시간 (초, 0이면 무제한)
    pub exec_timeout_secs: u64,
    /// 이미지 스캔 후 생성한 컨테이너 삭제 여부
    pub remove_after_scan: bool,
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            socket: String::new(),
            stop_timeout_secs: 10,
            exec_timeout_secs: 300,
            remove_after_scan: false,
        }
    }
}

/// 저장소 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// 취약점 DB JSON 파일 경로
    pub vuln_db_path: String,
    /// 스캔 이력 JSON-lines 파일 경로
    pub history_path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            vuln_db_path: "/var/lib/dockvet/vuln-db.json".to_owned(),
            history_path: "/var/lib/dockvet/history.jsonl".to_owned(),
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}
