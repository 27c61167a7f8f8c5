//! 에러 타입 -- 도메인별 에러 정의

/// dockvet 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum DockvetError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 컨테이너 런타임 / 인벤토리 수집 에러
    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError),

    /// 취약점 DB / 스캔 이력 저장소 에러
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 컨테이너 런타임 에러
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// Docker API 호출 실패
    #[error("docker api error: {0}")]
    DockerApi(String),

    /// 컨테이너를 찾을 수 없음
    #[error("container not found: {0}")]
    NotFound(String),

    /// 컨테이너 내부 명령 실행 실패
    #[error("exec failed: {0}")]
    Exec(String),

    /// 지원하지 않는 리눅스 배포판
    #[error("unsupported distribution: {0}")]
    UnsupportedDistribution(String),
}

/// 저장소 에러
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// 취약점 DB 로딩 실패
    #[error("vulnerability db error: {0}")]
    VulnDb(String),

    /// 스캔 이력 읽기/쓰기 실패
    #[error("history error: {0}")]
    History(String),
}
