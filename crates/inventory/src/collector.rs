//! 인벤토리 수집기 -- 컨테이너 안의 설치 패키지 목록 수집
//!
//! [`InventoryCollector`]는 [`ContainerRuntime`]을 통해 컨테이너 내부에서
//! `/etc/os-release`와 패키지 목록 명령을 실행하고, 결과를 [`ParserRegistry`]의
//! 파서로 [`PackageRecord`] 목록으로 변환합니다.
//!
//! # 수명 주기
//!
//! - [`collect_from_image`](InventoryCollector::collect_from_image):
//!   컨테이너를 생성/시작하고, 검사 결과와 관계없이 항상 정지를 시도합니다.
//! - [`collect_from_container`](InventoryCollector::collect_from_container):
//!   이미 실행 중인 컨테이너를 사용하며 생성/시작/정지하지 않습니다.

use std::sync::Arc;
use std::time::Duration;

use dockvet_core::config::DockerConfig;
use dockvet_core::metrics as m;
use dockvet_core::types::PackageRecord;

use crate::distro::{self, DistroFamily, OS_RELEASE_COMMAND};
use crate::docker::{ContainerRuntime, ExecOutput};
use crate::error::InventoryError;
use crate::parser::ParserRegistry;

/// 수집기 설정
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectorConfig {
    /// 생성한 컨테이너 정지 유예 시간 (초)
    pub stop_timeout_secs: u64,
    /// exec 제한 시간 (초, 0이면 무제한)
    pub exec_timeout_secs: u64,
    /// 정지 후 생성한 컨테이너 삭제 여부
    pub remove_after_scan: bool,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self::from(&DockerConfig::default())
    }
}

impl From<&DockerConfig> for CollectorConfig {
    fn from(config: &DockerConfig) -> Self {
        Self {
            stop_timeout_secs: config.stop_timeout_secs,
            exec_timeout_secs: config.exec_timeout_secs,
            remove_after_scan: config.remove_after_scan,
        }
    }
}

/// 수집 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inventory {
    /// 스캔 대상 이미지 이름
    pub image_name: String,
    /// 판별된 배포판 계열
    pub family: DistroFamily,
    /// 파싱된 패키지 레코드 (매니페스트 순서)
    pub packages: Vec<PackageRecord>,
}

/// 컨테이너 인벤토리 수집기
pub struct InventoryCollector<R: ContainerRuntime> {
    runtime: Arc<R>,
    registry: ParserRegistry,
    config: CollectorConfig,
}

impl<R: ContainerRuntime> InventoryCollector<R> {
    /// 기본 파서 레지스트리로 수집기를 생성합니다.
    pub fn new(runtime: Arc<R>, config: CollectorConfig) -> Self {
        Self::with_registry(runtime, ParserRegistry::new(), config)
    }

    pub fn with_registry(runtime: Arc<R>, registry: ParserRegistry, config: CollectorConfig) -> Self {
        Self {
            runtime,
            registry,
            config,
        }
    }

    pub fn runtime(&self) -> &Arc<R> {
        &self.runtime
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// 이미지로 컨테이너를 띄워 인벤토리를 수집합니다.
    ///
    /// 컨테이너 정지는 검사 실패 시에도 시도됩니다. 검사가 실패했다면 정지 실패는
    /// 경고로만 기록하고 검사 에러를 반환합니다. `remove_after_scan`이 켜져 있으면
    /// 결과와 관계없이 정지 시도 후 삭제합니다.
    ///
    /// # Errors
    ///
    /// - `DockerApi`: 컨테이너 생성/시작/정지 실패
    /// - `UnsupportedDistribution`: 지원하지 않는 배포판
    /// - `Exec`, `ExecTimeout`: 컨테이너 내부 명령 실패
    pub async fn collect_from_image(&self, image: &str) -> Result<Inventory, InventoryError> {
        let container_id = self.runtime.create_container(image).await?;
        tracing::info!(image, container_id = %container_id, "created scan container");

        let inspected = match self.runtime.start_container(&container_id).await {
            Ok(()) => self.inspect(&container_id).await,
            Err(e) => Err(e),
        };

        let stopped = self
            .runtime
            .stop_container(&container_id, self.config.stop_timeout_secs)
            .await;

        // 정지/검사 결과와 무관하게 삭제 요청은 처리
        if self.config.remove_after_scan {
            if let Err(e) = self.runtime.remove_container(&container_id).await {
                tracing::warn!(container_id = %container_id, error = %e, "failed to remove scan container");
            }
        }

        let packages = match (inspected, stopped) {
            (Ok(result), Ok(())) => result,
            (Ok(_), Err(stop_err)) => return Err(stop_err),
            (Err(inspect_err), Err(stop_err)) => {
                tracing::warn!(
                    container_id = %container_id,
                    error = %stop_err,
                    "failed to stop scan container after inspection failure"
                );
                return Err(inspect_err);
            }
            (Err(inspect_err), Ok(())) => return Err(inspect_err),
        };
        tracing::debug!(container_id = %container_id, "stopped scan container");

        let (family, packages) = packages;
        Ok(Inventory {
            image_name: image.to_owned(),
            family,
            packages,
        })
    }

    /// 실행 중인 컨테이너에서 인벤토리를 수집합니다. 컨테이너 상태는 바꾸지 않습니다.
    ///
    /// # Errors
    ///
    /// - `ContainerNotFound`: 알 수 없는 컨테이너
    /// - 그 외 [`collect_from_image`](Self::collect_from_image)와 같음
    pub async fn collect_from_container(
        &self,
        container_id: &str,
    ) -> Result<Inventory, InventoryError> {
        let info = self.runtime.container_info(container_id).await?;
        tracing::info!(container_id, image = %info.image, "scanning running container");

        let (family, packages) = self.inspect(container_id).await?;
        Ok(Inventory {
            image_name: info.image,
            family,
            packages,
        })
    }

    /// os-release로 계열을 판별한 뒤 목록 명령 출력을 파싱합니다.
    async fn inspect(
        &self,
        container_id: &str,
    ) -> Result<(DistroFamily, Vec<PackageRecord>), InventoryError> {
        let os_release = self.exec(container_id, OS_RELEASE_COMMAND).await?.text();
        let name_line = distro::os_name_line(&os_release);
        let family = DistroFamily::classify(name_line);

        let (Some(command), Some(parser)) = (family.listing_command(), self.registry.get(family))
        else {
            return Err(InventoryError::UnsupportedDistribution {
                name_line: name_line.unwrap_or("<missing NAME= line>").to_owned(),
            });
        };
        tracing::debug!(container_id, %family, "classified distribution");

        let manifest = self.exec(container_id, command).await?.text();
        let packages = parser.parse(&manifest);

        metrics::counter!(m::INVENTORY_PACKAGES_PARSED_TOTAL, m::LABEL_FAMILY => family.to_string())
            .increment(packages.len() as u64);
        tracing::info!(container_id, %family, packages = packages.len(), "parsed package manifest");

        Ok((family, packages))
    }

    async fn exec(&self, container_id: &str, cmd: &[&str]) -> Result<ExecOutput, InventoryError> {
        let fut = self.runtime.exec(container_id, cmd);
        let result = if self.config.exec_timeout_secs == 0 {
            fut.await
        } else {
            tokio::time::timeout(Duration::from_secs(self.config.exec_timeout_secs), fut)
                .await
                .unwrap_or_else(|_| {
                    Err(InventoryError::ExecTimeout {
                        command: cmd.join(" "),
                        timeout_secs: self.config.exec_timeout_secs,
                    })
                })
        };

        let outcome = if result.is_ok() { "success" } else { "failure" };
        metrics::counter!(m::INVENTORY_EXECS_TOTAL, m::LABEL_RESULT => outcome).increment(1);
        result
    }
}
