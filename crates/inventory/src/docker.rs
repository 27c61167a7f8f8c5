//! Container runtime abstraction for testability.
//!
//! The [`ContainerRuntime`] trait abstracts the bollard Docker API, allowing
//! production code to use [`BollardRuntime`] while tests use `MockRuntime`.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────┐
//! │ InventoryCollector │
//! └─────────┬──────────┘
//!           │
//!           ▼
//!  ┌──────────────────┐
//!  │ ContainerRuntime │ (trait)
//!  └──────────────────┘
//!        │       │
//!        ▼       ▼
//!  ┌─────────┐ ┌──────┐
//!  │ Bollard │ │ Mock │
//!  └────┬────┘ └──────┘
//!       │
//!       ▼
//!  Docker Daemon
//! ```
//!
//! # Container ID Validation
//!
//! All methods that accept container IDs validate them first:
//! - Must be 1-64 characters
//! - Must contain only ASCII hex digits ([0-9a-fA-F])

use std::future::Future;
use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use futures::StreamExt;

use dockvet_core::types::ContainerInfo;

use crate::error::InventoryError;

/// Validates a container ID before it reaches the Docker API.
///
/// Docker container IDs are 64-character hex strings (or shorter prefix forms).
pub fn validate_container_id(id: &str) -> Result<(), InventoryError> {
    if id.is_empty() || id.len() > 64 {
        return Err(InventoryError::DockerApi(format!(
            "invalid container ID: length {} (must be 1-64)",
            id.len()
        )));
    }
    if !id.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(InventoryError::DockerApi(
            "invalid container ID: contains non-hex characters".to_owned(),
        ));
    }
    Ok(())
}

/// Result of running a command inside a container.
#[derive(Debug, Clone)]
pub struct ExecOutput {
    /// Exec instance ID assigned by the runtime
    pub exec_id: String,
    /// Captured standard output
    pub output: Bytes,
}

impl ExecOutput {
    /// Decodes the output as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }
}

/// Trait abstracting container runtime operations.
///
/// The trait is `Send + Sync + 'static`, allowing safe sharing across async contexts.
///
/// # Implementations
///
/// - [`BollardRuntime`]: Production implementation using the `bollard` library
/// - `MockRuntime`: Test implementation with configurable responses (available in tests only)
///
/// # Error Handling
///
/// - **404 errors**: Converted to `InventoryError::ContainerNotFound`
/// - **Connection errors**: Wrapped as `InventoryError::DockerConnection`
/// - **Exec failures**: Wrapped as `InventoryError::Exec`
pub trait ContainerRuntime: Send + Sync + 'static {
    /// Creates a container from `image` with a TTY attached so it stays up
    /// after start. Returns the new container ID.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::DockerApi` if the image cannot be found or the
    /// container cannot be created.
    fn create_container(
        &self,
        image: &str,
    ) -> impl Future<Output = Result<String, InventoryError>> + Send;

    /// Starts a created container.
    fn start_container(&self, id: &str) -> impl Future<Output = Result<(), InventoryError>> + Send;

    /// Stops a container, sending SIGKILL after `timeout_secs`.
    ///
    /// # Errors
    ///
    /// - `InventoryError::ContainerNotFound`: Container does not exist (404)
    /// - `InventoryError::DockerApi`: Invalid ID or other API errors
    fn stop_container(
        &self,
        id: &str,
        timeout_secs: u64,
    ) -> impl Future<Output = Result<(), InventoryError>> + Send;

    /// Removes a stopped container.
    fn remove_container(&self, id: &str)
    -> impl Future<Output = Result<(), InventoryError>> + Send;

    /// Runs `cmd` inside the container and collects its standard output.
    ///
    /// # Arguments
    ///
    /// - `id`: Container ID. Must be 1-64 hex characters.
    /// - `cmd`: Program and arguments (no shell interpretation)
    ///
    /// # Errors
    ///
    /// - `InventoryError::Exec`: The exec instance could not be created, started or read
    fn exec(
        &self,
        id: &str,
        cmd: &[&str],
    ) -> impl Future<Output = Result<ExecOutput, InventoryError>> + Send;

    /// Looks up a container and the image it was created from.
    ///
    /// # Errors
    ///
    /// - `InventoryError::ContainerNotFound`: Container does not exist (404)
    fn container_info(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<ContainerInfo, InventoryError>> + Send;

    /// Checks runtime daemon connectivity.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::DockerConnection` if the daemon is unreachable.
    fn ping(&self) -> impl Future<Output = Result<(), InventoryError>> + Send;
}

/// Production container runtime using `bollard`.
///
/// Communicates with the Docker daemon via a Unix socket.
/// Internally uses `Arc<bollard::Docker>` for safe sharing across async tasks.
///
/// # Connection Management
///
/// - Connection timeout: 120 seconds
/// - API version: Default (auto-negotiated)
/// - Socket path: Configurable (default: platform socket)
///
/// # Examples
///
/// ```ignore
/// use dockvet_inventory::BollardRuntime;
///
/// let runtime = BollardRuntime::connect_local()?;
/// let runtime = BollardRuntime::connect_with_socket("/run/docker.sock")?;
/// # Ok::<(), dockvet_inventory::InventoryError>(())
/// ```
pub struct BollardRuntime {
    docker: Arc<bollard::Docker>,
}

impl BollardRuntime {
    /// Connects to Docker using the default local socket.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::DockerConnection` if the connection fails
    /// (e.g., socket not found, permission denied, daemon not running).
    pub fn connect_local() -> Result<Self, InventoryError> {
        let docker = bollard::Docker::connect_with_local_defaults().map_err(|e| {
            InventoryError::DockerConnection(format!("failed to connect to docker: {e}"))
        })?;
        Ok(Self {
            docker: Arc::new(docker),
        })
    }

    /// Connects to Docker using a specific socket path.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::DockerConnection` if the connection fails.
    pub fn connect_with_socket(socket_path: &str) -> Result<Self, InventoryError> {
        let docker =
            bollard::Docker::connect_with_socket(socket_path, 120, bollard::API_DEFAULT_VERSION)
                .map_err(|e| {
                    InventoryError::DockerConnection(format!(
                        "failed to connect to docker at {socket_path}: {e}"
                    ))
                })?;
        Ok(Self {
            docker: Arc::new(docker),
        })
    }

    /// Connects to `socket_path`, or to the local default when it is empty.
    pub fn connect(socket_path: &str) -> Result<Self, InventoryError> {
        if socket_path.is_empty() {
            Self::connect_local()
        } else {
            Self::connect_with_socket(socket_path)
        }
    }
}

fn is_not_found(err: &bollard::errors::Error) -> bool {
    matches!(
        err,
        bollard::errors::Error::DockerResponseServerError {
            status_code: 404,
            ..
        }
    )
}

impl ContainerRuntime for BollardRuntime {
    async fn create_container(&self, image: &str) -> Result<String, InventoryError> {
        use bollard::container::{Config, CreateContainerOptions};

        let config = Config {
            image: Some(image.to_owned()),
            tty: Some(true),
            open_stdin: Some(true),
            ..Default::default()
        };

        let response = self
            .docker
            .create_container(None::<CreateContainerOptions<String>>, config)
            .await
            .map_err(|e| {
                InventoryError::DockerApi(format!("create container from '{image}' failed: {e}"))
            })?;

        for warning in &response.warnings {
            tracing::warn!(image, warning = %warning, "docker reported warning on create");
        }

        Ok(response.id)
    }

    async fn start_container(&self, id: &str) -> Result<(), InventoryError> {
        validate_container_id(id)?;

        use bollard::container::StartContainerOptions;

        self.docker
            .start_container(id, None::<StartContainerOptions<String>>)
            .await
            .map_err(|e| {
                if is_not_found(&e) {
                    InventoryError::ContainerNotFound(id.to_owned())
                } else {
                    InventoryError::DockerApi(format!("start container failed: {e}"))
                }
            })
    }

    async fn stop_container(&self, id: &str, timeout_secs: u64) -> Result<(), InventoryError> {
        validate_container_id(id)?;

        use bollard::container::StopContainerOptions;

        let t = i64::try_from(timeout_secs).unwrap_or(i64::MAX);
        self.docker
            .stop_container(id, Some(StopContainerOptions { t }))
            .await
            .map_err(|e| {
                if is_not_found(&e) {
                    InventoryError::ContainerNotFound(id.to_owned())
                } else {
                    InventoryError::DockerApi(format!("stop container failed: {e}"))
                }
            })
    }

    async fn remove_container(&self, id: &str) -> Result<(), InventoryError> {
        validate_container_id(id)?;

        use bollard::container::RemoveContainerOptions;

        self.docker
            .remove_container(
                id,
                Some(RemoveContainerOptions {
                    force: true,
                    ..Default::default()
                }),
            )
            .await
            .map_err(|e| {
                if is_not_found(&e) {
                    InventoryError::ContainerNotFound(id.to_owned())
                } else {
                    InventoryError::DockerApi(format!("remove container failed: {e}"))
                }
            })
    }

    async fn exec(&self, id: &str, cmd: &[&str]) -> Result<ExecOutput, InventoryError> {
        validate_container_id(id)?;

        use bollard::exec::{CreateExecOptions, StartExecResults};

        let command = cmd.join(" ");
        let exec_failed = |reason: String| InventoryError::Exec {
            container_id: id.to_owned(),
            command: command.clone(),
            reason,
        };

        let options = CreateExecOptions {
            attach_stdout: Some(true),
            attach_stderr: Some(false),
            cmd: Some(cmd.iter().map(|s| (*s).to_owned()).collect::<Vec<String>>()),
            ..Default::default()
        };

        let exec = self
            .docker
            .create_exec(id, options)
            .await
            .map_err(|e| exec_failed(format!("create exec failed: {e}")))?;

        let started = self
            .docker
            .start_exec(&exec.id, None)
            .await
            .map_err(|e| exec_failed(format!("start exec failed: {e}")))?;

        let mut buf = BytesMut::new();
        match started {
            StartExecResults::Attached { mut output, .. } => {
                while let Some(chunk) = output.next().await {
                    let chunk =
                        chunk.map_err(|e| exec_failed(format!("read exec output failed: {e}")))?;
                    buf.extend_from_slice(&chunk.into_bytes());
                }
            }
            StartExecResults::Detached => {
                return Err(exec_failed("exec started detached".to_owned()));
            }
        }

        tracing::debug!(
            container_id = id,
            exec_id = %exec.id,
            command = %command,
            bytes = buf.len(),
            "exec completed"
        );

        Ok(ExecOutput {
            exec_id: exec.id,
            output: buf.freeze(),
        })
    }

    async fn container_info(&self, id: &str) -> Result<ContainerInfo, InventoryError> {
        validate_container_id(id)?;

        let details = self.docker.inspect_container(id, None).await.map_err(|e| {
            if is_not_found(&e) {
                InventoryError::ContainerNotFound(id.to_owned())
            } else {
                InventoryError::DockerApi(format!("inspect container failed: {e}"))
            }
        })?;

        Ok(ContainerInfo {
            id: details.id.unwrap_or_else(|| id.to_owned()),
            image: details.config.and_then(|c| c.image).unwrap_or_default(),
        })
    }

    async fn ping(&self) -> Result<(), InventoryError> {
        self.docker
            .ping()
            .await
            .map_err(|e| InventoryError::DockerConnection(format!("ping failed: {e}")))?;
        Ok(())
    }
}

/// 테스트용 Mock 컨테이너 런타임
///
/// 명령별 출력을 미리 설정하고, 호출 기록을 남겨 수명 주기를 검증합니다.
#[cfg(test)]
#[derive(Default)]
pub struct MockRuntime {
    /// `cmd.join(" ")` -> 출력
    pub outputs: std::collections::HashMap<String, Vec<u8>>,
    /// container_info로 조회 가능한 컨테이너
    pub containers: Vec<ContainerInfo>,
    /// exec 응답 지연
    pub exec_delay: Option<std::time::Duration>,
    pub fail_create: bool,
    pub fail_stop: bool,
    /// 호출 기록 ("create:IMAGE", "start:ID", "stop:ID", "remove:ID", "exec:CMD")
    pub calls: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl MockRuntime {
    /// mock이 생성하는 컨테이너 ID
    pub const CREATED_ID: &'static str = "0123456789abcdef";

    pub fn new() -> Self {
        Self::default()
    }

    /// 명령 출력을 설정합니다.
    pub fn with_output(mut self, cmd: &[&str], output: &str) -> Self {
        self.outputs.insert(cmd.join(" "), output.as_bytes().to_vec());
        self
    }

    pub fn with_container(mut self, id: &str, image: &str) -> Self {
        self.containers.push(ContainerInfo {
            id: id.to_owned(),
            image: image.to_owned(),
        });
        self
    }

    pub fn with_exec_delay(mut self, delay: std::time::Duration) -> Self {
        self.exec_delay = Some(delay);
        self
    }

    pub fn with_failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    pub fn with_failing_stop(mut self) -> Self {
        self.fail_stop = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: String) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

#[cfg(test)]
impl ContainerRuntime for MockRuntime {
    async fn create_container(&self, image: &str) -> Result<String, InventoryError> {
        self.record(format!("create:{image}"));
        if self.fail_create {
            return Err(InventoryError::DockerApi(format!(
                "no such image: {image}"
            )));
        }
        Ok(Self::CREATED_ID.to_owned())
    }

    async fn start_container(&self, id: &str) -> Result<(), InventoryError> {
        validate_container_id(id)?;
        self.record(format!("start:{id}"));
        Ok(())
    }

    async fn stop_container(&self, id: &str, _timeout_secs: u64) -> Result<(), InventoryError> {
        validate_container_id(id)?;
        self.record(format!("stop:{id}"));
        if self.fail_stop {
            return Err(InventoryError::DockerApi("mock stop failure".to_owned()));
        }
        Ok(())
    }

    async fn remove_container(&self, id: &str) -> Result<(), InventoryError> {
        validate_container_id(id)?;
        self.record(format!("remove:{id}"));
        Ok(())
    }

    async fn exec(&self, id: &str, cmd: &[&str]) -> Result<ExecOutput, InventoryError> {
        validate_container_id(id)?;
        let command = cmd.join(" ");
        self.record(format!("exec:{command}"));

        if let Some(delay) = self.exec_delay {
            tokio::time::sleep(delay).await;
        }

        match self.outputs.get(&command) {
            Some(output) => Ok(ExecOutput {
                exec_id: "mock-exec".to_owned(),
                output: Bytes::from(output.clone()),
            }),
            None => Err(InventoryError::Exec {
                container_id: id.to_owned(),
                command,
                reason: "executable file not found in $PATH".to_owned(),
            }),
        }
    }

    async fn container_info(&self, id: &str) -> Result<ContainerInfo, InventoryError> {
        validate_container_id(id)?;
        self.containers
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| InventoryError::ContainerNotFound(id.to_owned()))
    }

    async fn ping(&self) -> Result<(), InventoryError> {
        Ok(())
    }
}
