//! 통합 테스트 -- 수집 → 평가 → 이력 저장 → 출력 전체 플로우 검증

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use dockvet_core::types::{ContainerInfo, PackageStatus};
use dockvet_inventory::{CollectorConfig, ContainerRuntime, ExecOutput, InventoryError};
use dockvet_scanner::{
    ImageScanner, InMemoryVulnStore, JsonVulnStore, ScannerError, VulnStore,
};

// Test runtime for integration tests
mod mock {
    use super::*;

    pub const SCAN_CONTAINER_ID: &str = "c0ffee";

    #[derive(Default)]
    pub struct TestRuntime {
        outputs: HashMap<String, String>,
        containers: Vec<ContainerInfo>,
        pub stopped: Mutex<Vec<String>>,
    }

    impl TestRuntime {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(mut self, cmd: &str, output: &str) -> Self {
            self.outputs.insert(cmd.to_owned(), output.to_owned());
            self
        }

        pub fn container(mut self, id: &str, image: &str) -> Self {
            self.containers.push(ContainerInfo {
                id: id.to_owned(),
                image: image.to_owned(),
            });
            self
        }
    }

    impl ContainerRuntime for TestRuntime {
        async fn create_container(&self, _image: &str) -> Result<String, InventoryError> {
            Ok(SCAN_CONTAINER_ID.to_owned())
        }

        async fn start_container(&self, _id: &str) -> Result<(), InventoryError> {
            Ok(())
        }

        async fn stop_container(&self, id: &str, _timeout_secs: u64) -> Result<(), InventoryError> {
            self.stopped.lock().unwrap().push(id.to_owned());
            Ok(())
        }

        async fn remove_container(&self, _id: &str) -> Result<(), InventoryError> {
            Ok(())
        }

        async fn exec(&self, id: &str, cmd: &[&str]) -> Result<ExecOutput, InventoryError> {
            let command = cmd.join(" ");
            match self.outputs.get(&command) {
                Some(out) => Ok(ExecOutput {
                    exec_id: "exec-1".to_owned(),
                    output: Bytes::from(out.clone()),
                }),
                None => Err(InventoryError::Exec {
                    container_id: id.to_owned(),
                    command,
                    reason: "not found".to_owned(),
                }),
            }
        }

        async fn container_info(&self, id: &str) -> Result<ContainerInfo, InventoryError> {
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
}

use mock::TestRuntime;

const CENTOS_OS_RELEASE: &str = "NAME=\"CentOS Linux\"\nVERSION=\"8\"\nID=\"centos\"\n";
const UBUNTU_OS_RELEASE: &str = "NAME=\"Ubuntu\"\nVERSION=\"20.04.1 LTS (Focal Fossa)\"\n";

fn rpm_bash_runtime() -> TestRuntime {
    TestRuntime::new()
        .respond("cat /etc/os-release", CENTOS_OS_RELEASE)
        .respond("rpm -aqi", "Name        : bash\nVersion     : 5.0.17\n")
}

#[tokio::test]
async fn rpm_bash_end_to_end() {
    let store = Arc::new(InMemoryVulnStore::new());
    let scanner = ImageScanner::new(
        Arc::new(rpm_bash_runtime()),
        Arc::clone(&store),
        CollectorConfig::default(),
    );

    let output = scanner.scan_image("centos:8").await.unwrap();

    assert_eq!(output.image_name, "centos:8");
    assert_eq!(output.total_products, 1);
    assert_eq!(output.vuln_products, 0);
    assert_eq!(output.ok_products, 1);

    let json = serde_json::to_value(&output).unwrap();
    assert_eq!(
        json["evaluated_packages_info"],
        serde_json::json!([{"product": "bash", "version": "5.0.17", "status": "OK"}])
    );
    assert!(json.get("id").is_none());

    // 이력에는 같은 리포트가 저장됨
    let history = scanner.history("centos:8").unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].evaluated_packages(), output.evaluated_packages_info.as_slice());
    assert_eq!(store.stored().len(), 1);
}

#[tokio::test]
async fn vulnerable_package_counted() {
    let dpkg = "\
ii  libssl1.1:amd64  1.1.1f-1ubuntu2  amd64  Secure Sockets Layer toolkit
ii  bash             5.0-6ubuntu1     amd64  GNU Bourne Again SHell
ii  zlib1g:amd64     1:1.2.11.dfsg-2ubuntu1  amd64  compression library
";
    let runtime = TestRuntime::new()
        .container("abc123", "ubuntu:20.04")
        .respond("cat /etc/os-release", UBUNTU_OS_RELEASE)
        .respond("dpkg -l", dpkg);
    let store = InMemoryVulnStore::new()
        .with_vulnerable("libssl1.1", "1.1.1f")
        .with_vulnerable("zlib1g", "1:1.2.11.dfsg-2");
    let scanner = ImageScanner::new(Arc::new(runtime), Arc::new(store), CollectorConfig::default());

    let output = scanner.scan_container("abc123").await.unwrap();

    assert_eq!(output.image_name, "ubuntu:20.04");
    assert_eq!(output.total_products, 3);
    assert_eq!(output.vuln_products, 2);
    assert_eq!(output.ok_products, 1);
    assert_eq!(
        output.total_products,
        output.vuln_products + output.ok_products
    );
    let statuses: Vec<_> = output
        .evaluated_packages_info
        .iter()
        .map(|p| p.status())
        .collect();
    assert_eq!(
        statuses,
        vec![PackageStatus::Vuln, PackageStatus::Ok, PackageStatus::Vuln]
    );
}

#[tokio::test]
async fn empty_inventory_produces_zero_report() {
    let runtime = TestRuntime::new()
        .respond("cat /etc/os-release", "NAME=\"Alpine Linux\"\n")
        .respond("apk -v info", "");
    let scanner = ImageScanner::new(
        Arc::new(runtime),
        Arc::new(InMemoryVulnStore::new()),
        CollectorConfig::default(),
    );

    let output = scanner.scan_image("alpine:3.12").await.unwrap();
    assert_eq!(output.total_products, 0);
    assert_eq!(output.vuln_products, 0);
    assert_eq!(output.ok_products, 0);
    assert!(output.evaluated_packages_info.is_empty());
}

#[tokio::test]
async fn unsupported_distribution_is_not_stored() {
    let runtime = Arc::new(TestRuntime::new().respond("cat /etc/os-release", "NAME=\"SLES\"\n"));
    let store = Arc::new(InMemoryVulnStore::new());
    let scanner = ImageScanner::new(Arc::clone(&runtime), Arc::clone(&store), CollectorConfig::default());

    let err = scanner.scan_image("suse:15").await.unwrap_err();
    assert!(matches!(
        err,
        ScannerError::Inventory(InventoryError::UnsupportedDistribution { .. })
    ));
    assert!(store.stored().is_empty());
    assert_eq!(runtime.stopped.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn json_store_history_keeps_numeric_timestamp() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("vuln-db.json");
    std::fs::write(
        &db_path,
        r#"[{"cve_id": "CVE-2019-18276", "product": "bash", "versions": ["5.0.17"]}]"#,
    )
    .unwrap();
    let history_path = dir.path().join("state").join("history.jsonl");
    let store = Arc::new(JsonVulnStore::open(&db_path, &history_path).unwrap());

    let scanner = ImageScanner::new(
        Arc::new(rpm_bash_runtime()),
        Arc::clone(&store),
        CollectorConfig::default(),
    );
    let first = scanner.scan_image("centos:8").await.unwrap();
    scanner.scan_image("centos:8").await.unwrap();

    assert_eq!(first.vuln_products, 1);
    // 출력 타임스탬프는 "YYYY-MM-DD HH:MM:SS.ffffff"
    assert!(matches!(first.timestamp.len(), 19 | 26), "{}", first.timestamp);
    assert_eq!(&first.timestamp[4..5], "-");

    // 같은 리포트의 이력 표현은 숫자 타임스탬프
    let history = store.get_history("centos:8").unwrap();
    assert_eq!(history.len(), 2);
    let history_json = serde_json::to_value(&history).unwrap();
    assert!(history_json[0]["timestamp"].is_f64());
    assert_eq!(history_json[0]["evaluated_packages_info"][0]["status"], "VULN");
    assert_eq!(
        dockvet_scanner::format_output_timestamp(history[0].timestamp()),
        first.timestamp
    );

    // 다시 열어도 이력 유지
    let reopened = JsonVulnStore::open(&db_path, &history_path).unwrap();
    assert_eq!(reopened.get_history("centos:8").unwrap().len(), 2);
    assert!(reopened.get_history("ubuntu:20.04").unwrap().is_empty());
}
