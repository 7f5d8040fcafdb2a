//! End-to-end synchronizer flow against a temp directory and a
//! recording runner standing in for the container engine.

use std::cell::RefCell;
use std::fs;

use indexmap::IndexMap;
use tempfile::TempDir;

use dtaas_config::{ResourceLimits, ServiceEnv};
use dtaas_core::error::{DtaasError, Result};
use dtaas_provider::{
    ComposeRunner, PlatformServices, RenderContext, UserComposeFile, UserContainers,
    COMPOSE_SERVICES_FILE,
};

#[derive(Default)]
struct RecordingRunner {
    calls: RefCell<Vec<(Vec<String>, IndexMap<String, String>)>>,
    fail: bool,
}

impl ComposeRunner for RecordingRunner {
    fn run(&self, args: &[String], env: &IndexMap<String, String>) -> Result<()> {
        self.calls.borrow_mut().push((args.to_vec(), env.clone()));
        if self.fail {
            Err(DtaasError::Command(format!(
                "failed to run 'docker {}'",
                args.join(" ")
            )))
        } else {
            Ok(())
        }
    }
}

fn resources() -> ResourceLimits {
    ResourceLimits {
        shm_size: "512m".into(),
        cpus: "4".into(),
        mem_limit: "4G".into(),
        pids_limit: "4960".into(),
    }
}

#[test]
fn add_flow_persists_manifest_and_batches_the_engine_call() {
    let dir = TempDir::new().unwrap();
    let manifest_path = dir.path().join("compose.users.yml");
    let limits = resources();
    let ctx = RenderContext {
        server_dns: "localhost",
        dtaas_dir: "/srv/dtaas",
        resources: &limits,
    };

    // Absent manifest file reads as empty, then gains structure.
    let mut manifest = UserComposeFile::load(&manifest_path).unwrap();
    manifest.ensure_structure();
    let users = vec!["alice".to_string(), "bob".to_string()];
    manifest.merge_users(&users, &ctx).unwrap();
    manifest.save(&manifest_path).unwrap();

    let runner = RecordingRunner::default();
    let containers =
        UserContainers::with_compose_file(&runner, &manifest_path.to_string_lossy());
    containers.start(&manifest.service_names()).unwrap();

    let calls = runner.calls.borrow();
    assert_eq!(calls.len(), 1, "one batched invocation per operation");
    let (args, env) = &calls[0];
    assert_eq!(args[0], "compose");
    assert_eq!(args[3], "up");
    assert_eq!(args[4], "-d");
    assert_eq!(&args[5..], ["alice", "bob"]);
    assert!(env.is_empty());

    // The persisted document is the full manifest.
    let on_disk = fs::read_to_string(&manifest_path).unwrap();
    assert!(on_disk.contains("version: '3'"));
    assert!(on_disk.contains("alice:"));
    assert!(on_disk.contains("dtaas-users"));
}

#[test]
fn delete_flow_stops_then_removes() {
    let dir = TempDir::new().unwrap();
    let manifest_path = dir.path().join("compose.users.yml");
    fs::write(
        &manifest_path,
        "version: '3'\nservices:\n  alice: {image: x}\n  bob: {image: y}\n",
    )
    .unwrap();

    let runner = RecordingRunner::default();
    let containers =
        UserContainers::with_compose_file(&runner, &manifest_path.to_string_lossy());
    let delete_list = vec!["alice".to_string()];
    containers.stop(&delete_list).unwrap();

    let mut manifest = UserComposeFile::load(&manifest_path).unwrap();
    manifest.remove_users(&delete_list);
    manifest.save(&manifest_path).unwrap();

    let calls = runner.calls.borrow();
    assert_eq!(calls[0].0[3], "stop");
    assert_eq!(calls[0].0[4], "alice");

    let reloaded = UserComposeFile::load(&manifest_path).unwrap();
    assert_eq!(reloaded.service_names(), vec!["bob"]);
}

#[test]
fn status_is_a_ps_passthrough() {
    let runner = RecordingRunner::default();
    let containers = UserContainers::with_compose_file(&runner, "compose.users.yml");
    containers.status(&[]).unwrap();

    let calls = runner.calls.borrow();
    assert_eq!(calls[0].0[3..], ["ps".to_string()]);
}

#[test]
fn engine_failure_is_one_aggregate_error() {
    let runner = RecordingRunner {
        fail: true,
        ..Default::default()
    };
    let containers = UserContainers::with_compose_file(&runner, "compose.users.yml");
    let err = containers.start(&["alice".to_string()]).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("compose"));
    assert!(msg.contains("alice"));
}

fn platform_base_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(COMPOSE_SERVICES_FILE),
        "services:\n  rabbitmq: {image: rabbitmq:3-management}\n",
    )
    .unwrap();
    fs::create_dir_all(dir.path().join("config")).unwrap();
    fs::write(
        dir.path().join("config").join("services.env"),
        "HOSTNAME=Foo.Example.Com\nRABBITMQ_USER=dtaas\n",
    )
    .unwrap();
    dir
}

#[test]
fn platform_services_inject_the_compose_environment() {
    let dir = platform_base_dir();
    let runner = RecordingRunner::default();
    let services = PlatformServices::new(&runner, dir.path()).unwrap();

    let msg = services.start(&["rabbitmq".to_string()]).unwrap();
    assert_eq!(msg, "Docker Compose started successfully");

    let calls = runner.calls.borrow();
    let (args, env) = &calls[0];
    assert_eq!(args[3], "up");
    assert_eq!(env.get("COMPOSE_PROJECT_NAME").unwrap(), "foo-example-com");
    assert_eq!(env.get("RABBITMQ_USER").unwrap(), "dtaas");
}

#[test]
fn remove_with_volumes_recreates_data_directories() {
    let dir = platform_base_dir();
    let rabbit_data = dir.path().join("data").join("rabbitmq");
    fs::create_dir_all(&rabbit_data).unwrap();
    fs::write(rabbit_data.join("stale.db"), "x").unwrap();

    let runner = RecordingRunner::default();
    let services = PlatformServices::new(&runner, dir.path()).unwrap();
    let msg = services
        .remove(&["rabbitmq".to_string()], true)
        .unwrap();

    assert_eq!(msg, "Services and data removed successfully");
    assert!(rabbit_data.exists());
    assert!(!rabbit_data.join("stale.db").exists());

    let calls = runner.calls.borrow();
    let (args, _) = &calls[0];
    assert!(args.contains(&"rm".to_string()));
    assert!(args.contains(&"--volumes".to_string()));
}

#[test]
fn missing_services_compose_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let env = ServiceEnv::from_vars(IndexMap::new());
    let runner = RecordingRunner::default();
    let err = match PlatformServices::with_env(&runner, dir.path(), &env) {
        Ok(_) => panic!("expected an error for a missing compose file"),
        Err(e) => e,
    };
    assert!(err.to_string().contains("not found"));
}
