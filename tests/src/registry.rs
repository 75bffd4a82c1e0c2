#![cfg(test)]
use netcheck_common::error::RegistryError;
use netcheck_common::network::probe::ProbeKind;
use netcheck_core::registry::{DeviceRegistry, RegistryStore};
use std::fs;
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

const ROUTER_DOC: &str = r#"{
    "devices": [
        { "name": "Router", "nics": [ { "name": "eth0", "ip": "192.168.1.1" } ] }
    ]
}"#;

#[tokio::test]
async fn missing_file_gives_empty_registry_and_report() {
    let dir = tempfile::tempdir().unwrap();
    let store = RegistryStore::open(dir.path().join("config.json")).unwrap();
    let registry = store.snapshot();

    assert!(registry.is_empty());
    assert!(registry.targets().is_empty());

    let report = netcheck_core::run_probe_cycle(
        registry.devices(),
        ProbeKind::TcpConnect,
        Duration::from_millis(200),
        4,
    )
    .await;
    assert!(report.is_empty());
}

#[test]
fn truncated_document_is_a_parse_error() {
    let err = DeviceRegistry::load(br#"{"devices": [ { "name": "Router", "nics": ["#).unwrap_err();
    assert!(matches!(err, RegistryError::Parse(_)));
}

#[test]
fn router_document_round_trips_through_import() {
    let dir = tempfile::tempdir().unwrap();
    let selected = dir.path().join("selected.json");
    fs::write(&selected, ROUTER_DOC).unwrap();

    let store = RegistryStore::open(dir.path().join("active").join("config.json")).unwrap();
    let mut reloads = store.subscribe();
    let registry = store.import(&selected).unwrap();

    assert!(reloads.has_changed().unwrap());
    assert_eq!(registry.devices().len(), 1);
    assert_eq!(
        registry.targets(),
        vec![IpAddr::V4(Ipv4Addr::new(192, 168, 1, 1))]
    );

    let reopened = RegistryStore::open(store.path()).unwrap();
    assert_eq!(*reopened.snapshot(), *registry);
}

#[test]
fn broken_import_keeps_active_configuration() {
    let dir = tempfile::tempdir().unwrap();
    let active = dir.path().join("config.json");
    fs::write(&active, ROUTER_DOC).unwrap();
    let broken = dir.path().join("broken.json");
    fs::write(&broken, "{ not json").unwrap();

    let store = RegistryStore::open(&active).unwrap();
    assert!(store.import(&broken).is_err());

    assert_eq!(fs::read_to_string(&active).unwrap(), ROUTER_DOC);
    assert_eq!(store.snapshot().devices()[0].name, "Router");
}
