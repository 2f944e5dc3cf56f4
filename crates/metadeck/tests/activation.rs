// SPDX-FileCopyrightText: 2026 MetaDeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Activation and dismount against fake host collaborators.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use metadeck::plugin::{MODULE_ROUTE, SETTINGS_ROUTE};
use metadeck::{activate_with, PluginHost};
use metadeck_config::MetaDeckConfig;
use metadeck_core::events::{MetaDeckEvent, SETTINGS_CHANGED};
use metadeck_core::types::{ApiServer, IgdbSettings, Settings};
use metadeck_core::MetaDeckError;
use metadeck_settings::{LEGACY_SETTINGS_FILE, SETTINGS_FILE};
use metadeck_store::{RuntimeSource, StoreBootstrap};
use metadeck_test_utils::{
    CountingRuntime, FakeHostGlobals, MemorySettings, MockRouter, PendingServerSource,
    RecordingDiagnostics, StaticServerSource,
};

struct Fixture {
    router: Arc<MockRouter>,
    runtime: Arc<CountingRuntime>,
    settings: Arc<MemorySettings>,
    diagnostics: Arc<RecordingDiagnostics>,
}

impl Fixture {
    fn new(settings: Settings) -> Self {
        Self {
            router: Arc::new(MockRouter::new()),
            runtime: CountingRuntime::new("host-mobx"),
            settings: Arc::new(MemorySettings::new(settings)),
            diagnostics: Arc::new(RecordingDiagnostics::new()),
        }
    }

    fn host(&self, official: Vec<ApiServer>) -> PluginHost {
        PluginHost {
            name: "MetaDeck".to_string(),
            router: self.router.clone(),
            globals: Arc::new(FakeHostGlobals::new().with_runtime("mobx", self.runtime.clone())),
            bundled_runtime: None,
            settings: self.settings.clone(),
            official_source: Arc::new(StaticServerSource::new(official)),
            fetch_timeout: Duration::from_millis(5000),
            diagnostics: self.diagnostics.clone(),
        }
    }
}

fn s(name: &str, url: &str) -> ApiServer {
    ApiServer::new(name, url)
}

#[tokio::test]
async fn activation_mounts_pages_and_emits_boot_diagnostics() {
    let fixture = Fixture::new(Settings::default());
    let store = StoreBootstrap::new();

    let plugin = activate_with(fixture.host(vec![s("EmuDeck", "https://e")]), &store)
        .await
        .unwrap();

    assert_eq!(plugin.name(), "MetaDeck");
    assert_eq!(plugin.version(), env!("CARGO_PKG_VERSION"));
    assert!(fixture.router.has_route(SETTINGS_ROUTE));
    assert!(fixture.router.has_route(MODULE_ROUTE));
    assert!(plugin.state().mounts().is_registered());
    assert_eq!(plugin.state().store().source(), RuntimeSource::HostGlobal);
    assert_eq!(fixture.runtime.configure_count(), 1);

    let lines = fixture.diagnostics.lines();
    assert_eq!(lines[0], "boot OK");
    assert!(lines[1].starts_with("reactive runtime {"));
    assert!(lines[1].contains("\"host-global\""));

    plugin.server_options_ready().await;
    let page = fixture.router.render(SETTINGS_ROUTE).unwrap();
    assert_eq!(page["serverOptions"][0], "EmuDeck (https://e)");

    let owned = plugin.state().run_in_action(|state| state.mounts().len());
    assert_eq!(owned, 2);
    assert_eq!(fixture.runtime.action_count(), 1);
}

#[tokio::test]
async fn dismount_removes_pages_in_reverse_once() {
    let fixture = Fixture::new(Settings::default());
    let store = StoreBootstrap::new();
    let plugin = activate_with(fixture.host(vec![]), &store).await.unwrap();

    assert_eq!(plugin.on_dismount(), 2);
    assert_eq!(plugin.on_dismount(), 0);
    assert!(!fixture.router.has_route(SETTINGS_ROUTE));
    assert!(!fixture.router.has_route(MODULE_ROUTE));

    let removals: Vec<String> = fixture
        .router
        .calls()
        .into_iter()
        .filter(|c| c.starts_with("remove_route"))
        .collect();
    assert_eq!(
        removals,
        [
            format!("remove_route {MODULE_ROUTE}"),
            format!("remove_route {SETTINGS_ROUTE}"),
        ]
    );
}

#[tokio::test]
async fn missing_runtime_fails_activation() {
    let fixture = Fixture::new(Settings::default());
    let mut host = fixture.host(vec![]);
    host.globals = Arc::new(FakeHostGlobals::new());

    let err = activate_with(host, &StoreBootstrap::new()).await.err().unwrap();
    assert!(matches!(err, MetaDeckError::RuntimeUnavailable(_)));
    assert!(fixture.router.calls().is_empty());
}

#[tokio::test]
async fn bundled_runtime_is_used_when_host_has_none() {
    let fixture = Fixture::new(Settings::default());
    let bundled = CountingRuntime::new("bundled");
    let mut host = fixture.host(vec![]);
    host.globals = Arc::new(FakeHostGlobals::new());
    host.bundled_runtime = Some(bundled.clone());

    let plugin = activate_with(host, &StoreBootstrap::new()).await.unwrap();
    assert_eq!(plugin.state().store().source(), RuntimeSource::Local);
    assert_eq!(bundled.configure_count(), 1);
}

#[tokio::test]
async fn failing_page_does_not_block_its_sibling() {
    let fixture = Fixture::new(Settings::default());
    fixture.router.fail_on(SETTINGS_ROUTE);

    let plugin = activate_with(fixture.host(vec![]), &StoreBootstrap::new())
        .await
        .unwrap();

    assert!(!fixture.router.has_route(SETTINGS_ROUTE));
    assert!(fixture.router.has_route(MODULE_ROUTE));
    assert_eq!(plugin.on_dismount(), 1);
}

#[tokio::test(start_paused = true)]
async fn slow_official_list_still_activates_with_custom_servers() {
    let fixture = Fixture::new(Settings {
        igdb: IgdbSettings {
            server: None,
            custom_servers: vec![s("local", "http://localhost:8080")],
        },
    });
    let mut host = fixture.host(vec![]);
    host.official_source = Arc::new(PendingServerSource);

    let started = tokio::time::Instant::now();
    let plugin = activate_with(host, &StoreBootstrap::new()).await.unwrap();

    // Pages are up before the official list settles.
    assert_eq!(started.elapsed(), Duration::ZERO);
    assert!(fixture.router.has_route(SETTINGS_ROUTE));
    assert!(plugin.state().mounts().is_registered());

    plugin.server_options_ready().await;
    assert!(started.elapsed() >= Duration::from_millis(5000));
    let options = plugin.state().igdb().options();
    assert_eq!(options.len(), 1);
    assert_eq!(options[0].server.url, "http://localhost:8080");
}

#[tokio::test(start_paused = true)]
async fn dismount_cancels_pending_resolution() {
    let fixture = Fixture::new(Settings::default());
    let mut host = fixture.host(vec![]);
    host.official_source = Arc::new(PendingServerSource);

    let plugin = activate_with(host, &StoreBootstrap::new()).await.unwrap();
    assert_eq!(plugin.on_dismount(), 2);

    let started = tokio::time::Instant::now();
    plugin.server_options_ready().await;
    assert_eq!(started.elapsed(), Duration::ZERO);
    assert!(plugin.state().igdb().options().is_empty());
}

#[tokio::test]
async fn settings_changes_flow_through_state_bus() {
    let fixture = Fixture::new(Settings::default());
    let plugin = activate_with(fixture.host(vec![s("EmuDeck", "https://e")]), &StoreBootstrap::new())
        .await
        .unwrap();
    plugin.server_options_ready().await;

    let seen = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&seen);
    let _sub = plugin
        .state()
        .bus()
        .subscribe(SETTINGS_CHANGED, move |event: &MetaDeckEvent| {
            assert_eq!(event, &MetaDeckEvent::SettingsChanged);
            *counter.lock().unwrap() += 1;
            Ok(())
        });

    plugin.state().igdb().add_custom("mine", "http://mine").await.unwrap();

    assert_eq!(*seen.lock().unwrap(), 1);
    assert_eq!(fixture.settings.write_count(), 1);
    let page = fixture.router.render(SETTINGS_ROUTE).unwrap();
    assert_eq!(page["serverOptions"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn host_from_config_persists_to_settings_dir_and_forwards_diagnostics() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = MetaDeckConfig::default();
    config.settings.dir = Some(dir.path().to_path_buf());

    let router = Arc::new(MockRouter::new());
    let (mut host, backend) =
        PluginHost::from_config(&config, router.clone(), Arc::new(FakeHostGlobals::new()));
    host.official_source = Arc::new(StaticServerSource::new(vec![s("EmuDeck", "https://e")]));
    let mut backend = backend.unwrap();

    let plugin = activate_with(host, &StoreBootstrap::new()).await.unwrap();
    assert_eq!(plugin.state().store().source(), RuntimeSource::Local);
    assert_eq!(backend.recv().await.unwrap(), "boot OK");
    plugin.server_options_ready().await;

    plugin
        .state()
        .igdb()
        .add_custom("mine", "http://mine")
        .await
        .unwrap();
    let written = std::fs::read_to_string(dir.path().join(SETTINGS_FILE)).unwrap();
    assert!(written.contains("http://mine"));

    let page = router.render(SETTINGS_ROUTE).unwrap();
    assert_eq!(page["serverOptions"][1], "mine (http://mine)");
}

#[tokio::test]
async fn legacy_settings_file_is_migrated_on_activation() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(LEGACY_SETTINGS_FILE),
        r#"{"igdb": {"server": null, "custom_servers": [{"name": "old", "url": "http://old"}]}}"#,
    )
    .unwrap();
    let mut config = MetaDeckConfig::default();
    config.settings.dir = Some(dir.path().to_path_buf());

    let (mut host, _backend) = PluginHost::from_config(
        &config,
        Arc::new(MockRouter::new()),
        Arc::new(FakeHostGlobals::new()),
    );
    host.official_source = Arc::new(StaticServerSource::new(vec![]));

    let plugin = activate_with(host, &StoreBootstrap::new()).await.unwrap();

    assert!(!dir.path().join(LEGACY_SETTINGS_FILE).exists());
    assert!(dir.path().join(SETTINGS_FILE).exists());
    assert_eq!(
        plugin.state().igdb().custom_servers().await,
        vec![s("old", "http://old")]
    );
}
