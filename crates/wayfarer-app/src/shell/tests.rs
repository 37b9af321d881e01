use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;
use wayfarer_common::{Rect, TabId};
use wayfarer_config::WayfarerConfig;
use wayfarer_view::dialog::parked_bounds;
use wayfarer_view::headless::{HeadlessPartition, StaticFavicons};
use wayfarer_view::{DialogKind, HostWindow, PartitionEvent, PartitionKind, SurfaceId};

use super::*;

struct Fixture {
    shell: Shell,
    normal: Arc<HeadlessPartition>,
    incognito: Arc<HeadlessPartition>,
    now: Instant,
    _dirs: tempfile::TempDir,
}

fn fixture() -> Fixture {
    let dirs = tempfile::tempdir().unwrap();
    let mut config = WayfarerConfig::default();
    config.session.extensions_dir = Some(dirs.path().join("extensions"));
    config.session.builtin_extension = None;
    config.session.downloads_dir = Some(dirs.path().join("downloads"));

    let normal = Arc::new(HeadlessPartition::new(PartitionKind::Normal));
    let incognito = Arc::new(HeadlessPartition::new(PartitionKind::Incognito));
    let shell = Shell::with_partitions(
        &config,
        Arc::new(StaticFavicons::new()),
        normal.clone(),
        incognito.clone(),
        1280.0,
        800.0,
    )
    .unwrap();

    Fixture {
        shell,
        normal,
        incognito,
        now: Instant::now(),
        _dirs: dirs,
    }
}

impl Fixture {
    /// Feed one line, run a tick, and return the decoded frames.
    fn send(&mut self, line: &str) -> Vec<Value> {
        self.shell.handle_line(line, self.now);
        self.shell.tick(self.now);
        self.frames()
    }

    fn frames(&self) -> Vec<Value> {
        self.shell
            .drain_frames()
            .iter()
            .map(|frame| serde_json::from_str(frame).unwrap())
            .collect()
    }

    fn advance(&mut self, ms: u64) {
        self.now += Duration::from_millis(ms);
        self.shell.tick(self.now);
    }

    fn open_tab(&mut self, id: u32, url: &str) -> SurfaceId {
        let line = format!(r#"{{"type":"create-view","data":{{"tab_id":{id},"url":"{url}"}}}}"#);
        self.send(&line);
        self.send(&format!(r#"{{"type":"select-view","data":{{"tab_id":{id}}}}}"#));
        self.shell
            .window
            .registry
            .get(TabId(id))
            .unwrap()
            .surface_id()
    }

    fn dialog_surface(&self, kind: DialogKind) -> SurfaceId {
        self.shell.window.dialogs[&kind].surface_id()
    }
}

fn channels(frames: &[Value]) -> Vec<&str> {
    frames
        .iter()
        .map(|f| f["channel"].as_str().unwrap())
        .collect()
}

// =============================================================================
// COMMANDS
// =============================================================================

#[test]
fn create_view_emits_lifecycle_frames() {
    let mut f = fixture();
    let frames = f.send(
        r#"{"type":"create-view","data":{"tab_id":3,"url":"https://example.com/"}}"#,
    );
    assert_eq!(
        channels(&frames),
        vec![
            "view-created-3",
            "view-loading-3",
            "load-commit-3",
            "view-url-updated-3",
            "view-loading-3",
        ]
    );
    assert_eq!(frames[0]["type"], "view-created");
    assert_eq!(frames[3]["data"]["url"], "https://example.com/");
}

#[test]
fn select_attaches_tab_and_reports_navigation_state() {
    let mut f = fixture();
    f.send(r#"{"type":"create-view","data":{"tab_id":1,"url":"https://example.com/"}}"#);
    let frames = f.send(r#"{"type":"select-view","data":{"tab_id":1}}"#);

    assert_eq!(channels(&frames), vec!["update-navigation-state"]);
    assert_eq!(frames[0]["data"]["canGoBack"], false);

    let surface = f.shell.window.registry.get(TabId(1)).unwrap().surface_id();
    assert_eq!(f.shell.window.host.attached(), Some(surface));
    assert_eq!(
        f.shell.window.host.surface_bounds(surface),
        Some(Rect::new(0.0, 72.0, 1280.0, 728.0))
    );
}

#[test]
fn malformed_lines_are_dropped() {
    let mut f = fixture();
    assert!(f.send("").is_empty());
    assert!(f.send("not json").is_empty());
    assert!(f.send(r#"{"type":"explode","data":{}}"#).is_empty());
    assert!(f.send(r#"{"type":"select-view","data":{"tab_id":"one"}}"#).is_empty());
    assert!(f.shell.window.registry.is_empty());
}

#[test]
fn remove_and_clear_views() {
    let mut f = fixture();
    let first = f.open_tab(1, "https://a.example/");
    let second = f.open_tab(2, "https://b.example/");

    f.send(r#"{"type":"remove-view","data":{"tab_id":1}}"#);
    assert!(f.shell.window.host.is_destroyed(first));
    assert_eq!(f.shell.window.registry.tab_ids(), vec![TabId(2)]);

    f.send(r#"{"type":"clear-views"}"#);
    assert!(f.shell.window.host.is_destroyed(second));
    assert!(f.shell.window.registry.is_empty());
    assert_eq!(f.shell.window.host.attached(), None);
}

#[test]
fn hide_and_show_views() {
    let mut f = fixture();
    let surface = f.open_tab(1, "https://example.com/");

    f.send(r#"{"type":"hide-views"}"#);
    assert_eq!(f.shell.window.host.attached(), None);

    f.send(r#"{"type":"show-view"}"#);
    assert_eq!(f.shell.window.host.attached(), Some(surface));
}

#[test]
fn resize_refits_selected_tab() {
    let mut f = fixture();
    let surface = f.open_tab(1, "https://example.com/");

    f.send(r#"{"type":"resize","data":{"width":1000,"height":600}}"#);
    assert_eq!(
        f.shell.window.host.surface_bounds(surface),
        Some(Rect::new(0.0, 72.0, 1000.0, 528.0))
    );
}

#[test]
fn relay_call_replies_on_its_channel() {
    let mut f = fixture();
    f.open_tab(1, "https://example.com/");

    let frames = f.send(
        r#"{"type":"relay-call","data":{"tab_id":1,"method":"get-url","call_id":"c1"}}"#,
    );
    assert_eq!(channels(&frames), vec!["relay-result-c1"]);
    assert_eq!(frames[0]["data"]["result"], "https://example.com/");

    let frames = f.send(
        r#"{"type":"relay-call","data":{"tab_id":9,"method":"get-title","call_id":"c2"}}"#,
    );
    assert_eq!(frames[0]["data"]["result"], Value::Null);
}

#[test]
fn title_poll_runs_on_tick() {
    let mut f = fixture();
    let surface = f.open_tab(1, "https://example.com/");

    f.shell.window.host.set_title(surface, "Quiet Update");
    f.advance(250);
    let frames = f.frames();
    assert_eq!(channels(&frames), vec!["view-title-updated-1"]);
    assert_eq!(frames[0]["data"]["title"], "Quiet Update");
}

#[test]
fn clear_browsing_data_clears_both_partitions() {
    let mut f = fixture();
    let incognito_before = f.incognito.cache_clears();

    f.send(r#"{"type":"clear-browsing-data"}"#);
    assert_eq!(f.normal.cache_clears(), 1);
    assert_eq!(f.incognito.cache_clears(), incognito_before + 1);
}

// =============================================================================
// DIALOGS
// =============================================================================

#[test]
fn every_dialog_starts_parked() {
    let f = fixture();
    for kind in DialogKind::ALL {
        let surface = f.dialog_surface(kind);
        let height = f.shell.window.dialogs[&kind].bounds().height;
        assert_eq!(
            f.shell.window.host.surface_bounds(surface),
            Some(parked_bounds(height))
        );
    }
}

#[test]
fn show_hide_and_park_after_delay() {
    let mut f = fixture();
    let surface = f.dialog_surface(DialogKind::Menu);

    f.send(r#"{"type":"show-dialog","data":{"dialog":"menu","bounds":{"x":900,"y":60}}}"#);
    let menu = &f.shell.window.dialogs[&DialogKind::Menu];
    assert!(menu.is_visible());
    let shown = f.shell.window.host.surface_bounds(surface).unwrap();
    assert_eq!((shown.x, shown.y), (900.0, 60.0));

    f.send(r#"{"type":"hide-dialog","data":{"dialog":"menu"}}"#);
    assert!(!f.shell.window.dialogs[&DialogKind::Menu].is_visible());
    assert_eq!(f.shell.window.host.surface_bounds(surface), Some(shown));

    f.advance(250);
    assert_eq!(
        f.shell.window.host.surface_bounds(surface),
        Some(parked_bounds(shown.height))
    );
}

#[test]
fn toggle_flips_visibility() {
    let mut f = fixture();
    f.send(r#"{"type":"toggle-dialog","data":{"dialog":"find"}}"#);
    assert!(f.shell.window.dialogs[&DialogKind::Find].is_visible());
    f.send(r#"{"type":"toggle-dialog","data":{"dialog":"find"}}"#);
    assert!(!f.shell.window.dialogs[&DialogKind::Find].is_visible());
}

// =============================================================================
// PARTITION EVENTS
// =============================================================================

fn permission_request(request_id: u64, surface: SurfaceId) -> PartitionEvent {
    PartitionEvent::PermissionRequested {
        request_id,
        surface,
        permission: "media".into(),
        url: "https://meet.example.com/room/1".into(),
    }
}

#[test]
fn permission_request_round_trips_through_dialog() {
    let mut f = fixture();
    let surface = f.open_tab(1, "https://meet.example.com/room/1");

    f.shell
        .handle_partition_event(PartitionKind::Normal, permission_request(7, surface));
    let frames = f.frames();
    assert_eq!(channels(&frames), vec!["permission-requested"]);
    assert_eq!(frames[0]["data"]["requestId"], 7);
    assert_eq!(frames[0]["data"]["permission"], "media");

    f.shell.tick(f.now);
    assert!(f.shell.window.dialogs[&DialogKind::Permission].is_visible());
    assert!(f.normal.permission_decisions().is_empty());

    f.send(r#"{"type":"permission-response","data":{"request_id":7,"granted":true}}"#);
    assert_eq!(f.normal.permission_decisions(), vec![(7, true)]);
    assert!(!f.shell.window.dialogs[&DialogKind::Permission].is_visible());
}

#[test]
fn dialog_stays_open_while_requests_are_pending() {
    let mut f = fixture();
    let surface = f.open_tab(1, "https://meet.example.com/room/1");
    f.shell
        .handle_partition_event(PartitionKind::Normal, permission_request(1, surface));
    f.shell
        .handle_partition_event(PartitionKind::Normal, permission_request(2, surface));
    f.shell.tick(f.now);

    f.send(r#"{"type":"permission-response","data":{"request_id":1,"granted":false}}"#);
    assert!(f.shell.window.dialogs[&DialogKind::Permission].is_visible());

    f.send(r#"{"type":"permission-response","data":{"request_id":99,"granted":true}}"#);
    assert_eq!(f.normal.permission_decisions(), vec![(1, false)]);
}

#[test]
fn request_from_unknown_surface_is_denied() {
    let mut f = fixture();
    f.shell
        .handle_partition_event(PartitionKind::Normal, permission_request(4, SurfaceId(999)));
    assert_eq!(f.normal.permission_decisions(), vec![(4, false)]);
    assert!(f.frames().is_empty());
}

#[test]
fn shutdown_denies_pending_requests() {
    let mut f = fixture();
    let surface = f.open_tab(1, "https://meet.example.com/room/1");
    f.shell
        .handle_partition_event(PartitionKind::Normal, permission_request(5, surface));

    f.shell.shutdown();
    assert_eq!(f.normal.permission_decisions(), vec![(5, false)]);
    assert!(f.shell.window.host.is_destroyed(surface));
}

#[test]
fn download_notifications_reach_the_window() {
    let mut f = fixture();
    let surface = f.open_tab(1, "https://example.com/");

    f.shell.handle_partition_event(
        PartitionKind::Normal,
        PartitionEvent::WillDownload {
            item: 1,
            surface,
            file_name: "notes.txt".into(),
            total_bytes: 10,
        },
    );
    let frames = f.frames();
    assert_eq!(channels(&frames), vec!["download-started"]);
    assert_eq!(frames[0]["data"]["fileName"], "notes.txt");
    assert_eq!(f.shell.session.active_downloads().len(), 1);
}
