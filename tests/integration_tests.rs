//! End-to-end tests for the reader controller

use rfreader::platform::{RecordingOpener, RecordingSurface};
use rfreader::store::{JsonFileEntryStore, MemoryEntryStore};
use rfreader::{
    Entry, EntryId, EntryStore, NavigationDecision, NavigationRequest, ReaderConfig,
    ReaderController, ReaderSettings, ScrollGeometry, StaticSettings,
};
use std::sync::Arc;

fn article() -> Entry {
    Entry::new(EntryId::new("article-1"), "Rust in Practice")
        .with_url("https://blog.example.com/rust")
        .with_content("<p>First paragraph.</p><p>Second paragraph.</p>")
}

#[tokio::test]
async fn test_full_reading_session() {
    let surface = RecordingSurface::new();
    let store = Arc::new(MemoryEntryStore::new());
    store.insert(article().with_screen_position(500.0));
    let opener = Arc::new(RecordingOpener::new());
    let settings = Arc::new(StaticSettings::new(ReaderSettings {
        font_scale_percent: 115,
        justify: true,
    }));

    let mut controller = ReaderController::new(
        ReaderConfig::default(),
        surface.clone(),
        settings,
        store.clone(),
        opener.clone(),
    )
    .expect("controller");

    controller.present(&EntryId::new("article-1")).expect("present");
    assert!(surface.html().unwrap().contains("text-align:justify"));

    // layout already complete: restore applies straight away
    surface.set_layout(800.0, 4000.0);
    assert!(controller.on_load_finished().is_none());
    assert_eq!(surface.scrolls(), vec![(500.0, true)]);
    assert_eq!(surface.font_scale_percent(), Some(115));

    // in-document anchor stays, the title link leaves
    let anchor = format!("{}index.html#part-2", controller.config().content_root);
    assert_eq!(
        controller.decide_navigation(&NavigationRequest::main_frame(anchor)),
        NavigationDecision::AllowInPlace
    );
    let d = controller.decide_navigation(&NavigationRequest::main_frame("https://blog.example.com/rust"));
    assert!(!d.is_allowed());
    assert_eq!(opener.opened().len(), 1);
    assert_eq!(opener.opened()[0].as_str(), "https://blog.example.com/rust");

    // user scrolls and lets go twice
    let progress = controller.progress();
    controller.on_scroll(ScrollGeometry::new(742.0, 800.0, 4000.0));
    controller.on_scroll_settle(ScrollGeometry::new(742.0, 800.0, 4000.0));
    controller.on_scroll(ScrollGeometry::new(800.0, 800.0, 4000.0));
    controller.on_scroll_settle(ScrollGeometry::new(800.0, 800.0, 4000.0));
    assert_eq!(*progress.borrow(), 0.25);

    controller.writer().flush().await.unwrap();
    let id = EntryId::new("article-1");
    assert_eq!(store.writes(), vec![(id.clone(), 742.0), (id.clone(), 800.0)]);
    assert_eq!(store.get(&id).unwrap().screen_position, 800.0);
}

#[tokio::test]
async fn test_offset_survives_reopen_from_json_store() {
    let mut path = std::env::temp_dir();
    path.push(format!("rfreader-integration-{}.json", std::process::id()));
    let _ = std::fs::remove_file(&path);

    let id = EntryId::new("article-1");
    {
        let store = Arc::new(JsonFileEntryStore::open(&path).unwrap());
        store.upsert(article()).unwrap();

        let surface = RecordingSurface::new();
        let mut controller = ReaderController::new(
            ReaderConfig::default(),
            surface.clone(),
            Arc::new(StaticSettings::default()),
            store.clone(),
            Arc::new(RecordingOpener::new()),
        )
        .unwrap();
        controller.present(&id).unwrap();
        surface.set_layout(600.0, 3000.0);
        controller.on_load_finished();
        assert!(surface.scrolls().is_empty());
        controller.on_scroll_settle(ScrollGeometry::new(1234.0, 600.0, 3000.0));
        controller.teardown();
        controller.writer().flush().await.unwrap();
    }

    // a new view over the reopened store restores the saved offset
    let store = Arc::new(JsonFileEntryStore::open(&path).unwrap());
    assert_eq!(store.load(&id).unwrap().screen_position, 1234.0);

    let surface = RecordingSurface::new();
    let mut controller = ReaderController::new(
        ReaderConfig::default(),
        surface.clone(),
        Arc::new(StaticSettings::default()),
        store,
        Arc::new(RecordingOpener::new()),
    )
    .unwrap();
    controller.present(&id).unwrap();
    surface.set_layout(600.0, 3000.0);
    controller.on_load_finished();
    assert_eq!(surface.scrolls(), vec![(1234.0, true)]);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_entry_without_content_still_presents() {
    let surface = RecordingSurface::new();
    let store = Arc::new(MemoryEntryStore::new());
    store.insert(Entry::new(EntryId::new("empty"), "Title only"));
    let mut controller = ReaderController::new(
        ReaderConfig::default(),
        surface.clone(),
        Arc::new(StaticSettings::default()),
        store,
        Arc::new(RecordingOpener::new()),
    )
    .unwrap();

    controller.present(&EntryId::new("empty")).unwrap();
    let snapshot = rfreader::document::DocumentSnapshot::parse(&surface.html().unwrap());
    assert_eq!(snapshot.heading, "Title only");
    assert_eq!(snapshot.text, "Title only");
}

#[test]
fn test_degenerate_layout_gives_up_and_stays_usable() {
    let surface = RecordingSurface::new();
    let store = Arc::new(MemoryEntryStore::new());
    store.insert(article().with_screen_position(300.0));
    let config = ReaderConfig {
        restore_max_retries: 3,
        ..Default::default()
    };
    let mut controller = ReaderController::new(
        config,
        surface.clone(),
        Arc::new(StaticSettings::default()),
        store,
        Arc::new(RecordingOpener::new()),
    )
    .unwrap();
    controller.present(&EntryId::new("article-1")).unwrap();
    surface.set_layout(800.0, 200.0);

    let mut ticket = controller.on_load_finished();
    let mut retries = 0;
    while let Some(t) = ticket {
        retries += 1;
        ticket = controller.retry_restore(t);
    }
    assert_eq!(retries, 3);
    assert!(surface.scrolls().is_empty());
    assert_eq!(controller.restore_state(), Some(rfreader::RestoreState::GaveUp));

    // still reacts to scrolling
    assert_eq!(controller.on_scroll(ScrollGeometry::new(0.0, 800.0, 200.0)), 0.0);
}
