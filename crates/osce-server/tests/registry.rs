use std::sync::Arc;
use std::time::Duration;

use osce_cases::catalog::CaseCatalog;
use osce_core::models::session::SessionMode;
use osce_practice::conversation::CannedReplies;
use osce_practice::session::{PracticeSession, SessionEvent, SessionTiming};
use osce_server::registry::SessionRegistry;

fn session() -> PracticeSession {
    let catalog = CaseCatalog::builtin();
    let responder = Arc::new(CannedReplies::with_seed(catalog.clone(), 7));
    let mut session = PracticeSession::new(
        "station-1",
        SessionMode::Training,
        responder,
        SessionTiming::default(),
    );
    session
        .select_case(catalog.require("asthma").unwrap())
        .unwrap();
    session
}

#[tokio::test(start_paused = true)]
async fn driver_publishes_timer_events() {
    let registry = Arc::new(SessionRegistry::new(Duration::from_millis(100)));
    let handle = registry.insert(session(), "owner".into()).await;
    let mut events = handle.subscribe();

    tokio::time::sleep(Duration::from_secs(61)).await;

    let mut saw_deterioration = false;
    while let Ok(event) = events.try_recv() {
        if let SessionEvent::Deteriorated { vitals } = event {
            assert_eq!(vitals.spo2, 88);
            saw_deterioration = true;
        }
    }
    assert!(saw_deterioration);
}

#[tokio::test(start_paused = true)]
async fn close_is_idempotent_and_publishes_teardown() {
    let registry = Arc::new(SessionRegistry::new(Duration::from_millis(100)));
    let handle = registry.insert(session(), "owner".into()).await;
    let mut events = handle.subscribe();
    assert_eq!(registry.len().await, 1);

    assert!(registry.close(handle.id).await);
    assert!(!registry.close(handle.id).await);
    assert!(registry.get(handle.id).await.is_none());
    assert_eq!(events.recv().await.unwrap(), SessionEvent::TornDown);
}

#[tokio::test(start_paused = true)]
async fn zero_countdown_drops_session_on_next_tick() {
    let registry = Arc::new(SessionRegistry::new(Duration::from_millis(100)));
    let timing = SessionTiming {
        countdown_secs: 0,
        ..SessionTiming::default()
    };
    let catalog = CaseCatalog::builtin();
    let mut s = PracticeSession::new(
        "station-1",
        SessionMode::Exam,
        Arc::new(CannedReplies::new(catalog.clone())),
        timing,
    );
    s.select_case(catalog.require("appendicitis").unwrap()).unwrap();
    for _ in 0..3 {
        s.advance().unwrap();
    }
    s.finish_session().unwrap();
    assert!(s.is_torn_down());

    let handle = registry.insert(s, "owner".into()).await;
    tokio::time::sleep(Duration::from_millis(250)).await;
    assert!(registry.get(handle.id).await.is_none());
}
