//! Integration tests for the onboarding flow.
//!
//! Timed tests run on a paused tokio clock, so the full sequence completes
//! instantly while still observing every interval.

use std::time::Duration;

use coach::draft::DraftEditor;
use coach::error::AdminError;
use coach::onboarding::{Advance, OnboardingFlow, OnboardingPhase, STEP_INTERVAL};
use coach::session::{Screen, screen_for};
use coach::store::{ConfigStore, MemoryStorage};

fn setup() -> (ConfigStore, MemoryStorage, DraftEditor) {
    let storage = MemoryStorage::new();
    let store = ConfigStore::open(Box::new(storage.clone()));
    let draft = DraftEditor::new(&store);
    (store, storage, draft)
}

fn filled_flow(interval: Duration) -> OnboardingFlow {
    let mut flow = OnboardingFlow::new(interval);
    flow.set_name("  Ana Souza ");
    flow.set_phone("(11) 98765-4321");
    flow
}

#[tokio::test(start_paused = true)]
async fn test_run_completes_after_eight_intervals() {
    let (mut store, _storage, mut draft) = setup();
    let mut flow = filled_flow(STEP_INTERVAL);
    let mut events = Vec::new();

    let start = tokio::time::Instant::now();
    flow.run(&mut store, &mut draft, |step| events.push(step.clone()))
        .await
        .unwrap();
    let elapsed = start.elapsed();

    assert!(elapsed >= STEP_INTERVAL * 8, "finished early: {elapsed:?}");
    assert!(elapsed < STEP_INTERVAL * 9, "finished late: {elapsed:?}");
    assert_eq!(events.len(), 8);
    assert_eq!(
        events[2],
        Advance::Message {
            index: 3,
            total: 7,
            message: "Setting up Ana Souza's account...".to_string(),
        }
    );
    assert_eq!(events.last(), Some(&Advance::Completed));

    let config = store.current();
    assert!(config.is_onboarded);
    assert_eq!(config.professional_name, "Ana Souza");
    assert_eq!(config.phone, "11987654321");
    assert_eq!(screen_for(config), Screen::Dashboard);
    assert_eq!(draft.draft(), config);
    assert_eq!(flow.phase(), OnboardingPhase::Complete);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_run_leaves_store_untouched() {
    let (mut store, storage, mut draft) = setup();
    let mut flow = filled_flow(STEP_INTERVAL);

    let result = tokio::time::timeout(
        STEP_INTERVAL * 7 + STEP_INTERVAL / 2,
        flow.run(&mut store, &mut draft, |_| {}),
    )
    .await;

    assert!(result.is_err(), "flow should still be running");
    assert!(!store.current().is_onboarded);
    assert_eq!(storage.write_count(), 0);
    assert_eq!(flow.current_message(), Some("Finishing setup..."));
}

#[tokio::test(start_paused = true)]
async fn test_run_rejects_empty_form() {
    let (mut store, _storage, mut draft) = setup();
    let mut flow = OnboardingFlow::new(STEP_INTERVAL);
    flow.set_name("Ana");
    flow.set_phone("   ");

    let err = flow.run(&mut store, &mut draft, |_| {}).await.unwrap_err();
    assert!(matches!(err, AdminError::Validation { missing } if missing == ["phone"]));
    assert_eq!(flow.phase(), OnboardingPhase::Form);
}

#[tokio::test(start_paused = true)]
async fn test_configured_interval_is_used() {
    let (mut store, _storage, mut draft) = setup();
    let interval = Duration::from_millis(5);
    let mut flow = filled_flow(interval);

    let start = tokio::time::Instant::now();
    flow.run(&mut store, &mut draft, |_| {}).await.unwrap();
    assert!(start.elapsed() < STEP_INTERVAL);
    assert!(store.current().is_onboarded);
}

#[test]
fn test_failed_final_write_is_reported() {
    let (mut store, storage, mut draft) = setup();
    let mut flow = filled_flow(STEP_INTERVAL);
    flow.submit().unwrap();
    for _ in 0..7 {
        assert!(matches!(
            flow.advance(&mut store, &mut draft).unwrap(),
            Advance::Message { .. }
        ));
    }

    storage.fail_writes(Some("read-only"));
    assert!(flow.advance(&mut store, &mut draft).is_err());
    assert!(!store.current().is_onboarded);
    assert_eq!(flow.phase(), OnboardingPhase::Processing);

    storage.fail_writes(None);
    assert_eq!(flow.advance(&mut store, &mut draft).unwrap(), Advance::Completed);
    assert!(store.current().is_onboarded);
}
