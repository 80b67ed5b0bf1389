//! Dispatcher integration tests
//!
//! Runs messages through resolution, user data, the gate and a fake executor

use std::sync::Arc;

use sms_remote::modules::catalog::permission;
use sms_remote::{Catalog, Command, DispatchOutcome, Dispatcher, Eligibility, UserDataStore};

mod common;
use common::{OWNER_PHONE, RecordingExecutor, gate, store_with};

const BLUETOOTH_PERMS: [&str; 2] = [permission::BLUETOOTH, permission::BLUETOOTH_ADMIN];

#[tokio::test]
async fn eligible_command_is_executed() {
    let catalog = Catalog::builtin().unwrap();
    let executor = Arc::new(RecordingExecutor::default());
    let dispatcher = Dispatcher::new(
        &catalog,
        gate(23, &BLUETOOTH_PERMS),
        store_with(&["bluetooth"]),
        executor.clone(),
    );

    let outcome = dispatcher
        .dispatch("+436601234567", Command::BluetoothEnable)
        .await;

    assert_eq!(
        outcome,
        DispatchOutcome::Executed {
            module: "bluetooth".to_string(),
            command: Command::BluetoothEnable,
            output: "ran BLUETOOTH_ENABLE".to_string(),
        }
    );
    assert_eq!(
        executor.calls(),
        vec![("bluetooth".to_string(), Command::BluetoothEnable)]
    );
}

#[tokio::test]
async fn disabled_module_is_rejected() {
    let catalog = Catalog::builtin().unwrap();
    let executor = Arc::new(RecordingExecutor::default());
    let store = store_with(&["battery"]);
    assert!(store.user_data("bluetooth").is_none());

    let dispatcher = Dispatcher::new(
        &catalog,
        gate(23, &BLUETOOTH_PERMS),
        store,
        executor.clone(),
    );
    let outcome = dispatcher.dispatch(OWNER_PHONE, Command::BluetoothEnable).await;

    assert!(matches!(outcome, DispatchOutcome::ModuleDisabled { .. }));
    assert!(executor.calls().is_empty());
}

#[tokio::test]
async fn unknown_sender_is_rejected() {
    let catalog = Catalog::builtin().unwrap();
    let executor = Arc::new(RecordingExecutor::default());
    let dispatcher = Dispatcher::new(
        &catalog,
        gate(23, &[]),
        store_with(&["battery"]),
        executor.clone(),
    );

    let outcome = dispatcher
        .dispatch("+1 555 0100", Command::BatteryLevelFetch)
        .await;

    assert_eq!(
        outcome.to_string(),
        "BATTERY_LEVEL_FETCH: sender not granted for module battery"
    );
    assert!(executor.calls().is_empty());
}

#[tokio::test]
async fn incompatible_platform_is_rejected_before_permissions() {
    let catalog = Catalog::builtin().unwrap();
    let executor = Arc::new(RecordingExecutor::default());
    let dispatcher = Dispatcher::new(
        &catalog,
        gate(22, &[]),
        store_with(&["mobile_data"]),
        executor.clone(),
    );

    let outcome = dispatcher
        .dispatch(OWNER_PHONE, Command::MobileDataEnable)
        .await;

    match outcome {
        DispatchOutcome::Ineligible { eligibility, .. } => {
            assert!(matches!(
                eligibility,
                Eligibility::Incompatible { current: 22, .. }
            ));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(executor.calls().is_empty());
}

#[tokio::test]
async fn missing_permissions_are_reported() {
    let catalog = Catalog::builtin().unwrap();
    let dispatcher = Dispatcher::new(
        &catalog,
        gate(21, &[permission::BLUETOOTH]),
        store_with(&["bluetooth"]),
        Arc::new(RecordingExecutor::default()),
    );

    let outcome = dispatcher
        .dispatch(OWNER_PHONE, Command::BluetoothIsEnabled)
        .await;

    assert_eq!(
        outcome.to_string(),
        "BLUETOOTH_IS_ENABLED: missing permissions: android.permission.BLUETOOTH_ADMIN"
    );
}

#[tokio::test]
async fn executor_failure_becomes_outcome() {
    let catalog = Catalog::builtin().unwrap();
    let dispatcher = Dispatcher::new(
        &catalog,
        gate(23, &[]),
        store_with(&["battery"]),
        Arc::new(RecordingExecutor::failing("sensor unavailable")),
    );

    let outcome = dispatcher
        .dispatch(OWNER_PHONE, Command::BatteryIsCharging)
        .await;

    assert_eq!(
        outcome.to_string(),
        "BATTERY_IS_CHARGING: failed: execution error: sensor unavailable"
    );
}

#[tokio::test]
async fn message_runs_every_fragment_in_order() {
    let catalog = Catalog::builtin().unwrap();
    let executor = Arc::new(RecordingExecutor::default());
    let dispatcher = Dispatcher::new(
        &catalog,
        gate(23, &BLUETOOTH_PERMS),
        store_with(&["battery", "bluetooth"]),
        executor.clone(),
    );

    let outcomes = dispatcher
        .dispatch_message(
            OWNER_PHONE,
            "battery level fetch; launch rockets\nBLUETOOTH_DISABLE",
        )
        .await;

    assert_eq!(outcomes.len(), 3);
    assert!(outcomes[0].is_executed());
    assert_eq!(
        outcomes[1],
        DispatchOutcome::Unresolved {
            token: "launch rockets".to_string()
        }
    );
    assert!(outcomes[2].is_executed());
    assert_eq!(
        executor.calls(),
        vec![
            ("battery".to_string(), Command::BatteryLevelFetch),
            ("bluetooth".to_string(), Command::BluetoothDisable),
        ]
    );
}

#[tokio::test]
async fn logging_executor_records_dry_runs() {
    let catalog = Catalog::builtin().unwrap();
    let executor = Arc::new(sms_remote::LoggingExecutor::new());
    let dispatcher = Dispatcher::new(
        &catalog,
        gate(23, &[]),
        store_with(&["battery"]),
        executor.clone(),
    );

    let outcomes = dispatcher
        .dispatch_message(OWNER_PHONE, "BATTERY_LEVEL_FETCH")
        .await;

    assert_eq!(outcomes[0].to_string(), "BATTERY_LEVEL_FETCH: accepted (dry run)");
    assert_eq!(executor.records().len(), 1);
}
