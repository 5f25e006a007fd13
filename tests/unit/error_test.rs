//! Tests for error types

use ticket_lot::core::BookingError;

#[test]
fn test_invalid_config_error() {
    let err = BookingError::InvalidConfig("workers must be greater than 0".to_string());
    assert_eq!(
        format!("{}", err),
        "invalid configuration: workers must be greater than 0"
    );
}

#[test]
fn test_limiter_closed_error() {
    let err = BookingError::LimiterClosed;
    assert_eq!(format!("{}", err), "admission limiter is closed");
}

#[test]
fn test_show_not_found_error() {
    let err = BookingError::ShowNotFound { index: 5, len: 3 };
    assert_eq!(
        format!("{}", err),
        "show index 5 out of range (registry holds 3 shows)"
    );
}

#[test]
fn test_spawn_error() {
    let err = BookingError::Spawn {
        worker_id: 12,
        reason: "resource temporarily unavailable".to_string(),
    };
    assert_eq!(
        format!("{}", err),
        "failed to spawn worker 12: resource temporarily unavailable"
    );
}

#[test]
fn test_errors_convert_to_anyhow() {
    let result: ticket_lot::core::AppResult<()> =
        Err(BookingError::WorkerLost { worker_id: 2 }.into());
    let message = result.unwrap_err().to_string();
    assert_eq!(message, "worker 2 terminated without reporting an outcome");
}
