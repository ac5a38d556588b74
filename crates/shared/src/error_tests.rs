use super::*;

#[test]
fn test_error_status_codes() {
    assert_eq!(AppError::Unauthorized(String::new()).status_code(), 401);
    assert_eq!(AppError::NotFound(String::new()).status_code(), 404);
    assert_eq!(AppError::Validation(String::new()).status_code(), 400);
    assert_eq!(AppError::Conflict(String::new()).status_code(), 409);
    assert_eq!(AppError::Database(String::new()).status_code(), 500);
}

#[test]
fn test_error_codes() {
    assert_eq!(
        AppError::Unauthorized(String::new()).error_code(),
        "UNAUTHORIZED"
    );
    assert_eq!(AppError::NotFound(String::new()).error_code(), "NOT_FOUND");
    assert_eq!(
        AppError::Validation(String::new()).error_code(),
        "VALIDATION_ERROR"
    );
    assert_eq!(AppError::Conflict(String::new()).error_code(), "CONFLICT");
    assert_eq!(
        AppError::Database(String::new()).error_code(),
        "DATABASE_ERROR"
    );
}

#[test]
fn test_error_display() {
    assert_eq!(
        AppError::Validation("Amount must be greater than zero".into()).to_string(),
        "Validation error: Amount must be greater than zero"
    );
    assert_eq!(
        AppError::Conflict("msg".into()).to_string(),
        "Conflict: msg"
    );
    assert_eq!(
        AppError::Database("connection reset".into()).to_string(),
        "Database error: connection reset"
    );
}

#[test]
fn test_app_result_carries_app_error() {
    let result: AppResult<()> = Err(AppError::Unauthorized("x-user-id header is required".into()));
    assert_eq!(result.unwrap_err().status_code(), 401);
}
