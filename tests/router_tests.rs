//! Router scenarios S1–S3 and properties 2–5 from the testable-properties
//! section: schema-validated routing, unknown-type and missing-type
//! failures, and validation-failure detail shape.

use std::sync::Arc;

use nimbus_core::error::CoreError;
use nimbus_core::router::MessageRouter;
use nimbus_core::validator::{FieldType, ObjectSchema};

#[tokio::test]
async fn valid_command_routes_to_its_handler() {
    let router = MessageRouter::new("default");
    router.register(
        "test.command",
        Arc::new(|msg| {
            Box::pin(async move {
                Ok(serde_json::json!({
                    "statusCode": 200,
                    "headers": { "Content-Type": "application/json" },
                    "data": msg["data"]["payload"],
                }))
            })
        }),
        Arc::new(ObjectSchema::new(["data", "payload"]).require_field("aNumber", FieldType::Number)),
    );

    let input = serde_json::json!({
        "specversion": "1.0",
        "id": "123",
        "source": "https://x/api",
        "type": "test.command",
        "data": { "payload": { "aNumber": 1 }, "correlationId": "123" },
    });

    let result = router.route(input).await.unwrap();
    assert_eq!(
        result,
        serde_json::json!({
            "statusCode": 200,
            "headers": { "Content-Type": "application/json" },
            "data": { "aNumber": 1 },
        })
    );
}

#[tokio::test]
async fn unknown_type_fails_with_not_found() {
    let router = MessageRouter::new("default");

    let input = serde_json::json!({
        "specversion": "1.0",
        "id": "123",
        "source": "https://x/api",
        "type": "UNKNOWN_EVENT",
        "data": {},
    });

    let err = router.route(input).await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }));
    assert_eq!(err.to_string(), "Route handler not found");
}

#[tokio::test]
async fn missing_type_fails_with_invalid_input() {
    let router = MessageRouter::new("default");

    let input = serde_json::json!({
        "specversion": "1.0",
        "id": "123",
        "source": "https://x/api",
        "data": {},
    });

    let err = router.route(input).await.unwrap_err();
    assert!(matches!(err, CoreError::InvalidInput { .. }));
    assert_eq!(err.to_string(), "The provided input has no type attribute");
}

#[tokio::test]
async fn invalid_input_reports_structured_issues() {
    let router = MessageRouter::new("default");
    router.register(
        "test.event",
        Arc::new(|msg| Box::pin(async move { Ok(msg) })),
        Arc::new(ObjectSchema::new(["data"]).require_field("aNumber", FieldType::Number)),
    );

    let input = serde_json::json!({
        "specversion": "1.0",
        "id": "123",
        "source": "https://x/api",
        "type": "test.event",
        "data": { "aNumber": "123" },
    });

    let err = router.route(input).await.unwrap_err();
    assert_eq!(err.to_string(), "The provided input is invalid");
    let details = err.details().expect("details present");
    assert_eq!(
        details["issues"],
        serde_json::json!([{
            "path": ["data", "aNumber"],
            "code": "invalid_type",
            "message": "Expected number, received string",
            "expected": "number",
            "received": "string",
        }])
    );
}

#[tokio::test]
async fn registering_a_second_handler_for_a_type_replaces_the_first() {
    let router = MessageRouter::new("default");
    let schema: Arc<ObjectSchema> = Arc::new(ObjectSchema::new(["data"]));
    router.register(
        "test.command",
        Arc::new(|_msg| Box::pin(async move { Ok(serde_json::json!("first")) })),
        schema.clone(),
    );
    router.register(
        "test.command",
        Arc::new(|_msg| Box::pin(async move { Ok(serde_json::json!("second")) })),
        schema,
    );

    let input = serde_json::json!({
        "specversion": "1.0",
        "id": "1",
        "source": "https://x/api",
        "type": "test.command",
        "data": {},
    });

    let result = router.route(input).await.unwrap();
    assert_eq!(result, serde_json::json!("second"));
}
