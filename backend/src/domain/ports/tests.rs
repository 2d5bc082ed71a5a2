//! Regression coverage for port error types and fixtures.

use super::*;
use rstest::rstest;

#[rstest]
#[case(CityRepositoryError::connection("refused"), "city store connection failed: refused")]
#[case(CityRepositoryError::query("syntax"), "city store query failed: syntax")]
#[case(
    CityRepositoryError::stale_change("point of interest 4 changed"),
    "staged change is stale: point of interest 4 changed"
)]
fn repository_errors_render_their_cause(
    #[case] err: CityRepositoryError,
    #[case] expected: &str,
) {
    assert_eq!(err.to_string(), expected);
}

#[rstest]
#[tokio::test]
async fn fixture_notification_sender_accepts_everything() {
    FixtureNotificationSender
        .send("Point of interest deleted", "gone")
        .await
        .expect("fixture never fails");
}

#[rstest]
fn notification_errors_carry_message() {
    let err = NotificationError::delivery("smtp down");
    assert_eq!(err.to_string(), "notification delivery failed: smtp down");
}
