//! Tests for the error taxonomy and payload serialisation.

use super::*;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[case(400, Some(ErrorCode::BadRequest))]
#[case(401, Some(ErrorCode::Unauthorized))]
#[case(403, Some(ErrorCode::Forbidden))]
#[case(404, Some(ErrorCode::NotFound))]
#[case(500, Some(ErrorCode::ServerError))]
#[case(418, None)]
#[case(502, None)]
fn statuses_map_to_closed_categories(#[case] status: u16, #[case] expected: Option<ErrorCode>) {
    assert_eq!(ErrorCode::from_status(status), expected);
}

#[rstest]
fn tags_round_trip_through_from_str() {
    for code in ErrorCode::ALL {
        let parsed: ErrorCode = code.as_str().parse().expect("tag parses");
        assert_eq!(parsed, code);
    }
}

#[rstest]
fn serde_uses_the_same_tags_as_as_str() {
    for code in ErrorCode::ALL {
        let encoded = serde_json::to_value(code).expect("serialise code");
        assert_eq!(encoded, json!(code.as_str()));
    }
}

#[rstest]
fn unknown_tags_are_rejected() {
    let error = "lastName-required"
        .parse::<ErrorCode>()
        .expect_err("camelCase tag is not part of the taxonomy");
    assert_eq!(error.0, "lastName-required");
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::Unknown, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn new_falls_back_to_the_tag_for_blank_messages() {
    let error = Error::new(ErrorCode::Timeout, "");
    assert_eq!(error.code(), ErrorCode::Timeout);
    assert_eq!(error.message(), "timeout");
}

#[rstest]
fn validation_constructors_carry_their_tag_as_message() {
    assert_eq!(Error::name_required().message(), "name-required");
    assert_eq!(Error::last_name_required().message(), "lastname-required");
    assert_eq!(Error::phone_required().message(), "phone-required");
}

#[rstest]
fn serialises_without_details_when_absent() {
    let value = serde_json::to_value(Error::unknown("boom")).expect("serialise");
    assert_eq!(value, json!({ "code": "unknown", "message": "boom" }));
}

#[rstest]
fn deserialisation_rejects_blank_messages() {
    let payload = json!({ "code": "timeout", "message": "  " });
    let result = serde_json::from_value::<Error>(payload);
    assert!(result.is_err(), "blank message must fail validation");
}

#[rstest]
fn details_survive_a_serde_round_trip() {
    let error = Error::unknown("store closed").with_details(json!({ "op": "upsert" }));
    let value = serde_json::to_value(&error).expect("serialise");
    let decoded: Error = serde_json::from_value(value).expect("deserialise");
    assert_eq!(decoded, error);
}
