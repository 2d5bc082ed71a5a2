//! Two-phase partial updates for points of interest.
//!
//! A patch document (RFC 6902) is first applied to the JSON projection of the
//! current values. Only when that succeeds is the result validated against
//! the field rules. Either failure leaves the stored entity untouched because
//! the caller only ever receives a fresh [`PointOfInterestDraft`].

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;

use crate::domain::validation::ValidationErrors;
use crate::domain::{Error, PointOfInterestDraft};

/// Update-shaped JSON projection that patch operations address.
///
/// Unknown members are rejected so a patch cannot smuggle in `/id` or
/// `/cityId`. A member may be absent but never `null`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct UpdateDocument {
    #[serde(
        default,
        deserialize_with = "non_null_string",
        skip_serializing_if = "Option::is_none"
    )]
    name: Option<String>,
    #[serde(
        default,
        deserialize_with = "non_null_string",
        skip_serializing_if = "Option::is_none"
    )]
    description: Option<String>,
}

/// Read a present member as a string; `null` is a type mismatch.
fn non_null_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(Some)
}

impl From<&PointOfInterestDraft> for UpdateDocument {
    fn from(value: &PointOfInterestDraft) -> Self {
        Self {
            name: Some(value.name().to_owned()),
            description: Some(value.description().to_owned()),
        }
    }
}

/// Why a patch document could not produce a replacement.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatchRejection {
    /// The operations could not be applied to the projection.
    #[error("patch could not be applied: {message}")]
    Structural { message: String },
    /// The operations applied but the result breaks a field rule.
    #[error("patched values are invalid: {0}")]
    Semantic(ValidationErrors),
}

impl PatchRejection {
    /// Reject a document that cannot be read or applied.
    pub fn structural(message: impl Into<String>) -> Self {
        Self::Structural {
            message: message.into(),
        }
    }
}

impl From<PatchRejection> for Error {
    fn from(value: PatchRejection) -> Self {
        match &value {
            PatchRejection::Structural { message } => Error::invalid_request(value.to_string())
                .with_details(json!({
                    "code": "invalid_patch",
                    "phase": "structural",
                    "reason": message,
                })),
            PatchRejection::Semantic(errors) => Error::invalid_request(value.to_string())
                .with_details(json!({
                    "code": "validation_failed",
                    "phase": "semantic",
                    "violations": errors.violations_json(),
                })),
        }
    }
}

/// Apply `patch` to a copy of `current` and validate the outcome.
///
/// # Examples
/// ```
/// use cityinfo::domain::{PointOfInterestDraft, apply_patch};
///
/// let current = PointOfInterestDraft::try_new("Central Park", None).unwrap();
/// let patch: json_patch::Patch = serde_json::from_value(serde_json::json!([
///     { "op": "replace", "path": "/description", "value": "Big park" }
/// ]))
/// .unwrap();
/// let updated = apply_patch(&patch, &current).unwrap();
/// assert_eq!(updated.description(), "Big park");
/// assert_eq!(current.description(), "");
/// ```
pub fn apply_patch(
    patch: &json_patch::Patch,
    current: &PointOfInterestDraft,
) -> Result<PointOfInterestDraft, PatchRejection> {
    let mut document = serde_json::to_value(UpdateDocument::from(current))
        .map_err(|err| PatchRejection::structural(err.to_string()))?;
    json_patch::patch(&mut document, &patch.0)
        .map_err(|err| PatchRejection::structural(err.to_string()))?;
    let patched: UpdateDocument = serde_json::from_value(document)
        .map_err(|err| PatchRejection::structural(err.to_string()))?;
    PointOfInterestDraft::try_from_parts(patched.name, patched.description)
        .map_err(PatchRejection::Semantic)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{ErrorCode, FieldViolation, NAME_MAX};
    use rstest::{fixture, rstest};
    use serde_json::Value;

    #[fixture]
    fn current() -> PointOfInterestDraft {
        PointOfInterestDraft::try_new("Central Park", Some("The most visited urban park".into()))
            .expect("valid draft")
    }

    fn patch(ops: Value) -> json_patch::Patch {
        serde_json::from_value(ops).expect("well-formed patch")
    }

    #[rstest]
    fn replace_description_keeps_name(current: PointOfInterestDraft) {
        let updated = apply_patch(
            &patch(json!([{ "op": "replace", "path": "/description", "value": "Updated" }])),
            &current,
        )
        .expect("patch applies");
        assert_eq!(updated.name(), "Central Park");
        assert_eq!(updated.description(), "Updated");
    }

    #[rstest]
    fn removing_name_is_a_semantic_failure(current: PointOfInterestDraft) {
        let err = apply_patch(&patch(json!([{ "op": "remove", "path": "/name" }])), &current)
            .expect_err("name required");
        match err {
            PatchRejection::Semantic(errors) => {
                assert_eq!(errors.violations(), &[FieldViolation::NameMissing]);
            }
            other => panic!("expected semantic rejection, got {other:?}"),
        }
    }

    #[rstest]
    fn oversized_name_is_a_semantic_failure(current: PointOfInterestDraft) {
        let err = apply_patch(
            &patch(json!([{ "op": "replace", "path": "/name", "value": "x".repeat(NAME_MAX + 1) }])),
            &current,
        )
        .expect_err("name too long");
        assert!(matches!(err, PatchRejection::Semantic(_)));
    }

    #[rstest]
    #[case(json!([{ "op": "replace", "path": "/missing/deep", "value": 1 }]))]
    #[case(json!([{ "op": "test", "path": "/name", "value": "Bryant Park" }]))]
    #[case(json!([{ "op": "add", "path": "/cityId", "value": 9 }]))]
    #[case(json!([{ "op": "replace", "path": "/name", "value": 42 }]))]
    #[case(json!([{ "op": "replace", "path": "/description", "value": null }]))]
    #[case(json!([{ "op": "replace", "path": "/name", "value": null }]))]
    fn unapplicable_operations_are_structural(
        current: PointOfInterestDraft,
        #[case] ops: Value,
    ) {
        let err = apply_patch(&patch(ops), &current).expect_err("structural failure");
        assert!(matches!(err, PatchRejection::Structural { .. }), "{err:?}");
    }

    #[rstest]
    fn null_description_is_not_read_as_absent(current: PointOfInterestDraft) {
        let err = apply_patch(
            &patch(json!([{ "op": "replace", "path": "/description", "value": null }])),
            &current,
        )
        .expect_err("null is a type mismatch");
        let details = Error::from(err).details().cloned().expect("details");
        assert_eq!(details["phase"], "structural");
        assert_eq!(current.description(), "The most visited urban park");
    }

    #[rstest]
    fn removing_description_still_defaults_to_empty(current: PointOfInterestDraft) {
        let updated = apply_patch(
            &patch(json!([{ "op": "remove", "path": "/description" }])),
            &current,
        )
        .expect("absent description is allowed");
        assert_eq!(updated.description(), "");
    }

    #[rstest]
    fn failed_test_op_aborts_whole_document(current: PointOfInterestDraft) {
        let ops = json!([
            { "op": "replace", "path": "/description", "value": "changed" },
            { "op": "test", "path": "/name", "value": "nope" }
        ]);
        assert!(apply_patch(&patch(ops), &current).is_err());
        assert_eq!(current.description(), "The most visited urban park");
    }

    #[rstest]
    fn empty_patch_yields_identical_values(current: PointOfInterestDraft) {
        let updated = apply_patch(&patch(json!([])), &current).expect("no-op patch");
        assert_eq!(updated, current);
    }

    #[rstest]
    fn rejections_map_to_invalid_request_with_phase(current: PointOfInterestDraft) {
        let structural = Error::from(PatchRejection::structural("path not found"));
        assert_eq!(structural.code(), ErrorCode::InvalidRequest);
        assert_eq!(
            structural.details().expect("details")["phase"],
            "structural"
        );

        let semantic = apply_patch(
            &patch(json!([{ "op": "replace", "path": "/name", "value": " " }])),
            &current,
        )
        .expect_err("blank name");
        let semantic = Error::from(semantic);
        let details = semantic.details().expect("details");
        assert_eq!(details["phase"], "semantic");
        assert_eq!(details["violations"][0]["code"], "blank_field");
    }
}
