use pliant::codec::{CodecError, DecodeSession, FieldPath, KeyAliases, Value, ValueKind};

use super::{TargetType, coerce_at};

fn document() -> Value {
	serde_json::from_str(r#"{"items": [{"qty": "12", "label": null}, {"qty": -3.7, "fullName": "Ada"}], "flag": 1}"#).expect("json")
}

fn coerce(at: &str, target: TargetType, aliases: KeyAliases) -> pliant::codec::Result<super::Coerced> {
	let document = document();
	let session = DecodeSession::new(&document, aliases);
	let path = FieldPath::parse(at).expect("field path");
	let coerced = coerce_at(&session.decoder(), &path, target);
	assert!(session.path().is_empty());
	coerced
}

#[test]
fn walks_fields_and_indices() {
	let coerced = coerce("items[0].qty", TargetType::U8, KeyAliases::none()).expect("coerce");
	assert_eq!(coerced.path, "items[0].qty");
	assert_eq!(coerced.source, ValueKind::Text);
	assert_eq!(coerced.value, Value::Int(12));

	let clamped = coerce("items[1].qty", TargetType::U32, KeyAliases::none()).expect("coerce");
	assert_eq!(clamped.value, Value::Int(0));

	let truncated = coerce("items[1].qty", TargetType::I64, KeyAliases::none()).expect("coerce");
	assert_eq!(truncated.value, Value::Int(-3));
}

#[test]
fn null_target_reports_nullness() {
	assert_eq!(coerce("items[0].label", TargetType::Null, KeyAliases::none()).expect("null").value, Value::Bool(true));
	assert_eq!(coerce("flag", TargetType::Null, KeyAliases::none()).expect("flag").value, Value::Bool(false));
	assert_eq!(coerce("flag", TargetType::Bool, KeyAliases::none()).expect("flag").value, Value::Bool(true));
}

#[test]
fn aliases_apply_at_every_level() {
	let aliases = KeyAliases::none().with("name", ["fullName"]);
	let coerced = coerce("items[1].name", TargetType::String, aliases).expect("alias");
	assert_eq!(coerced.value, Value::text("Ada"));
}

#[test]
fn missing_members_fall_back() {
	let coerced = coerce("nothing.here", TargetType::String, KeyAliases::none()).expect("missing");
	assert_eq!(coerced.source, ValueKind::Object);
	assert_eq!(coerced.value, Value::text("[:]"));
}

#[test]
fn index_past_end_is_exhaustion() {
	let err = coerce("items[5].qty", TargetType::I32, KeyAliases::none()).expect_err("past end");
	assert!(matches!(err, CodecError::StructuralExhaustion { index: 2, .. }));
	assert_eq!(err.path(), Some("items[2]"));
}
