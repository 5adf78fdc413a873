use crate::codec::{
	CodecError, Decode, DecodeOptions, DecodeSession, Decoder, ErrorKind, KeyAliases, Result, Value, from_str, from_value,
};

#[derive(Debug, PartialEq)]
struct Person {
	name: String,
	age: u8,
	active: bool,
}

impl Decode for Person {
	fn decode(decoder: &Decoder<'_>) -> Result<Self> {
		let fields = decoder.keyed()?;
		Ok(Self {
			name: fields.read("name"),
			age: fields.read("age"),
			active: fields.read("active"),
		})
	}

	fn key_aliases() -> KeyAliases {
		KeyAliases::none().with("name", ["n", "fullName"])
	}
}

/// Records the rendered path at the node it is decoded from.
struct PathMark(String);

impl Decode for PathMark {
	fn decode(decoder: &Decoder<'_>) -> Result<Self> {
		Ok(Self(decoder.current_path()))
	}
}

fn person(json: &str) -> Person {
	from_str(json).expect("person")
}

#[test]
fn aliases_resolve_in_declaration_order() {
	assert_eq!(person(r#"{"fullName": "Alex"}"#).name, "Alex");
	assert_eq!(person(r#"{"fullName": "Alex", "n": "Al"}"#).name, "Al");
	assert_eq!(person(r#"{"name": "Canon", "n": "Al"}"#).name, "Canon");
}

#[test]
fn absent_key_decodes_like_incompatible_kind() {
	let absent = person(r#"{"unrelated": 1}"#);
	let incompatible = person(r#"{"name": {}, "age": [], "active": {"x": 1}}"#);
	assert_eq!(absent, incompatible);
	assert_eq!(
		absent,
		Person {
			name: "[:]".to_owned(),
			age: 0,
			active: false,
		}
	);
}

#[test]
fn heterogeneous_producers_converge() {
	let typed = person(r#"{"name": "Sam", "age": 31, "active": true}"#);
	let stringly = person(r#"{"n": "Sam", "age": "31", "active": "true"}"#);
	let numeric = person(r#"{"name": "Sam", "age": 31.9, "active": 1}"#);
	assert_eq!(typed, stringly);
	assert_eq!(typed, numeric);
}

#[test]
fn nested_leaf_sees_full_path_and_stack_unwinds() {
	let root: Value = serde_json::from_str(r#"{"a": [{"b": 1}]}"#).expect("json");
	let session = DecodeSession::new(&root, KeyAliases::none());

	let mark = {
		let decoder = session.decoder();
		let top = decoder.keyed().expect("keyed");
		let mut items = top.nested_unkeyed("a").expect("a");
		let first = items.nested_keyed().expect("a[0]");
		first.read_structured::<PathMark>("b").expect("mark")
	};

	assert_eq!(mark.0, "a[0].b");
	assert!(session.path().is_empty());
}

#[test]
fn reading_past_end_reports_missing_index() {
	let root = Value::array([Value::Int(1), Value::Int(2)]);
	let session = DecodeSession::new(&root, KeyAliases::none());
	let decoder = session.decoder();
	let mut items = decoder.unkeyed().expect("unkeyed");

	assert_eq!(items.read::<i32>().expect("first"), 1);
	assert_eq!(items.read::<i32>().expect("second"), 2);
	assert!(items.is_at_end());

	let err = items.read::<i32>().expect_err("third");
	assert!(matches!(err, CodecError::StructuralExhaustion { index: 2, .. }));
	assert!(err.path().expect("path").ends_with("[2]"));
	drop(items);
	assert!(session.path().is_empty());
}

#[test]
fn exhaustion_inside_nested_value_carries_outer_path() {
	struct Pair;

	impl Decode for Pair {
		fn decode(decoder: &Decoder<'_>) -> Result<Self> {
			let mut items = decoder.unkeyed()?;
			items.read::<i64>()?;
			items.read::<i64>()?;
			Ok(Self)
		}
	}

	#[derive(Debug)]
	struct Holder;

	impl Decode for Holder {
		fn decode(decoder: &Decoder<'_>) -> Result<Self> {
			decoder.keyed()?.read_structured::<Pair>("pair")?;
			Ok(Self)
		}
	}

	let err = from_str::<Holder>(r#"{"pair": [1]}"#).expect_err("short pair");
	assert_eq!(err.kind(), ErrorKind::StructuralExhaustion);
	assert_eq!(err.path(), Some("pair[1]"));
}

#[test]
fn second_container_claim_is_rejected() {
	let root = Value::object([("a", Value::Int(1))]);
	let session = DecodeSession::new(&root, KeyAliases::none());
	let decoder = session.decoder();

	decoder.keyed().expect("first claim");
	let err = decoder.scalar().expect_err("second claim");
	assert_eq!(err.kind(), ErrorKind::InvariantViolation);
}

#[test]
fn session_opens_one_top_level_container() {
	let root = Value::object([("a", Value::Int(1))]);
	let session = DecodeSession::new(&root, KeyAliases::none());

	session.decoder().keyed().expect("first claim");
	let err = session.decoder().unkeyed().expect_err("second root container");
	assert!(matches!(err, CodecError::InvariantViolation { .. }));
	assert!(session.decoder().scalar().is_err());
	assert!(session.decode::<Value>().is_err());

	let fresh = DecodeSession::new(&root, KeyAliases::none());
	assert_eq!(fresh.decode::<Value>().expect("fresh session"), root);
}

#[test]
fn unkeyed_null_check_consumes_only_nulls() {
	let root = Value::array([Value::Null, Value::Int(5)]);
	let session = DecodeSession::new(&root, KeyAliases::none());
	let decoder = session.decoder();
	let mut items = decoder.unkeyed().expect("unkeyed");

	assert!(items.check_null().expect("null"));
	assert_eq!(items.current_index(), 1);
	assert!(!items.check_null().expect("not null"));
	assert_eq!(items.current_index(), 1);
	assert_eq!(items.read::<i64>().expect("value"), 5);

	let err = items.check_null().expect_err("at end");
	assert_eq!(err.kind(), ErrorKind::StructuralExhaustion);
}

#[test]
fn keyed_queries_ignore_aliases_where_documented() {
	let root = Value::object([("n", Value::Null), ("v", Value::Int(2))]);
	let aliases = KeyAliases::none().with("name", ["n"]);
	let session = DecodeSession::new(&root, aliases);
	let decoder = session.decoder();
	let fields = decoder.keyed().expect("keyed");

	assert!(!fields.contains("name"));
	assert!(fields.contains("n"));
	assert!(fields.check_null("name"));
	assert!(!fields.check_null("missing"));
	assert_eq!(fields.read_optional::<i64>("name").expect("null alias"), None);
	assert_eq!(fields.read_optional::<i64>("missing").expect("absent"), None);
	assert_eq!(fields.read_optional::<i64>("v").expect("present"), Some(2));
	assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["n", "v"]);
}

#[test]
fn aliases_are_skipped_for_empty_objects() {
	let root = Value::object::<&str>([]);
	let session = DecodeSession::new(&root, KeyAliases::none().with("a", ["b"]));
	let decoder = session.decoder();
	let fields = decoder.keyed().expect("keyed");
	assert_eq!(fields.read::<String>("a"), "[:]");
	assert_eq!(fields.len(), 0);
}

#[test]
fn non_container_nodes_read_as_empty_containers() {
	let root = Value::text("plain");

	let keyed_session = DecodeSession::new(&root, KeyAliases::none());
	let decoder = keyed_session.decoder();
	let fields = decoder.keyed().expect("keyed");
	assert_eq!(fields.len(), 0);
	assert_eq!(fields.read::<i32>("x"), 0);

	let unkeyed_session = DecodeSession::new(&root, KeyAliases::none());
	let decoder = unkeyed_session.decoder();
	let items = decoder.unkeyed().expect("unkeyed");
	assert_eq!(items.count(), Some(0));
	assert!(items.is_at_end());
}

#[test]
fn super_decoders_revisit_the_same_node() {
	#[derive(Debug, PartialEq)]
	struct Base {
		id: i64,
	}

	impl Decode for Base {
		fn decode(decoder: &Decoder<'_>) -> Result<Self> {
			Ok(Self {
				id: decoder.keyed()?.read("id"),
			})
		}
	}

	let root = Value::object([("id", Value::Int(9)), ("extra", Value::text("x")), ("base", Value::object([("id", Value::Int(4))]))]);
	let session = DecodeSession::new(&root, KeyAliases::none());
	let decoder = session.decoder();
	let fields = decoder.keyed().expect("keyed");

	assert_eq!(Base::decode(&fields.super_decoder()).expect("super"), Base { id: 9 });
	assert_eq!(Base::decode(&fields.super_decoder_for("base")).expect("member"), Base { id: 4 });
	assert!(fields.super_decoder_for("absent").is_null());
	assert_eq!(fields.read::<String>("extra"), "x");
}

#[test]
fn nesting_beyond_max_depth_fails() {
	let mut json = String::from("0");
	for _ in 0..8 {
		json = format!("[{json}]");
	}
	let root: Value = serde_json::from_str(&json).expect("json");

	let options = DecodeOptions { max_depth: 4 };
	let err = crate::codec::from_value_with::<Value>(&root, &options).expect_err("too deep");
	assert!(matches!(err, CodecError::DepthExceeded { max_depth: 4, .. }));
	assert_eq!(err.path(), Some("[0][0][0][0][0]"));

	assert_eq!(from_value::<Value>(&root).expect("default depth"), root);
}

#[test]
fn custom_errors_propagate_unchanged() {
	struct Strict;

	impl Decode for Strict {
		fn decode(decoder: &Decoder<'_>) -> Result<Self> {
			let fields = decoder.keyed()?;
			if !fields.contains("id") {
				return Err(decoder.error("id is required"));
			}
			Ok(Self)
		}
	}

	#[derive(Debug)]
	struct Outer;

	impl Decode for Outer {
		fn decode(decoder: &Decoder<'_>) -> Result<Self> {
			decoder.keyed()?.read_structured::<Strict>("inner")?;
			Ok(Self)
		}
	}

	let err = from_str::<Outer>(r#"{"inner": {}}"#).expect_err("strict");
	assert_eq!(err.kind(), ErrorKind::NestedConversion);
	assert_eq!(err.path(), Some("inner"));
	assert!(err.to_string().contains("id is required"));
}

#[test]
fn nested_types_bring_their_own_aliases() {
	#[derive(Debug, PartialEq)]
	struct Order {
		person: Person,
		backup: Option<Person>,
		crew: Vec<Person>,
	}

	impl Decode for Order {
		fn decode(decoder: &Decoder<'_>) -> Result<Self> {
			let fields = decoder.keyed()?;
			Ok(Self {
				person: fields.read_structured("person")?,
				backup: fields.read_optional("backup")?,
				crew: fields.read_structured("crew")?,
			})
		}
	}

	let order: Order = from_str(r#"{"person": {"fullName": "Alex"}, "backup": {"n": "Bo"}, "crew": [{"n": "Cy"}]}"#).expect("order");
	assert_eq!(order.person.name, "Alex");
	assert_eq!(order.backup.map(|person| person.name).as_deref(), Some("Bo"));
	assert_eq!(order.crew[0].name, "Cy");
}

#[test]
fn nested_types_without_aliases_inherit_the_enclosing_table() {
	struct Label(String);

	impl Decode for Label {
		fn decode(decoder: &Decoder<'_>) -> Result<Self> {
			Ok(Self(decoder.keyed()?.read("text")))
		}
	}

	let root = Value::object([("label", Value::object([("caption", Value::text("hi"))]))]);
	let session = DecodeSession::new(&root, KeyAliases::none().with("text", ["caption"]));
	let decoder = session.decoder();
	let label: Label = decoder.keyed().expect("keyed").read_structured("label").expect("label");
	assert_eq!(label.0, "hi");
}
