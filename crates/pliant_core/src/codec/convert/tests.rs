use std::collections::{BTreeMap, HashMap};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use crate::codec::{Value, from_value, to_value};

#[test]
fn value_round_trips_through_sessions() {
	let tree = Value::object([
		("name", Value::text("probe")),
		("count", Value::Int(-3)),
		("ratio", Value::Float(0.25)),
		("flags", Value::array([Value::Bool(true), Value::Null])),
		("nested", Value::object([("empty", Value::array([])), ("inner", Value::object::<&str>([]))])),
	]);

	let encoded = to_value(&tree).expect("encode");
	assert_eq!(encoded, tree);
	assert_eq!(from_value::<Value>(&encoded).expect("decode"), tree);
}

#[test]
fn option_maps_null_to_none() {
	assert_eq!(from_value::<Option<i32>>(&Value::Null).expect("null"), None);
	assert_eq!(from_value::<Option<i32>>(&Value::text("12")).expect("text"), Some(12));
	assert_eq!(to_value(&None::<i32>).expect("none"), Value::Null);
	assert_eq!(to_value(&Some("x")).expect("some"), Value::text("x"));
}

#[test]
fn sequences_coerce_each_element() {
	let value = Value::array([Value::Int(1), Value::text("2"), Value::Bool(true), Value::Null]);
	assert_eq!(from_value::<Vec<u8>>(&value).expect("vec"), vec![1, 2, 1, 0]);
	assert_eq!(from_value::<Vec<u8>>(&Value::Int(5)).expect("scalar as sequence"), Vec::<u8>::new());
	assert_eq!(to_value(&vec![1_u8, 2]).expect("encode"), Value::array([Value::Int(1), Value::Int(2)]));
}

#[test]
fn maps_keep_every_member() {
	let value = Value::object([("b", Value::Int(2)), ("a", Value::text("1"))]);

	let ordered: BTreeMap<String, i64> = from_value(&value).expect("btree");
	assert_eq!(ordered.into_iter().collect::<Vec<_>>(), vec![("a".to_owned(), 1), ("b".to_owned(), 2)]);

	let hashed: HashMap<String, i64> = from_value(&value).expect("hash");
	assert_eq!(hashed.len(), 2);
	assert_eq!(to_value(&hashed).expect("encode"), Value::object([("a", Value::Int(1)), ("b", Value::Int(2))]));
}

#[test]
fn text_form_types_round_trip() {
	let addr: SocketAddr = "127.0.0.1:8080".parse().expect("addr");
	assert_eq!(to_value(&addr).expect("encode"), Value::text("127.0.0.1:8080"));
	assert_eq!(from_value::<SocketAddr>(&Value::text("127.0.0.1:8080")).expect("decode"), addr);

	let path = PathBuf::from("fixtures/profile.json");
	assert_eq!(to_value(&path).expect("encode"), Value::text("fixtures/profile.json"));
	assert_eq!(from_value::<PathBuf>(&Value::text("fixtures/profile.json")).expect("decode"), path);
}

#[test]
fn unparsable_addresses_fall_back_to_unspecified() {
	assert_eq!(from_value::<IpAddr>(&Value::Int(7)).expect("decode"), IpAddr::V4(Ipv4Addr::UNSPECIFIED));
	assert_eq!(from_value::<SocketAddr>(&Value::text("nowhere")).expect("decode").port(), 0);
}

#[test]
fn boxed_and_unit_values() {
	assert_eq!(from_value::<Box<i64>>(&Value::Float(2.9)).expect("box"), Box::new(2));
	assert_eq!(to_value(&()).expect("unit"), Value::Null);
	from_value::<()>(&Value::Int(1)).expect("unit ignores input");
}
