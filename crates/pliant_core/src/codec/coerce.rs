use tracing::debug;

use crate::codec::Value;

/// Total, lenient conversion from any [`Value`] kind into a scalar type.
///
/// Implementations never fail: mismatched kinds resolve to a fixed fallback
/// (zero, `false`, or a placeholder string) and are only reported through a
/// `debug` event.
pub trait Coerce: Sized {
	/// Name of the target type used in diagnostics.
	const TYPE_NAME: &'static str;

	/// Convert `value` into `Self`.
	fn coerce(value: &Value) -> Self;
}

/// Convert `value` into `T` using the coercion matrix.
pub fn coerce<T: Coerce>(value: &Value) -> T {
	T::coerce(value)
}

/// Null query independent of coercion.
pub fn is_null(value: &Value) -> bool {
	value.is_null()
}

fn absorbed(value: &Value, target: &'static str) {
	debug!(source = %value.kind(), target, "coercion mismatch absorbed");
}

macro_rules! coerce_int {
	($($ty:ty),* $(,)?) => {$(
		impl Coerce for $ty {
			const TYPE_NAME: &'static str = stringify!($ty);

			fn coerce(value: &Value) -> Self {
				match value {
					Value::Int(v) => <$ty>::try_from(*v).unwrap_or_else(|_| {
						absorbed(value, Self::TYPE_NAME);
						if *v < 0 { <$ty>::MIN } else { <$ty>::MAX }
					}),
					Value::Float(v) => {
						// `as` saturates and maps NaN to zero.
						let narrowed = *v as $ty;
						if narrowed as f64 != *v {
							absorbed(value, Self::TYPE_NAME);
						}
						narrowed
					}
					Value::Bool(v) => {
						absorbed(value, Self::TYPE_NAME);
						<$ty>::from(*v)
					}
					Value::Text(text) => {
						absorbed(value, Self::TYPE_NAME);
						text.parse().unwrap_or(0)
					}
					Value::Null | Value::Array(_) | Value::Object(_) => {
						absorbed(value, Self::TYPE_NAME);
						0
					}
				}
			}
		}
	)*};
}

coerce_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Coerce for f64 {
	const TYPE_NAME: &'static str = "f64";

	fn coerce(value: &Value) -> Self {
		match value {
			Value::Int(v) => {
				let widened = *v as f64;
				if widened as i128 != i128::from(*v) {
					absorbed(value, Self::TYPE_NAME);
				}
				widened
			}
			Value::Float(v) => *v,
			Value::Bool(v) => {
				absorbed(value, Self::TYPE_NAME);
				f64::from(u8::from(*v))
			}
			Value::Text(text) => {
				absorbed(value, Self::TYPE_NAME);
				text.parse().unwrap_or(0.0)
			}
			Value::Null | Value::Array(_) | Value::Object(_) => {
				absorbed(value, Self::TYPE_NAME);
				0.0
			}
		}
	}
}

impl Coerce for f32 {
	const TYPE_NAME: &'static str = "f32";

	fn coerce(value: &Value) -> Self {
		match value {
			Value::Int(v) => {
				let narrowed = *v as f32;
				if narrowed as i128 != i128::from(*v) {
					absorbed(value, Self::TYPE_NAME);
				}
				narrowed
			}
			Value::Float(v) => {
				let narrowed = narrow_f64(*v);
				if f64::from(narrowed) != *v && !v.is_nan() {
					absorbed(value, Self::TYPE_NAME);
				}
				narrowed
			}
			Value::Bool(v) => {
				absorbed(value, Self::TYPE_NAME);
				f32::from(u8::from(*v))
			}
			Value::Text(text) => {
				absorbed(value, Self::TYPE_NAME);
				text.parse().unwrap_or(0.0)
			}
			Value::Null | Value::Array(_) | Value::Object(_) => {
				absorbed(value, Self::TYPE_NAME);
				0.0
			}
		}
	}
}

/// Clamp finite values into the `f32` range instead of overflowing to infinity.
fn narrow_f64(value: f64) -> f32 {
	if value.is_finite() {
		value.clamp(f64::from(f32::MIN), f64::from(f32::MAX)) as f32
	} else {
		value as f32
	}
}

impl Coerce for bool {
	const TYPE_NAME: &'static str = "bool";

	fn coerce(value: &Value) -> Self {
		match value {
			Value::Bool(v) => *v,
			Value::Int(v) => {
				absorbed(value, Self::TYPE_NAME);
				*v == 1
			}
			Value::Float(v) => {
				absorbed(value, Self::TYPE_NAME);
				*v == 1.0
			}
			Value::Text(text) => {
				absorbed(value, Self::TYPE_NAME);
				text.parse().unwrap_or(false)
			}
			Value::Null | Value::Array(_) | Value::Object(_) => {
				absorbed(value, Self::TYPE_NAME);
				false
			}
		}
	}
}

impl Coerce for String {
	const TYPE_NAME: &'static str = "string";

	fn coerce(value: &Value) -> Self {
		match value {
			Value::Text(text) => text.to_string(),
			Value::Int(v) => {
				absorbed(value, Self::TYPE_NAME);
				v.to_string()
			}
			Value::Float(v) => {
				absorbed(value, Self::TYPE_NAME);
				render_float(*v)
			}
			Value::Bool(v) => {
				absorbed(value, Self::TYPE_NAME);
				v.to_string()
			}
			Value::Null => {
				absorbed(value, Self::TYPE_NAME);
				"null".to_owned()
			}
			Value::Array(_) => {
				absorbed(value, Self::TYPE_NAME);
				"[]".to_owned()
			}
			Value::Object(_) => {
				absorbed(value, Self::TYPE_NAME);
				"[:]".to_owned()
			}
		}
	}
}

/// Shortest round-trip decimal; integral values keep a trailing `.0`.
fn render_float(value: f64) -> String {
	if value.is_nan() {
		"NaN".to_owned()
	} else if value.is_infinite() {
		if value > 0.0 { "inf".to_owned() } else { "-inf".to_owned() }
	} else {
		format!("{value:?}")
	}
}

/// Scalar-to-value mapping used by encode containers.
pub trait IntoValue {
	/// Convert into a tree node.
	fn into_value(self) -> Value;
}

impl IntoValue for Value {
	fn into_value(self) -> Value {
		self
	}
}

impl IntoValue for bool {
	fn into_value(self) -> Value {
		Value::Bool(self)
	}
}

macro_rules! into_value_lossless {
	($($ty:ty),* $(,)?) => {$(
		impl IntoValue for $ty {
			fn into_value(self) -> Value {
				Value::Int(i64::from(self))
			}
		}
	)*};
}

into_value_lossless!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! into_value_wide {
	($($ty:ty),* $(,)?) => {$(
		impl IntoValue for $ty {
			/// Values beyond the `i64` range are stored as floats.
			fn into_value(self) -> Value {
				match i64::try_from(self) {
					Ok(v) => Value::Int(v),
					Err(_) => Value::Float(self as f64),
				}
			}
		}
	)*};
}

into_value_wide!(isize, u64, usize);

impl IntoValue for f32 {
	fn into_value(self) -> Value {
		Value::Float(f64::from(self))
	}
}

impl IntoValue for f64 {
	fn into_value(self) -> Value {
		Value::Float(self)
	}
}

impl IntoValue for &str {
	fn into_value(self) -> Value {
		Value::Text(self.into())
	}
}

impl IntoValue for String {
	fn into_value(self) -> Value {
		Value::Text(self.into_boxed_str())
	}
}

impl<T: IntoValue> IntoValue for Option<T> {
	fn into_value(self) -> Value {
		self.map_or(Value::Null, IntoValue::into_value)
	}
}
