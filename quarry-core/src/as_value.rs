use crate::{Error, Result, Value, truncate_long};
use anyhow::Context;
use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use std::{any, borrow::Cow};
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, Time, format_description::well_known::Rfc3339,
    macros::format_description,
};
use uuid::Uuid;

/// Conversion between native Rust types and the dynamically typed [`Value`].
///
/// It is used in both directions: records produce bound parameters through
/// `as_value` and result cells are written back into fields through
/// `try_from_value`.
///
/// Conversions accept the canonical variant of the type and, where it is
/// lossless or range checked, neighbouring variants. Drivers that only speak
/// a few storage classes (SQLite returns integers, doubles and text) rely on
/// this: an `i64` cell fills an `i32` field when it fits, a text cell fills a
/// `Uuid` or a `PrimitiveDateTime` field when it parses.
///
/// ```rust
/// use quarry_core::{AsValue, Value};
/// let v = 42i32.as_value();
/// assert!(matches!(v, Value::Int32(Some(42))));
/// let n: i16 = AsValue::try_from_value(Value::Int64(Some(42))).unwrap();
/// assert_eq!(n, 42);
/// ```
pub trait AsValue {
    /// The NULL value of the variant representing this type. It is the type
    /// prototype recorded in field descriptors.
    fn as_empty_value() -> Value;
    /// Convert into the owned [`Value`] representation.
    fn as_value(self) -> Value;
    /// Attempt to convert a dynamic [`Value`] into `Self`.
    fn try_from_value(value: Value) -> Result<Self>
    where
        Self: Sized;
    /// Parse the textual representation, used for text cells.
    fn parse(input: &str) -> Result<Self>
    where
        Self: Sized,
    {
        Err(Error::msg(format!(
            "Cannot parse `{}` as {}",
            truncate_long!(input),
            any::type_name::<Self>()
        )))
    }
}

impl<T: AsValue> From<T> for Value {
    fn from(value: T) -> Self {
        value.as_value()
    }
}

impl From<&'static str> for Value {
    fn from(value: &'static str) -> Self {
        Value::Varchar(Some(value.into()))
    }
}

fn cannot_convert<T>(value: &Value) -> Error {
    Error::msg(format!(
        "Cannot convert {value:?} to {}",
        any::type_name::<T>()
    ))
}

/// Integral content of any integer variant.
fn integer_of(value: &Value) -> Option<i128> {
    Some(match value {
        Value::Int8(Some(v)) => *v as i128,
        Value::Int16(Some(v)) => *v as i128,
        Value::Int32(Some(v)) => *v as i128,
        Value::Int64(Some(v)) => *v as i128,
        Value::UInt8(Some(v)) => *v as i128,
        Value::UInt16(Some(v)) => *v as i128,
        Value::UInt32(Some(v)) => *v as i128,
        Value::UInt64(Some(v)) => *v as i128,
        _ => return None,
    })
}

macro_rules! impl_as_value {
    ($source:ty, $destination:path) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $destination(None)
            }
            fn as_value(self) -> Value {
                $destination(Some(self))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                if let Some(v) = integer_of(&value) {
                    return <$source>::try_from(v).map_err(|_| {
                        Error::msg(format!(
                            "Value {v} is out of range for {}",
                            any::type_name::<Self>(),
                        ))
                    });
                }
                match value {
                    Value::Decimal(Some(v)) if v.is_integer() => v
                        .to_i128()
                        .and_then(|v| <$source>::try_from(v).ok())
                        .ok_or_else(|| {
                            Error::msg(format!(
                                "Value {v}: Decimal does not fit into {}",
                                any::type_name::<Self>()
                            ))
                        }),
                    Value::Varchar(Some(ref v)) => <Self as AsValue>::parse(v),
                    _ => Err(cannot_convert::<Self>(&value)),
                }
            }
            fn parse(input: &str) -> Result<Self> {
                input.trim().parse::<$source>().with_context(|| {
                    format!(
                        "Cannot parse `{}` as {}",
                        truncate_long!(input),
                        any::type_name::<Self>()
                    )
                })
            }
        }
    };
}
impl_as_value!(i8, Value::Int8);
impl_as_value!(i16, Value::Int16);
impl_as_value!(i32, Value::Int32);
impl_as_value!(i64, Value::Int64);
impl_as_value!(u8, Value::UInt8);
impl_as_value!(u16, Value::UInt16);
impl_as_value!(u32, Value::UInt32);
impl_as_value!(u64, Value::UInt64);

impl AsValue for bool {
    fn as_empty_value() -> Value {
        Value::Boolean(None)
    }
    fn as_value(self) -> Value {
        Value::Boolean(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        if let Some(v) = integer_of(&value) {
            return Ok(v != 0);
        }
        match value {
            Value::Boolean(Some(v)) => Ok(v),
            Value::Varchar(Some(ref v)) => <Self as AsValue>::parse(v),
            _ => Err(cannot_convert::<Self>(&value)),
        }
    }
    fn parse(input: &str) -> Result<Self> {
        match input.trim() {
            x if x.eq_ignore_ascii_case("true") || x.eq_ignore_ascii_case("t") || x == "1" => {
                Ok(true)
            }
            x if x.eq_ignore_ascii_case("false") || x.eq_ignore_ascii_case("f") || x == "0" => {
                Ok(false)
            }
            _ => Err(Error::msg(format!(
                "Cannot parse boolean from `{}`",
                truncate_long!(input)
            ))),
        }
    }
}

macro_rules! impl_as_value {
    ($source:ty, $destination:path, $to_float:ident) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $destination(None)
            }
            fn as_value(self) -> Value {
                $destination(Some(self))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                if let Some(v) = integer_of(&value) {
                    return Ok(v as _);
                }
                match value {
                    Value::Float32(Some(v)) => Ok(v as _),
                    Value::Float64(Some(v)) => Ok(v as _),
                    Value::Decimal(Some(v)) => v.$to_float().ok_or_else(|| {
                        Error::msg(format!(
                            "Value {v}: Decimal does not fit into {}",
                            any::type_name::<Self>()
                        ))
                    }),
                    Value::Varchar(Some(ref v)) => <Self as AsValue>::parse(v),
                    _ => Err(cannot_convert::<Self>(&value)),
                }
            }
            fn parse(input: &str) -> Result<Self> {
                input.trim().parse::<$source>().with_context(|| {
                    format!(
                        "Cannot extract a floating point value from `{}`",
                        truncate_long!(input)
                    )
                })
            }
        }
    };
}
impl_as_value!(f32, Value::Float32, to_f32);
impl_as_value!(f64, Value::Float64, to_f64);

impl AsValue for Decimal {
    fn as_empty_value() -> Value {
        Value::Decimal(None)
    }
    fn as_value(self) -> Value {
        Value::Decimal(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        if let Some(v) = integer_of(&value) {
            return Decimal::from_i128(v).ok_or_else(|| cannot_convert::<Self>(&value));
        }
        match value {
            Value::Decimal(Some(v)) => Ok(v),
            Value::Float32(Some(v)) => {
                Decimal::from_f32(v).ok_or_else(|| cannot_convert::<Self>(&value))
            }
            Value::Float64(Some(v)) => {
                Decimal::from_f64(v).ok_or_else(|| cannot_convert::<Self>(&value))
            }
            Value::Varchar(Some(ref v)) => <Self as AsValue>::parse(v),
            _ => Err(cannot_convert::<Self>(&value)),
        }
    }
    fn parse(input: &str) -> Result<Self> {
        input
            .trim()
            .parse::<Decimal>()
            .with_context(|| format!("Cannot parse `{}` as Decimal", truncate_long!(input)))
    }
}

impl AsValue for String {
    fn as_empty_value() -> Value {
        Value::Varchar(None)
    }
    fn as_value(self) -> Value {
        Value::Varchar(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Varchar(Some(v)) => Ok(v),
            _ => Err(cannot_convert::<Self>(&value)),
        }
    }
    fn parse(input: &str) -> Result<Self> {
        Ok(input.into())
    }
}

impl<'a> AsValue for Cow<'a, str> {
    fn as_empty_value() -> Value {
        Value::Varchar(None)
    }
    fn as_value(self) -> Value {
        Value::Varchar(Some(self.into()))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        String::try_from_value(value).map(Into::into)
    }
    fn parse(input: &str) -> Result<Self> {
        Ok(Cow::Owned(input.into()))
    }
}

impl AsValue for Box<[u8]> {
    fn as_empty_value() -> Value {
        Value::Blob(None)
    }
    fn as_value(self) -> Value {
        Value::Blob(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Blob(Some(v)) => Ok(v),
            Value::Varchar(Some(v)) => Ok(v.into_bytes().into_boxed_slice()),
            _ => Err(cannot_convert::<Self>(&value)),
        }
    }
}

impl AsValue for Uuid {
    fn as_empty_value() -> Value {
        Value::Uuid(None)
    }
    fn as_value(self) -> Value {
        Value::Uuid(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Uuid(Some(v)) => Ok(v),
            Value::Varchar(Some(ref v)) => <Self as AsValue>::parse(v),
            Value::Blob(Some(ref v)) => Uuid::from_slice(v)
                .with_context(|| format!("Cannot convert {value:?} to Uuid")),
            _ => Err(cannot_convert::<Self>(&value)),
        }
    }
    fn parse(input: &str) -> Result<Self> {
        Uuid::parse_str(input.trim())
            .with_context(|| format!("Cannot extract a uuid value from `{}`", truncate_long!(input)))
    }
}

/// Tries each format in turn, the first one that parses the whole input wins.
macro_rules! parse_time {
    ($type:ty, $input:expr, $($format:expr),+ $(,)?) => {{
        let input = $input.trim();
        None
            $(.or_else(|| <$type>::parse(input, $format).ok()))+
            .ok_or_else(|| {
                Error::msg(format!(
                    "Cannot parse `{}` as {}",
                    truncate_long!(input),
                    any::type_name::<$type>()
                ))
            })
    }};
}

macro_rules! impl_as_value {
    ($source:ty, $destination:path, $parse:expr $(, $pat_rest:pat => $expr_rest:expr)* $(,)?) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $destination(None)
            }
            fn as_value(self) -> Value {
                $destination(Some(self))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                match value {
                    $destination(Some(v)) => Ok(v),
                    $($pat_rest => $expr_rest,)*
                    Value::Varchar(Some(ref v)) => <Self as AsValue>::parse(v),
                    _ => Err(cannot_convert::<Self>(&value)),
                }
            }
            fn parse(input: &str) -> Result<Self> {
                $parse(input)
            }
        }
    };
}
impl_as_value!(Date, Value::Date, |input: &str| parse_time!(
    Date,
    input,
    format_description!("[year]-[month]-[day]"),
));
impl_as_value!(Time, Value::Time, |input: &str| parse_time!(
    Time,
    input,
    format_description!("[hour]:[minute]:[second].[subsecond]"),
    format_description!("[hour]:[minute]:[second]"),
    format_description!("[hour]:[minute]"),
));
impl_as_value!(
    PrimitiveDateTime,
    Value::Timestamp,
    |input: &str| parse_time!(
        PrimitiveDateTime,
        input,
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]"),
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
        format_description!("[year]-[month]-[day] [hour]:[minute]"),
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
        format_description!("[year]-[month]-[day]T[hour]:[minute]"),
    ),
    Value::TimestampWithTimezone(Some(v)) => {
        Ok(PrimitiveDateTime::new(v.date(), v.time()))
    },
);
impl_as_value!(
    OffsetDateTime,
    Value::TimestampWithTimezone,
    |input: &str| parse_time!(
        OffsetDateTime,
        input,
        &Rfc3339,
        format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond][offset_hour sign:mandatory]:[offset_minute]"
        ),
        format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]"
        ),
    )
    .or_else(|_| <PrimitiveDateTime as AsValue>::parse(input).map(|v| v.assume_utc())),
    Value::Timestamp(Some(v)) => Ok(v.assume_utc()),
);

impl<T: AsValue> AsValue for Option<T> {
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Value {
        match self {
            Some(v) => v.as_value(),
            None => T::as_empty_value(),
        }
    }
    fn try_from_value(value: Value) -> Result<Self> {
        Ok(if value.is_null() {
            None
        } else {
            Some(<T as AsValue>::try_from_value(value)?)
        })
    }
    fn parse(input: &str) -> Result<Self> {
        if input.trim().eq_ignore_ascii_case("null") {
            return Ok(None);
        }
        T::parse(input).map(Some)
    }
}

impl<T: AsValue> AsValue for Box<T> {
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Value {
        (*self).as_value()
    }
    fn try_from_value(value: Value) -> Result<Self> {
        Ok(Self::new(<T as AsValue>::try_from_value(value)?))
    }
    fn parse(input: &str) -> Result<Self> {
        T::parse(input).map(Self::new)
    }
}

impl<T: AsValue> AsValue for Vec<T> {
    fn as_empty_value() -> Value {
        Value::List(None, Box::new(T::as_empty_value()))
    }
    fn as_value(self) -> Value {
        Value::List(
            Some(self.into_iter().map(AsValue::as_value).collect()),
            Box::new(T::as_empty_value()),
        )
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::List(Some(v), ..) => v.into_iter().map(T::try_from_value).collect(),
            Value::List(None, ..) => Ok(Vec::new()),
            _ => Err(cannot_convert::<Self>(&value)),
        }
    }
}
