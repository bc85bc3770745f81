#[cfg(test)]
mod tests {
    use quarry_core::{AsValue, Value};
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use time::Date;
    use time::macros::{date, datetime, time};
    use uuid::Uuid;

    #[test]
    fn native_to_value() {
        assert_eq!(42i32.as_value(), Value::Int32(Some(42)));
        assert_eq!(true.as_value(), Value::Boolean(Some(true)));
        assert_eq!(Some(3u16).as_value(), Value::UInt16(Some(3)));
        assert_eq!(None::<i64>.as_value(), Value::Int64(None));
        assert_eq!(Value::from("text"), Value::Varchar(Some("text".into())));
        assert_eq!(
            vec![1i8, 2].as_value(),
            Value::List(
                Some(vec![Value::Int8(Some(1)), Value::Int8(Some(2))]),
                Box::new(Value::Int8(None))
            )
        );
        assert!(Value::Varchar(None).is_null());
        assert!(Value::Null.is_null());
        assert!(!Value::Int32(Some(0)).is_null());
        // Typed NULLs of different variants are different values
        assert_ne!(Value::Int32(None), Value::Int64(None));
        assert_eq!(Value::Int32(Some(5)).as_null(), Value::Int32(None));
    }

    #[test]
    fn integers() {
        assert_eq!(i16::try_from_value(Value::Int64(Some(42))).unwrap(), 42);
        assert_eq!(u8::try_from_value(Value::Int32(Some(255))).unwrap(), 255);
        assert!(u8::try_from_value(Value::Int32(Some(256))).is_err());
        assert!(u32::try_from_value(Value::Int64(Some(-1))).is_err());
        assert_eq!(i64::try_from_value(Value::from(" 17 ")).unwrap(), 17);
        assert_eq!(
            i32::try_from_value(Value::Decimal(Some(Decimal::from(9)))).unwrap(),
            9
        );
        assert!(i32::try_from_value(Value::Decimal(Decimal::from_str("1.5").ok())).is_err());
        assert!(i32::try_from_value(Value::Boolean(Some(true))).is_err());
    }

    #[test]
    fn booleans_and_floats() {
        assert!(bool::try_from_value(Value::Int64(Some(1))).unwrap());
        assert!(!bool::try_from_value(Value::Int64(Some(0))).unwrap());
        assert!(bool::try_from_value(Value::from("TRUE")).unwrap());
        assert!(!bool::try_from_value(Value::from("f")).unwrap());
        assert!(bool::try_from_value(Value::from("perhaps")).is_err());

        assert_eq!(f64::try_from_value(Value::Int64(Some(3))).unwrap(), 3.0);
        assert_eq!(f64::try_from_value(Value::from("2.5")).unwrap(), 2.5);
        assert_eq!(
            f32::try_from_value(Value::Decimal(Decimal::from_str("0.25").ok())).unwrap(),
            0.25
        );
        assert!(f64::try_from_value(Value::from("abc")).is_err());
        assert_eq!(
            Decimal::try_from_value(Value::Float64(Some(1.5))).unwrap(),
            Decimal::from_str("1.5").unwrap()
        );
        assert_eq!(
            Decimal::try_from_value(Value::from("12.34")).unwrap(),
            Decimal::from_str("12.34").unwrap()
        );
    }

    #[test]
    fn text_cells() {
        assert_eq!(
            Date::try_from_value(Value::from("2024-02-29")).unwrap(),
            date!(2024 - 02 - 29)
        );
        assert_eq!(
            time::Time::try_from_value(Value::from("10:30:15.5")).unwrap(),
            time!(10:30:15.5)
        );
        assert_eq!(
            time::PrimitiveDateTime::try_from_value(Value::from("2024-01-02 03:04:05")).unwrap(),
            datetime!(2024-01-02 03:04:05)
        );
        assert_eq!(
            time::PrimitiveDateTime::try_from_value(Value::from("2024-01-02T03:04")).unwrap(),
            datetime!(2024-01-02 03:04)
        );
        assert_eq!(
            time::OffsetDateTime::try_from_value(Value::from("2024-01-02T03:04:05+02:00"))
                .unwrap(),
            datetime!(2024-01-02 03:04:05 +2)
        );
        assert_eq!(
            time::OffsetDateTime::try_from_value(Value::from("2024-01-02 03:04:05")).unwrap(),
            datetime!(2024-01-02 03:04:05 UTC)
        );
        assert!(Date::try_from_value(Value::from("02/29/2024")).is_err());

        let id = Uuid::from_u128(0x6f1c_0a2e_41f4_4b4b_9c3e_2f41_d5e0_aa01);
        assert_eq!(Uuid::try_from_value(Value::from(id.to_string())).unwrap(), id);
        assert_eq!(
            Uuid::try_from_value(Value::Blob(Some(id.as_bytes().to_vec().into()))).unwrap(),
            id
        );
        assert_eq!(
            Box::<[u8]>::try_from_value(Value::from("ab")).unwrap().as_ref(),
            b"ab"
        );
    }

    #[test]
    fn optional_and_lists() {
        assert_eq!(Option::<i32>::try_from_value(Value::Null).unwrap(), None);
        assert_eq!(Option::<i32>::try_from_value(Value::Varchar(None)).unwrap(), None);
        assert_eq!(
            Option::<i32>::try_from_value(Value::Int64(Some(4))).unwrap(),
            Some(4)
        );
        assert!(String::try_from_value(Value::Null).is_err());
        assert!(String::try_from_value(Value::Int32(Some(1))).is_err());

        let list = vec!["a".to_string(), "b".to_string()].as_value();
        assert_eq!(
            Vec::<String>::try_from_value(list).unwrap(),
            ["a".to_string(), "b".to_string()]
        );
        assert!(Vec::<i32>::try_from_value(Value::Int32(Some(1))).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::Int32(None).to_string(), "NULL");
        assert_eq!(Value::Float64(Some(1.5)).to_string(), "1.5");
        assert_eq!(vec![1u8, 2].as_value().to_string(), "[1, 2]");
        assert_eq!(Value::Blob(Some(vec![1, 2, 3].into_boxed_slice())).to_string(), "<3 bytes>");
    }
}
