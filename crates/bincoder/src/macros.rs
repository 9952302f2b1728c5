/// Declares a fieldless enum backed by an integer and makes it usable as a field.
///
/// The backing type must be one of `u8`, `i16`, `i32` or `i64`; the enum is
/// packed as that integer. The generated enum derives `Debug`, `Clone`, `Copy`,
/// `PartialEq` and `Eq`. Decoding a discriminant that matches no variant fails
/// with [`ReadError::InvalidValue`](crate::ReadError::InvalidValue).
///
/// ```
/// bincoder::bit_enum! {
///     pub enum Direction: u8 {
///         North = 0,
///         East = 1,
///         South = 2,
///         West = 3,
///     }
/// }
///
/// use bincoder::{FieldValue, TypeTag, Value};
///
/// assert_eq!(Direction::TAG, TypeTag::Enum(&TypeTag::Byte));
/// assert_eq!(Direction::South.into_value(), Some(Value::Byte(2)));
/// assert_eq!(Direction::from_value(Value::Byte(3)).unwrap(), Direction::West);
/// assert!(Direction::from_value(Value::Byte(4)).is_err());
/// ```
#[macro_export]
macro_rules! bit_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $repr:ident {
            $($(#[$vmeta:meta])* $variant:ident = $value:expr),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[repr($repr)]
        $vis enum $name {
            $($(#[$vmeta])* $variant = $value),+
        }

        impl $crate::FieldValue for $name {
            const TAG: $crate::TypeTag =
                $crate::TypeTag::Enum(&<$repr as $crate::FieldValue>::TAG);

            fn into_value(self) -> ::core::option::Option<$crate::Value> {
                <$repr as $crate::FieldValue>::into_value(self as $repr)
            }

            fn from_value(
                value: $crate::Value,
            ) -> ::core::result::Result<Self, $crate::ReadError> {
                let raw = <$repr as $crate::FieldValue>::from_value(value)?;
                $(
                    if raw == $name::$variant as $repr {
                        return ::core::result::Result::Ok($name::$variant);
                    }
                )+
                ::core::result::Result::Err($crate::ReadError::InvalidValue(::std::format!(
                    "{} is not a valid {}",
                    raw,
                    ::core::stringify!($name)
                )))
            }
        }
    };
}
