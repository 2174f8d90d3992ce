/// Создаёт новый доменный тип поля формы.
/// Значение такого типа всегда прошло проверку на обязательность.
#[macro_export]
macro_rules! newtype {
    ($tname:ident, $field:expr) => {
        #[derive(
            std::fmt::Debug,
            std::clone::Clone,
            serde::Serialize,
            serde::Deserialize,
            std::cmp::PartialEq,
            std::cmp::Eq,
        )]
        #[serde(try_from = "String")]
        pub struct $tname(String);

        impl $tname {
            pub fn new(value: &str) -> std::result::Result<Self, $crate::model::FieldError> {
                Self::validate(value)?;
                Ok(Self(value.into()))
            }

            fn validate(value: &str) -> std::result::Result<(), $crate::model::FieldError> {
                $crate::model::required($field, value)
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        #[allow(clippy::from_over_into)]
        impl std::convert::Into<String> for $tname {
            fn into(self) -> String {
                self.0
            }
        }

        impl std::convert::TryFrom<String> for $tname {
            type Error = $crate::model::FieldError;

            fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
                $tname::new(&value)
            }
        }

        impl std::fmt::Display for $tname {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}
