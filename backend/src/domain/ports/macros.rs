//! `define_port_error!`: builds a `thiserror` enum plus one snake_case
//! constructor per variant whose string fields accept `impl Into<String>`.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum StoragePortError {
            Connection { message: String } => "connection failed: {message}",
            Conflict { attempts: u32 } => "gave up after {attempts} attempts",
            Stale { message: String, attempts: u32 } => "stale {message} after {attempts}",
            Closed => "closed",
        }
    }

    #[test]
    fn string_fields_accept_borrowed_input() {
        let err = StoragePortError::connection("refused");
        assert_eq!(err.to_string(), "connection failed: refused");
    }

    #[test]
    fn non_string_fields_keep_their_type() {
        assert_eq!(
            StoragePortError::conflict(3_u32).to_string(),
            "gave up after 3 attempts"
        );
    }

    #[test]
    fn mixed_and_unit_variants_get_constructors() {
        assert_eq!(
            StoragePortError::stale("listing", 2_u32).to_string(),
            "stale listing after 2"
        );
        assert_eq!(StoragePortError::closed(), StoragePortError::Closed);
    }
}
