//! `define_port_error!` builds a port error enum together with snake_case
//! constructors whose `String` parameters accept anything `Into<String>`.

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
    use rstest::rstest;

    define_port_error! {
        pub enum StoragePortError {
            Unavailable => "storage unavailable",
            Rejected { reason: String } => "rejected: {reason}",
            Slow { millis: u64 } => "slow: {millis}ms",
            Conflict { key: String, attempts: u32 } => "conflict on {key} after {attempts}",
        }
    }

    #[rstest]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(StoragePortError::unavailable(), StoragePortError::Unavailable);
    }

    #[rstest]
    fn string_fields_accept_str() {
        let err = StoragePortError::rejected("full disk");
        assert_eq!(err.to_string(), "rejected: full disk");
    }

    #[rstest]
    fn non_string_fields_keep_their_type() {
        assert_eq!(StoragePortError::slow(250_u64).to_string(), "slow: 250ms");
    }

    #[rstest]
    fn mixed_fields_are_ordered_as_declared() {
        let err = StoragePortError::conflict("confession_1", 3_u32);
        assert_eq!(err.to_string(), "conflict on confession_1 after 3");
    }
}
