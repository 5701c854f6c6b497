//! Helper macro for declaring port error enums.
//!
//! Each variant gets a snake-case constructor whose fields accept `impl Into`.

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
    //! Regression coverage for this module.
    define_port_error! {
        pub enum SamplePersistenceError {
            Connection { message: String } => "connection failed: {message}",
            Conflict => "row already exists",
            Rejected { table: String, affected: usize } => "{table}: {affected} rows",
        }
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = SamplePersistenceError::connection("pool closed");
        assert_eq!(err.to_string(), "connection failed: pool closed");
    }

    #[test]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(
            SamplePersistenceError::conflict(),
            SamplePersistenceError::Conflict
        );
    }

    #[test]
    fn constructors_support_mixed_fields() {
        let err = SamplePersistenceError::rejected("posts", 2_usize);
        assert_eq!(err.to_string(), "posts: 2 rows");
    }
}
