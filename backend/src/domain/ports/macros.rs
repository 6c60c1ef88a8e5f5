//! `define_port_error!` builds a port error enum with `thiserror` messages
//! and one snake_case constructor per variant taking `impl Into` fields.

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
    //! Constructor generation for port error enums.
    define_port_error! {
        pub enum ShelfPortError {
            Offline { message: String } => "shelf offline: {message}",
            Overdue { days: u32 } => "overdue by {days} days",
            Mixed { title: String, copies: u32 } => "{title} has {copies} copies",
        }
    }

    #[test]
    fn string_fields_accept_borrowed_input() {
        assert_eq!(ShelfPortError::offline("pool").to_string(), "shelf offline: pool");
    }

    #[test]
    fn numeric_fields_keep_their_type() {
        assert_eq!(ShelfPortError::overdue(3_u32).to_string(), "overdue by 3 days");
    }

    #[test]
    fn mixed_fields_are_converted_in_order() {
        let err = ShelfPortError::mixed("Dune", 2_u32);
        assert_eq!(err, ShelfPortError::Mixed { title: "Dune".to_owned(), copies: 2 });
    }
}
