//! Record registration.
//!
//! A record type describes its writable fields once, at compile time, through
//! the [`Record`] trait. The [`record!`](crate::record) macro writes that
//! impl for a plain struct:
//!
//! ```rust
//! use rowmap::record;
//!
//! #[derive(Debug, Default)]
//! struct Dto {
//!     a: i32,
//!     b: Option<i16>,
//!     name: Option<String>,
//! }
//!
//! record! {
//!     Dto {
//!         a: i32 => "A",
//!         b: Option<i16> => "B",
//!         name: Option<String>,
//!     }
//! }
//! ```
//!
//! Fields without `=> "column"` match a column named after the field.

use crate::error::{MapError, Result};
use crate::mapper::{Coercion, Getter};

use super::schema::PropertyDescriptor;
use super::traits::{Cursor, FieldType};

/// One compiled read-coerce-assign operation.
pub(crate) type Step<T> = Box<dyn Fn(&dyn Cursor, &mut T) -> Result<()> + Send + Sync>;

type Binder<T> = Box<dyn Fn(&'static str, usize, Getter, Coercion) -> Step<T> + Send + Sync>;

/// A destination type rows can be materialized into.
pub trait Record: Sized + 'static {
    /// Type name used in error messages.
    fn record_name() -> &'static str;

    /// Properties in a stable declaration order.
    ///
    /// Must return the same slice on every call.
    fn properties() -> &'static [Property<Self>];
}

/// A property of record type `T` and the typed setter behind it.
pub struct Property<T> {
    descriptor: PropertyDescriptor,
    binder: Option<Binder<T>>,
}

impl<T: 'static> Property<T> {
    /// Writable property stored through `setter`.
    pub fn new<F: FieldType>(name: &'static str, setter: fn(&mut T, F)) -> Self {
        let binder: Binder<T> = Box::new(move |record, ordinal, getter, coercion| {
            Box::new(move |cursor: &dyn Cursor, dto: &mut T| {
                let cell = getter(cursor, ordinal)?;
                let value = coercion(cell)?;
                let field = F::from_sql(value).ok_or_else(|| {
                    MapError::Internal(format!(
                        "coerced value for {}.{} is not {}",
                        record,
                        name,
                        F::SQL_TYPE
                    ))
                })?;
                setter(dto, field);
                Ok(())
            })
        });

        Self {
            descriptor: PropertyDescriptor {
                name,
                sql_type: F::SQL_TYPE,
                nullable: F::NULLABLE,
                writable: true,
            },
            binder: Some(binder),
        }
    }

    /// Property that is described but never bound to a column.
    pub fn read_only<F: FieldType>(name: &'static str) -> Self {
        Self {
            descriptor: PropertyDescriptor {
                name,
                sql_type: F::SQL_TYPE,
                nullable: F::NULLABLE,
                writable: false,
            },
            binder: None,
        }
    }

    pub fn descriptor(&self) -> &PropertyDescriptor {
        &self.descriptor
    }

    /// Compose "assign ← coerce(get(cursor, ordinal))" for this property.
    pub(crate) fn bind(
        &self,
        record: &'static str,
        ordinal: usize,
        getter: Getter,
        coercion: Coercion,
    ) -> Option<Step<T>> {
        self.binder
            .as_ref()
            .map(|binder| binder(record, ordinal, getter, coercion))
    }
}

impl<T> std::fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Property")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

/// Implement [`Record`] for a struct by listing its mapped fields.
///
/// See the [module documentation](crate::core::record) for the syntax.
#[macro_export]
macro_rules! record {
    (@column $field:ident) => {
        stringify!($field)
    };
    (@column $field:ident $column:literal) => {
        $column
    };
    ($ty:ident { $( $field:ident : $fty:ty $(=> $column:literal)? ),* $(,)? }) => {
        impl $crate::Record for $ty {
            fn record_name() -> &'static str {
                stringify!($ty)
            }

            fn properties() -> &'static [$crate::Property<Self>] {
                static PROPERTIES: ::std::sync::OnceLock<::std::vec::Vec<$crate::Property<$ty>>> =
                    ::std::sync::OnceLock::new();
                PROPERTIES.get_or_init(|| {
                    ::std::vec![
                        $(
                            $crate::Property::new::<$fty>(
                                $crate::record!(@column $field $($column)?),
                                |dto: &mut $ty, value: $fty| dto.$field = value,
                            )
                        ),*
                    ]
                })
            }
        }
    };
}
