//! Declarative record definitions.

/// Declare a record struct together with its copybook layout.
///
/// Every field starts with exactly one layout attribute, written before
/// any doc comment or other attribute on that field:
///
/// - `#[pic("TAG")]`: elementary field with a type tag such as `"X(30)"`,
///   `"S9(7)"`, `"CUST-ID,9(5)"` or `"S9(9)COMP-3"`
/// - `#[group]`: nested record; the field type must implement `Copybook`
/// - `#[occurs(count)]`: repeated group held in a `Vec`; `count` names an
///   earlier numeric field holding the number of elements
/// - `#[skip]`: not part of the wire layout
///
/// The struct must derive (or implement) `Default`. Fields appear on the
/// wire in declaration order.
///
/// # Example
///
/// ```rust
/// use open_mainframe_commarea::{copybook, decode, encode};
///
/// copybook! {
///     #[derive(Debug, Clone, Default, PartialEq)]
///     pub struct Item {
///         #[pic("X(4)")]
///         pub sku: String,
///         #[pic("S9(5)COMP-3")]
///         pub price: i64,
///     }
/// }
///
/// copybook! {
///     #[derive(Debug, Clone, Default, PartialEq)]
///     pub struct Order {
///         #[pic("ORDER-ID,9(6)")]
///         pub id: u32,
///         #[pic("9(2)")]
///         pub item_count: u16,
///         #[occurs(item_count)]
///         pub items: Vec<Item>,
///     }
/// }
///
/// let order = Order {
///     id: 42,
///     item_count: 1,
///     items: vec![Item { sku: "AB12".into(), price: -150 }],
/// };
/// let bytes = encode(&order).unwrap();
/// assert_eq!(bytes.len(), 6 + 2 + 4 + 3);
/// assert_eq!(decode::<Order>(&bytes).unwrap(), order);
/// ```
#[macro_export]
macro_rules! copybook {
    (@slot pic, $place:expr) => {
        ::core::option::Option::Some($crate::FieldSlot::slot(&$place))
    };
    (@slot group, $place:expr) => {
        ::core::option::Option::Some($crate::Slot::Group(&$place))
    };
    (@slot occurs, $place:expr) => {
        ::core::option::Option::Some($crate::Slot::Occurs(&$place))
    };
    (@slot skip, $place:expr) => {
        ::core::option::Option::None
    };

    (@slot_mut pic, $place:expr) => {
        ::core::option::Option::Some($crate::FieldSlot::slot_mut(&mut $place))
    };
    (@slot_mut group, $place:expr) => {
        ::core::option::Option::Some($crate::SlotMut::Group(&mut $place))
    };
    (@slot_mut occurs, $place:expr) => {
        ::core::option::Option::Some($crate::SlotMut::Occurs(&mut $place))
    };
    (@slot_mut skip, $place:expr) => {
        ::core::option::Option::None
    };

    (@layout $builder:ident, $field:ident, $fty:ty, pic($tag:literal)) => {
        $builder.field(stringify!($field), $tag)
    };
    (@layout $builder:ident, $field:ident, $fty:ty, group) => {
        $builder.group::<$fty>(stringify!($field))
    };
    (@layout $builder:ident, $field:ident, $fty:ty, occurs($count:ident)) => {
        $builder.occurs::<$fty>(stringify!($field), stringify!($count))
    };
    (@layout $builder:ident, $field:ident, $fty:ty, skip) => {
        $builder.skip(stringify!($field))
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                #[$kind:ident $( ( $($arg:tt)* ) )?]
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $fty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $fty,
            )*
        }

        impl $crate::Record for $name {
            fn slot(&self, name: &str) -> ::core::option::Option<$crate::Slot<'_>> {
                $(
                    if name == stringify!($field) {
                        return $crate::copybook!(@slot $kind, self.$field);
                    }
                )*
                ::core::option::Option::None
            }

            fn slot_mut(&mut self, name: &str) -> ::core::option::Option<$crate::SlotMut<'_>> {
                $(
                    if name == stringify!($field) {
                        return $crate::copybook!(@slot_mut $kind, self.$field);
                    }
                )*
                ::core::option::Option::None
            }
        }

        impl $crate::Copybook for $name {
            fn layout() -> $crate::SchemaBuilder {
                let builder = $crate::SchemaBuilder::new(stringify!($name));
                $(
                    let builder = $crate::copybook!(
                        @layout builder, $field, $fty, $kind $( ( $($arg)* ) )?
                    );
                )*
                builder
            }
        }
    };
}
