/// Assert that a value matches a pattern, optionally followed by a guard.
///
/// With a guard the value is matched by reference, so bindings in the pattern
/// borrow from it. A failed assertion prints the value.
#[macro_export]
macro_rules! assert_matches {
    ($expr:expr, $pat:pat $(,)?) => {
        match $expr {
            $pat => {}
            ref value => ::core::panic!(
                "assertion failed: `{:?}` does not match `{}`",
                value,
                ::core::stringify!($pat),
            ),
        }
    };
    ($expr:expr, $pat:pat if $guard:expr $(,)?) => {
        match $expr {
            ref value => match value {
                $pat if $guard => {}
                _ => ::core::panic!(
                    "assertion failed: `{:?}` does not match `{} if {}`",
                    value,
                    ::core::stringify!($pat),
                    ::core::stringify!($guard),
                ),
            },
        }
    };
}
