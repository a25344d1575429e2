mod macros;

pub trait Apply {
    /// Applies the function `f` with a mutable reference to `self`.
    fn with<X>(mut self, f: impl FnOnce(&mut Self) -> X) -> Self
    where
        Self: Sized,
    {
        f(&mut self);
        self
    }

    /// Applies the function `f` to `self`, allowing builder-style chaining of
    /// free functions.
    ///
    /// #### Example
    /// ```rust
    /// # use folio_utils::Apply;
    /// fn double(x: i32) -> i32 {
    ///     x * 2
    /// }
    /// assert_eq!(3.apply(double).apply(double), 12);
    /// ```
    fn apply<U>(self, f: impl FnOnce(Self) -> U) -> U
    where
        Self: Sized,
    {
        f(self)
    }

    /// Applies the function `f` only if `value` is `Some(...)` and provides the
    /// contained value to `f`.
    ///
    /// #### Example
    /// ```rust
    /// # use folio_utils::Apply;
    /// fn add_option(a: i32, b: Option<i32>) -> i32 {
    ///     a.apply_map(b, |slf, arg| slf + arg)
    /// }
    /// assert_eq!(add_option(1, None), 1);
    /// assert_eq!(add_option(1, Some(2)), 3);
    /// ```
    fn apply_map<U>(self, value: Option<U>, f: impl FnOnce(Self, U) -> Self) -> Self
    where
        Self: Sized,
    {
        if let Some(value) = value {
            f(self, value)
        } else {
            self
        }
    }
}

impl<T> Apply for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with() {
        let v = vec![1, 2].with(|v| v.push(3));
        assert_eq!(v, [1, 2, 3]);
    }

    #[test]
    fn assert_matches_with_guard() {
        let value: Result<i32, ()> = Ok(7);
        crate::assert_matches!(value, Ok(x) if *x > 5);
    }

    #[test]
    #[should_panic(expected = "does not match `Some(_)`")]
    fn assert_matches_mismatch() {
        let value: Option<i32> = None;
        crate::assert_matches!(value, Some(_));
    }

    #[test]
    #[should_panic(expected = "does not match `Ok(x) if *x > 5`")]
    fn assert_matches_guard_fails() {
        let value: Result<i32, ()> = Ok(3);
        crate::assert_matches!(value, Ok(x) if *x > 5);
    }
}
