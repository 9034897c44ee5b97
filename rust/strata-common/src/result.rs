pub type Result<T> = std::result::Result<T, crate::error::Error>;

#[macro_export]
macro_rules! verify_arg {
    ($name:expr, $expr:expr) => {{
        let result = $expr;
        $crate::result::verify_arg(result, stringify!($name), stringify!($expr))?;
    }};
}

#[inline]
pub fn verify_arg(predicate: bool, name: &str, condition: &str) -> Result<()> {
    if predicate {
        Ok(())
    } else {
        invalid_arg(name, condition)
    }
}

/// Verifies `index < len`.
#[inline]
pub fn verify_index(index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        index_out_of_range(index, len)
    }
}

/// Verifies that `start..start + count` lies within `0..len`.
#[inline]
pub fn verify_range(start: usize, count: usize, len: usize) -> Result<()> {
    match start.checked_add(count) {
        Some(end) if end <= len => Ok(()),
        _ => index_out_of_range(start.saturating_add(count), len),
    }
}

#[cold]
pub fn invalid_arg(name: &str, condition: &str) -> Result<()> {
    Err(crate::error::ErrorKind::InvalidArgument {
        name: name.to_string(),
        message: condition.to_string(),
    }
    .into())
}

#[cold]
pub fn index_out_of_range(index: usize, len: usize) -> Result<()> {
    Err(crate::error::ErrorKind::IndexOutOfRange { index, len }.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positive(n: usize) -> Result<usize> {
        verify_arg!(n, n > 0);
        Ok(n)
    }

    #[test]
    fn test_verify_arg_macro() {
        assert_eq!(positive(3).unwrap(), 3);
        let err = positive(0).unwrap_err();
        assert_eq!(err.to_string(), "invalid argument n: n > 0");
    }

    #[test]
    fn test_verify_range() {
        assert!(verify_range(0, 0, 0).is_ok());
        assert!(verify_range(2, 3, 5).is_ok());
        assert!(verify_range(3, 3, 5).unwrap_err().is_index_out_of_range());
        assert!(
            verify_range(usize::MAX, 2, 5)
                .unwrap_err()
                .is_index_out_of_range()
        );
        assert!(verify_index(4, 5).is_ok());
        assert!(verify_index(5, 5).is_err());
    }
}
