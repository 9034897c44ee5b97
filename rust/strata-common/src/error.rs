use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    pub fn index_out_of_range(index: usize, len: usize) -> Error {
        Error(ErrorKind::IndexOutOfRange { index, len }.into())
    }

    /// Growth refused by the allocator or by the memory budget. `requested` is the
    /// total byte size of the allocation that could not be obtained.
    pub fn out_of_memory(requested: usize) -> Error {
        Error(ErrorKind::OutOfMemory { requested }.into())
    }

    pub fn invalid_arg(name: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidArgument {
                name: name.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    #[inline]
    pub fn is_index_out_of_range(&self) -> bool {
        matches!(self.kind(), ErrorKind::IndexOutOfRange { .. })
    }

    #[inline]
    pub fn is_out_of_memory(&self) -> bool {
        matches!(self.kind(), ErrorKind::OutOfMemory { .. })
    }

    #[inline]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self.kind(), ErrorKind::InvalidArgument { .. })
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("out of memory: failed to allocate {requested} bytes")]
    OutOfMemory { requested: usize },

    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}

impl From<std::collections::TryReserveError> for Error {
    fn from(_: std::collections::TryReserveError) -> Self {
        Error::out_of_memory(usize::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let e = Error::index_out_of_range(7, 3);
        assert!(e.is_index_out_of_range());
        assert_eq!(e.to_string(), "index 7 out of range for length 3");

        let e = Error::out_of_memory(1024);
        assert!(e.is_out_of_memory());
        assert!(matches!(
            e.into_kind(),
            ErrorKind::OutOfMemory { requested: 1024 }
        ));

        let e = Error::invalid_arg("count", "must be positive");
        assert!(e.is_invalid_argument());
        assert_eq!(e.to_string(), "invalid argument count: must be positive");
    }
}
