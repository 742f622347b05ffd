//! Errors surfaced by the map API.

/// Failure returned by fallible map operations.
///
/// Lookups of absent keys are never errors; they yield `None`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum MapError {
    /// A mutating call reached an [`Unmodifiable`](crate::Unmodifiable) map.
    #[error("`{operation}` is not supported on an unmodifiable map")]
    Unsupported { operation: &'static str },
    /// A required argument was absent.
    #[error("argument `{argument}` must be present")]
    NullArgument { argument: &'static str },
}

impl MapError {
    pub(crate) const fn unsupported(operation: &'static str) -> Self {
        MapError::Unsupported { operation }
    }

    pub(crate) const fn null_argument(argument: &'static str) -> Self {
        MapError::NullArgument { argument }
    }
}

#[cfg(test)]
mod tests {
    use super::MapError;

    #[test]
    fn messages_name_the_culprit() {
        assert_eq!(
            MapError::unsupported("insert").to_string(),
            "`insert` is not supported on an unmodifiable map"
        );
        assert_eq!(
            MapError::null_argument("other").to_string(),
            "argument `other` must be present"
        );
    }
}
