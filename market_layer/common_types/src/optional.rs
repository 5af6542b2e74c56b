//   Copyright 2024 The EMI Market Developers
//   SPDX-License-Identifier: BSD-3-Clause

/// Implemented by error types that can represent "the requested entity does
/// not exist", so callers can distinguish absence from failure.
pub trait IsNotFoundError {
    fn is_not_found_error(&self) -> bool;
}

/// Converts `Err(not found)` into `Ok(None)`, leaving other errors intact.
pub trait Optional<T> {
    type Error;

    fn optional(self) -> Result<Option<T>, Self::Error>;
}

impl<T, E: IsNotFoundError> Optional<T> for Result<T, E> {
    type Error = E;

    fn optional(self) -> Result<Option<T>, Self::Error> {
        match self {
            Ok(t) => Ok(Some(t)),
            Err(e) if e.is_not_found_error() => Ok(None),
            Err(e) => Err(e),
        }
    }
}
