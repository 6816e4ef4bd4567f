//! Mutation boundary helper

use crate::document::HostDocument;
use crate::error::HostError;

/// How a boundary run failed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoundaryError<E> {
    /// Boundary could not be opened; nothing was attempted
    #[error("could not open mutation boundary: {0}")]
    Begin(HostError),

    /// Body failed; its changes were rolled back
    #[error("{0}")]
    Body(E),

    /// Commit failed; every change was rolled back
    #[error("commit failed: {0}")]
    Commit(HostError),
}

impl<E> BoundaryError<E> {
    /// Whether changes were made and then discarded
    #[inline]
    #[must_use]
    pub fn is_rolled_back(&self) -> bool {
        !matches!(self, Self::Begin(_))
    }
}

impl BoundaryError<HostError> {
    /// Underlying host failure, whichever step it came from
    #[must_use]
    pub fn into_host_error(self) -> HostError {
        match self {
            Self::Begin(e) | Self::Body(e) | Self::Commit(e) => e,
        }
    }
}

/// Run `body` inside one mutation boundary
///
/// Commits when `body` returns `Ok`, rolls back when it returns `Err` or when
/// the commit itself fails. Per-item errors that `body` swallows do not
/// trigger a rollback; only an `Err` escaping `body` does.
///
/// # Errors
/// [`BoundaryError::Begin`] if the boundary cannot be opened,
/// [`BoundaryError::Body`] with the body's error, or
/// [`BoundaryError::Commit`] if the host refuses the commit.
pub fn run_in_mutation_boundary<D, T, E, F>(doc: &mut D, label: &str, body: F) -> Result<T, BoundaryError<E>>
where
    D: HostDocument + ?Sized,
    F: FnOnce(&mut D) -> Result<T, E>,
{
    doc.begin_boundary(label).map_err(BoundaryError::Begin)?;
    tracing::debug!(boundary = label, "mutation boundary opened");

    let value = match body(doc) {
        Ok(value) => value,
        Err(e) => {
            doc.rollback_boundary();
            tracing::error!(boundary = label, "mutation boundary rolled back");
            return Err(BoundaryError::Body(e));
        }
    };

    if let Err(e) = doc.commit_boundary() {
        doc.rollback_boundary();
        tracing::error!(boundary = label, error = %e, "commit failed, rolled back");
        return Err(BoundaryError::Commit(e));
    }

    tracing::debug!(boundary = label, "mutation boundary committed");
    Ok(value)
}
