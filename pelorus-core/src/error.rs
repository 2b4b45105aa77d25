//! Error types for the fusion model.

use thiserror::Error;

/// Errors surfaced by [`FusionModel`](crate::model::FusionModel) operations.
///
/// With the default permissive configuration only [`DuplicateEntity`]
/// and [`InvalidRange`] are ever returned; operations on unknown ids and
/// empty report batches are silent no-ops so a driver loop can reference
/// not-yet-created or already-removed entities without crashing. Strict
/// mode ([`FusionConfig::strict`](crate::model::FusionConfig)) converts
/// those no-ops into [`UnknownEntity`] / [`EmptyReportBatch`].
///
/// [`DuplicateEntity`]: ModelError::DuplicateEntity
/// [`InvalidRange`]: ModelError::InvalidRange
/// [`UnknownEntity`]: ModelError::UnknownEntity
/// [`EmptyReportBatch`]: ModelError::EmptyReportBatch
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// An entity with this id already exists
    #[error("entity '{0}' already exists")]
    DuplicateEntity(String),

    /// No entity with this id (strict mode only)
    #[error("no entity named '{0}'")]
    UnknownEntity(String),

    /// A fusion update was given no reports (strict mode only)
    #[error("empty report batch for '{0}'")]
    EmptyReportBatch(String),

    /// Sensor detection range must be positive
    #[error("invalid sensor range: {0} m")]
    InvalidRange(f64),
}
