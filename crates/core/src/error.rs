use thiserror::Error;

use crate::model::{CatalogError, ElapsedError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Elapsed(#[from] ElapsedError),
}
