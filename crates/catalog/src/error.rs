use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Unknown column `{0}`")]
    UnknownColumn(String),
}
