use quick_xml::DeError;
use tempfile::PersistError;

use crate::ValidationError;

#[derive(thiserror::Error, Debug)]
pub enum SerializationError {
    #[error(
        "fixture can't be saved: {}",
        .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
    )]
    Invalid(Vec<ValidationError>),
    #[error("quick-xml could not serialize the low level representation: {0}")]
    QuickXml(#[from] DeError),
    #[error("std::io::error: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not move the written definition into place: {0}")]
    Persist(#[from] PersistError),
}
