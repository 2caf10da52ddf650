#![warn(missing_docs)]
//! geolens specific error structures
use std::{error::Error, fmt::Display};

/// geolens specific Result type
pub type OpticsResult<T> = std::result::Result<T, OpticsError>;

/// Errors that can be returned by various geolens functions.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum OpticsError {
    /// a parameter (diameter, focal length, radius of curvature, index of refraction, position, ...) is out of its valid range
    InvalidParameter(String),
    /// a geometric configuration without a finite solution (e.g. object located in the focal plane).
    ///
    /// This error is handled inside the engine and normally never reaches the caller.
    DegenerateGeometry(String),
    /// the requested operation is not defined for the given optic (e.g. guides of a mirror)
    UnsupportedOperation(String),
    /// errors while reading, parsing or writing a scene document
    SceneDocument(String),
    /// errors console io
    Console(String),
    /// errors not falling in one of the categories above
    Other(String),
}

impl Display for OpticsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidParameter(m) => {
                write!(f, "InvalidParameter:{m}")
            }
            Self::DegenerateGeometry(m) => {
                write!(f, "DegenerateGeometry:{m}")
            }
            Self::UnsupportedOperation(m) => {
                write!(f, "UnsupportedOperation:{m}")
            }
            Self::SceneDocument(m) => {
                write!(f, "SceneDocument:{m}")
            }
            Self::Console(m) => {
                write!(f, "Console:{m}")
            }
            Self::Other(m) => write!(f, "geolens Error:Other:{m}"),
        }
    }
}
impl Error for OpticsError {}

impl std::convert::From<String> for OpticsError {
    fn from(msg: String) -> Self {
        Self::Other(msg)
    }
}
#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn from() {
        let error = OpticsError::from("test".to_string());
        assert_eq!(error, OpticsError::Other("test".to_string()));
    }
    #[test]
    fn display() {
        assert_eq!(
            format!("{}", OpticsError::InvalidParameter("test".to_string())),
            "InvalidParameter:test"
        );
        assert_eq!(
            format!("{}", OpticsError::DegenerateGeometry("test".to_string())),
            "DegenerateGeometry:test"
        );
        assert_eq!(
            format!("{}", OpticsError::UnsupportedOperation("test".to_string())),
            "UnsupportedOperation:test"
        );
        assert_eq!(
            format!("{}", OpticsError::SceneDocument("test".to_string())),
            "SceneDocument:test"
        );
        assert_eq!(
            format!("{}", OpticsError::Console("test".to_string())),
            "Console:test"
        );
        assert_eq!(
            format!("{}", OpticsError::Other("test".to_string())),
            "geolens Error:Other:test"
        );
    }
    #[test]
    fn debug() {
        assert_eq!(
            format!("{:?}", OpticsError::InvalidParameter("test".to_string())),
            "InvalidParameter(\"test\")"
        );
    }
}
