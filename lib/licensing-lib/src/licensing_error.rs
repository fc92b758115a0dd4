use core::fmt;
use std::{error::Error, io, str::Utf8Error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LicensingErrorKind {
    /// Invalid or unreadable site config
    Config,
    /// Invalid or unreadable page
    Page,
    /// Missing or invalid translation
    Translation,
    /// Failed to resolve an url
    Url,
    /// Failed to parse or format a date
    Date,
    /// Permalink could not be decoded
    Decode,
    Io,
}

#[derive(Debug)]
pub struct LicensingError {
    message: String,
    context: Option<String>,
    kind: LicensingErrorKind,
}

impl LicensingError {
    pub fn new<S: Into<String>>(message: S, kind: LicensingErrorKind) -> LicensingError {
        LicensingError {
            message: message.into(),
            kind,
            context: None,
        }
    }

    pub fn config<S: Into<String>>(message: S) -> LicensingError {
        Self::new(message, LicensingErrorKind::Config)
    }

    pub fn page<S: Into<String>>(message: S) -> LicensingError {
        Self::new(message, LicensingErrorKind::Page)
    }

    pub fn translation<S: Into<String>>(message: S) -> LicensingError {
        Self::new(message, LicensingErrorKind::Translation)
    }

    pub fn url<S: Into<String>>(message: S) -> LicensingError {
        Self::new(message, LicensingErrorKind::Url)
    }

    pub fn date<S: Into<String>>(message: S) -> LicensingError {
        Self::new(message, LicensingErrorKind::Date)
    }

    pub fn decode<S: Into<String>>(message: S) -> LicensingError {
        Self::new(message, LicensingErrorKind::Decode)
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn kind(&self) -> LicensingErrorKind {
        self.kind
    }
}

impl From<io::Error> for LicensingError {
    fn from(error: io::Error) -> Self {
        Self::new(error.to_string(), LicensingErrorKind::Io)
    }
}
impl From<toml::de::Error> for LicensingError {
    fn from(error: toml::de::Error) -> Self {
        Self::config(error.to_string())
    }
}
impl From<regex::Error> for LicensingError {
    fn from(error: regex::Error) -> Self {
        Self::url(error.to_string())
    }
}
impl From<Utf8Error> for LicensingError {
    fn from(error: Utf8Error) -> Self {
        Self::decode(error.to_string())
    }
}

impl fmt::Display for LicensingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let context = if let Some(context) = &self.context {
            format!(" with context '{context}'")
        } else {
            "".into()
        };
        write!(
            f,
            "Error when rendering article licensing ({:?}): '{}'{context}",
            self.kind, self.message
        )
    }
}

impl Error for LicensingError {}
