use thiserror::Error;

/// Fatal conditions raised while turning an NMWG document into NML.
///
/// Any of these aborts the run before an output artifact is written.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TranslateError {
    #[error("identifier ({id}) does not start with prefix ({prefix})")]
    InvalidIdentifier { id: String, prefix: &'static str },
    #[error("unexpected number of domains ({count}); exactly one is required")]
    MultipleDomains { count: usize },
    #[error("source topology document is empty")]
    EmptyDocument,
    #[error("source element <{element}> is missing required attribute '{attribute}'")]
    MissingAttribute {
        element: String,
        attribute: &'static str,
    },
    #[error("link {link_id} requires an alias but has no remote link id")]
    MissingRemoteLink { link_id: String },
    #[error("failed to compute document lifetime: {0}")]
    Datetime(String),
}
