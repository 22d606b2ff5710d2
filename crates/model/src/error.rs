/// The kind of error that occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The credential was rejected by the provider.
    Unauthorized,
    /// The model provider is rate limited.
    RateLimitExceeded,
    /// The transport failed before or while streaming.
    Network,
    /// The provider sent something that could not be understood.
    MalformedResponse,
    /// Any other errors.
    Other,
}
