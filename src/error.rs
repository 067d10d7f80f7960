use camino::Utf8PathBuf;

/// Error types for the nali library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The geolocation database could not be opened at the resolved path.
    #[error("failed to open database at {path}")]
    DatabaseOpen {
        path: Utf8PathBuf,
        #[source]
        source: maxminddb::MaxMindDBError,
    },

    /// IP address lookup failed in the database.
    #[error("lookup failed for {ip}")]
    LookupFailed {
        ip: String,
        #[source]
        source: maxminddb::MaxMindDBError,
    },

    /// The address text is not a parseable IPv4 address.
    #[error("not an IPv4 address: {ip}")]
    InvalidAddress { ip: String },

    /// The requested source encoding label is not known.
    #[error("unknown encoding: {label}")]
    UnknownEncoding { label: String },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A regex compilation error.
    #[error("regex error: {0}")]
    Regex(#[from] regex_automata::meta::BuildError),

    /// A regex syntax error.
    #[error("regex syntax error: {0}")]
    Syntax(#[from] regex_syntax::Error),
}

/// Convenience type alias for Results using the library error.
pub type Result<T> = std::result::Result<T, Error>;
