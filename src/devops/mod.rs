pub mod client;
pub mod diff;
pub mod resolver;
pub mod source;

use std::sync::Arc;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};

pub use client::{ClientConfig, DevOpsClient, RepoRef};
pub use resolver::TreeFileResolver;
pub use source::GitObjectSource;

/// REST API version pinned on every request.
pub const API_VERSION: &str = "6.0";

pub const DEFAULT_API_URL: &str = "https://dev.azure.com";

/// Characters left unescaped in URL path segments (RFC 3986 unreserved).
pub const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

pub type SharedClient = Arc<DevOpsClient>;
