//! Opaque identifiers for feed records.
//!
//! Identifiers arrive from the remote feed as plain strings (document ids).
//! Posts, comments, and authors use distinct newtypes so the disjoint id
//! namespaces cannot be mixed up, e.g. when looking up like targets.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! define_identifier {
    (
        $(#[$outer:meta])*
        $name:ident
    ) => {
        $(#[$outer])*
        #[derive(
            Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier.
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            /// Borrow the raw identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

define_identifier! {
    /// Identifier of a top-level feed post.
    PostId
}

define_identifier! {
    /// Identifier of a comment (reply) attached to a post.
    CommentId
}

define_identifier! {
    /// Identifier of a post or comment author.
    AuthorId
}

define_identifier! {
    /// Identifier of the user on whose behalf likes are recorded.
    UserId
}
