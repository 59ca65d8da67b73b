//! Strongly-typed ID newtypes for entities referenced by the auth flow.
//!
//! The API hands out opaque string identifiers (`"sch_1"`, `"usr_9f2c"`);
//! wrapping them keeps a `SchoolId` from being passed where a `UserId` or
//! an OTP session identifier is expected.
//!
//! # Example
//!
//! ```ignore
//! use agora_models::ids::{SchoolId, UserId};
//!
//! fn scope_requests(school: &SchoolId) { /* ... */ }
//!
//! let school = SchoolId::from("sch_1");
//! scope_requests(&school);
//! // scope_requests(&UserId::from("usr_1")); // Compile error! Type mismatch.
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to define a strongly-typed string ID newtype.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Get the ID as a string slice.
            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume self and return the inner String.
            #[inline]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            #[inline]
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            #[inline]
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<$name> for String {
            #[inline]
            fn from(id: $name) -> String {
                id.0
            }
        }

        impl AsRef<str> for $name {
            #[inline]
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(
    /// Identifier of a user account.
    UserId
);

define_id!(
    /// Identifier of a school (tenant). Persisted as `currentSchoolId`.
    SchoolId
);

define_id!(
    /// Opaque server-issued identifier of a pending OTP challenge.
    OtpSessionId
);
