use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

mod error;

pub use error::{Error, Result};

/// The maximum allowed length for a [`ContainerID`].
const CONTAINER_ID_MAX_LEN: usize = 255;

/// Number of leading identifier characters used as a name when a container has none.
pub const SHORT_ID_LEN: usize = 12;

/// A validated container identifier as reported by the container runtime.
///
/// # Examples
///
/// ```
/// # use creo_inventory::container::ContainerID;
/// let id = ContainerID::new("3f4e2a1b9c8d7e6f5a4b3c2d1e0f").unwrap();
/// assert_eq!(id.short(), "3f4e2a1b9c8d");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerID(Arc<str>);

impl ContainerID {
    /// Creates a new `ContainerID` from the given raw id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidContainerID`] if the input is empty, contains whitespace
    /// or exceeds [`CONTAINER_ID_MAX_LEN`].
    pub fn new(src: impl AsRef<str>) -> Result<Self> {
        let src = src.as_ref();
        if src.is_empty()
            || src.len() > CONTAINER_ID_MAX_LEN
            || src.chars().any(char::is_whitespace)
        {
            return Err(Error::InvalidContainerID(src.to_owned()));
        }

        Ok(Self(src.into()))
    }

    /// Returns the first [`SHORT_ID_LEN`] characters of the identifier.
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(SHORT_ID_LEN) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ContainerID {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ContainerID {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl serde::Serialize for ContainerID {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

/// The inventory name of a host.
///
/// Host names double as file names below `host_vars/`, so they must not be empty,
/// must not contain path separators and must not be `.` or `..`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HostName(Arc<str>);

impl HostName {
    /// Creates a new `HostName`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHostName`] if the name is not usable as a file name.
    pub fn new(src: impl AsRef<str>) -> Result<Self> {
        let src = src.as_ref();
        if !is_safe_file_stem(src) {
            return Err(Error::InvalidHostName(src.to_owned()));
        }

        Ok(Self(src.into()))
    }

    /// The name used for a container that did not report one.
    pub fn fallback_for(id: &ContainerID) -> Self {
        // container ids never contain whitespace and are non-empty, the short form is only
        // unsafe if the runtime handed out ids with path separators.
        Self::new(id.short()).unwrap_or_else(|_| Self(id.short().replace('/', "_").into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for HostName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for HostName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HostName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl serde::Serialize for HostName {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

/// Returns `true` if `src` can be used as a single path component.
pub(crate) fn is_safe_file_stem(src: &str) -> bool {
    !src.is_empty()
        && src != "."
        && src != ".."
        && !src.contains(['/', '\\', '\0'])
        && !src.chars().any(char::is_control)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_id_rejects_invalid() {
        assert!(ContainerID::new("").is_err());
        assert!(ContainerID::new("abc def").is_err());
        assert!(ContainerID::new("a".repeat(CONTAINER_ID_MAX_LEN + 1)).is_err());
        assert!(ContainerID::new("a".repeat(CONTAINER_ID_MAX_LEN)).is_ok());
    }

    #[test]
    fn test_container_id_short() {
        let id = ContainerID::new("0123456789abcdef0123").unwrap();
        assert_eq!(id.short(), "0123456789ab");

        let short = ContainerID::new("abc").unwrap();
        assert_eq!(short.short(), "abc");
    }

    #[test]
    fn test_host_name_validation() {
        assert!(HostName::new("my-app").is_ok());
        assert!(HostName::new("web_1.example").is_ok());
        assert!(HostName::new("").is_err());
        assert!(HostName::new("..").is_err());
        assert!(HostName::new("a/b").is_err());
        assert!(HostName::new("tab\there").is_err());
    }

    #[test]
    fn test_host_name_fallback() {
        let id = ContainerID::new("deadbeefcafe0123456789").unwrap();
        assert_eq!(HostName::fallback_for(&id).as_str(), "deadbeefcafe");

        let odd = ContainerID::new("ab/cd").unwrap();
        assert_eq!(HostName::fallback_for(&odd).as_str(), "ab_cd");
    }
}
