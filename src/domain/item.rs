use std::{fmt, ops::Deref};

/// A single line of free text.
///
/// Records are stored one field per line, so a field can never contain a line
/// break. Empty fields are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Field(String);

impl Field {
    /// Creates a new `Field` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::Multiline`] if the string contains a carriage
    /// return or a line feed.
    pub fn new(s: impl Into<String>) -> Result<Self, FieldError> {
        let s = s.into();
        if s.contains(['\n', '\r']) {
            return Err(FieldError::Multiline(s));
        }
        Ok(Self(s))
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Field {
    type Error = FieldError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Field {
    type Error = FieldError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl AsRef<str> for Field {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for Field {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error returned when a field cannot be stored on a single line.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FieldError {
    /// The value contains a line break.
    #[error("field must fit on a single line: {0:?}")]
    Multiline(String),
}

/// A lost or found item.
///
/// The name is used as the lookup key, but it is not unique. Lookups always
/// resolve to the first item with a matching name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    name: Field,
    description: Field,
    contact: Field,
}

impl Item {
    /// Creates a new item.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fields spans more than one line.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        contact: impl Into<String>,
    ) -> Result<Self, FieldError> {
        Ok(Self::from_fields(
            Field::new(name)?,
            Field::new(description)?,
            Field::new(contact)?,
        ))
    }

    /// Creates a new item from already validated fields.
    #[must_use]
    pub const fn from_fields(name: Field, description: Field, contact: Field) -> Self {
        Self {
            name,
            description,
            contact,
        }
    }

    /// The item's name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// A free-text description of the item.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Who to contact about the item.
    #[must_use]
    pub fn contact(&self) -> &str {
        self.contact.as_str()
    }
}
