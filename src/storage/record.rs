use std::io::{self, BufRead, Write};

use crate::domain::{Field, FieldError, Item};

/// Label prefixing the name line of a record.
pub const NAME_LABEL: &str = "物品名称: ";
/// Label prefixing the description line of a record.
pub const DESCRIPTION_LABEL: &str = "物品描述: ";
/// Label prefixing the contact line of a record.
pub const CONTACT_LABEL: &str = "联系人信息: ";
/// Line written after every record.
pub const SEPARATOR: &str = "---";

/// Writes items as four-line records.
///
/// # Errors
///
/// Returns an error if the writer fails.
pub fn write_records<'a, W, I>(writer: &mut W, items: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Item>,
{
    for item in items {
        writeln!(writer, "{NAME_LABEL}{}", item.name())?;
        writeln!(writer, "{DESCRIPTION_LABEL}{}", item.description())?;
        writeln!(writer, "{CONTACT_LABEL}{}", item.contact())?;
        writeln!(writer, "{SEPARATOR}")?;
    }
    Ok(())
}

/// Reads every record from the reader, in order.
///
/// Lines outside a record (blank lines, separators, stray text) are skipped.
/// Once a name line is seen, the description and contact lines must follow
/// immediately.
///
/// # Errors
///
/// Returns an error if the reader fails or a record is incomplete.
pub fn read_records<R: BufRead>(reader: R) -> Result<Vec<Item>, LoadError> {
    let mut lines = NumberedLines {
        inner: reader.lines(),
        number: 0,
    };
    let mut items = Vec::new();

    while let Some(line) = lines.next_line()? {
        let Some(name) = line.strip_prefix(NAME_LABEL) else {
            continue;
        };
        let name = Field::new(name)?;
        let description = lines.expect_field(DESCRIPTION_LABEL, "description")?;
        let contact = lines.expect_field(CONTACT_LABEL, "contact")?;
        items.push(Item::from_fields(name, description, contact));
    }

    Ok(items)
}

struct NumberedLines<R> {
    inner: io::Lines<R>,
    number: usize,
}

impl<R: BufRead> NumberedLines<R> {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        let line = self.inner.next().transpose()?;
        if line.is_some() {
            self.number += 1;
        }
        Ok(line)
    }

    fn expect_field(&mut self, label: &str, expected: &'static str) -> Result<Field, LoadError> {
        let Some(line) = self.next_line()? else {
            return Err(LoadError::Malformed {
                line: self.number + 1,
                expected,
            });
        };
        let Some(value) = line.strip_prefix(label) else {
            return Err(LoadError::Malformed {
                line: self.number,
                expected,
            });
        };
        Ok(Field::new(value)?)
    }
}

/// Errors that can occur when reading items from text.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// An I/O error occurred.
    #[error("failed to read items: {0}")]
    Io(#[from] io::Error),
    /// A record is missing one of its lines.
    #[error("malformed record at line {line}: expected {expected} line")]
    Malformed {
        /// The 1-based line number where the record broke off.
        line: usize,
        /// Which line of the record was expected.
        expected: &'static str,
    },
    /// A field could not be parsed.
    #[error(transparent)]
    Field(#[from] FieldError),
}
