//! The interactive menu loop
//!
//! A [`Session`] repeatedly draws the menu, reads a choice, runs it against
//! the [`Store`] and waits for the user before drawing the menu again. It is
//! generic over its input and output so it can be driven from buffers.

use std::io::{self, BufRead, Write};

use rebirth::{Item, Listing, Store};
use tracing::{debug, instrument};

use super::{
    menu::{Choice, MenuInput, parse_choice},
    terminal::{CLEAR_SCREEN, Colorize, rule},
};

/// What the loop does after a menu action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
    /// The input stream ended.
    Closed,
}

/// One line read from the input.
#[derive(Debug, PartialEq, Eq)]
enum Line {
    Text(String),
    /// The line was not valid UTF-8.
    Garbled,
    Closed,
}

pub struct Session<R, W> {
    store: Store,
    input: R,
    output: W,
    clear_screen: bool,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub const fn new(store: Store, input: R, output: W) -> Self {
        Self {
            store,
            input,
            output,
            clear_screen: false,
        }
    }

    /// Clear the screen before each menu is drawn.
    #[must_use]
    pub const fn clear_screen(mut self, enabled: bool) -> Self {
        self.clear_screen = enabled;
        self
    }

    /// Runs the loop until the user exits or the input ends.
    ///
    /// # Errors
    ///
    /// Returns an error if the console cannot be read or written.
    #[instrument(skip_all)]
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            self.draw_menu()?;

            let Some(input) = self.read_choice()? else {
                return Ok(());
            };

            let flow = match input {
                Ok(choice) => {
                    debug!(?choice, "menu selection");
                    self.dispatch(choice)?
                }
                Err(number) => {
                    debug!(number, "unknown menu selection");
                    self.warn("Invalid selection, please try again.")?;
                    Flow::Continue
                }
            };

            if flow == Flow::Closed {
                return Ok(());
            }

            writeln!(self.output, "{}", "Press Enter to continue...".dim())?;
            self.output.flush()?;
            if self.read_line()? == Line::Closed || flow == Flow::Exit {
                return Ok(());
            }
        }
    }

    fn draw_menu(&mut self) -> io::Result<()> {
        if self.clear_screen {
            write!(self.output, "{CLEAR_SCREEN}")?;
        }
        writeln!(self.output)?;
        writeln!(self.output, "{}", "--- Item Rebirth ---".info())?;
        for choice in Choice::ALL {
            writeln!(self.output, "{}. {}", choice.number(), choice.label())?;
        }
        Ok(())
    }

    /// Prompts until the user types a number, or the input ends.
    ///
    /// Numbers without a menu entry are returned as `Err`.
    fn read_choice(&mut self) -> io::Result<Option<Result<Choice, i64>>> {
        loop {
            let input = match self.prompt("Select an option: ")? {
                Line::Text(line) => parse_choice(&line),
                Line::Garbled => MenuInput::NotANumber,
                Line::Closed => return Ok(None),
            };
            match input {
                MenuInput::NotANumber => self.warn("Invalid input, please enter a number.")?,
                MenuInput::Choice(choice) => return Ok(Some(Ok(choice))),
                MenuInput::Unknown(number) => return Ok(Some(Err(number))),
            }
        }
    }

    fn dispatch(&mut self, choice: Choice) -> io::Result<Flow> {
        match choice {
            Choice::Add => self.add(),
            Choice::Delete => self.delete(),
            Choice::List => self.list().map(|()| Flow::Continue),
            Choice::Search => self.search(),
            Choice::Exit => {
                writeln!(self.output, "Exiting.")?;
                Ok(Flow::Exit)
            }
        }
    }

    fn add(&mut self) -> io::Result<Flow> {
        let name = match self.prompt_text("Item name: ")? {
            Ok(text) => text,
            Err(flow) => return Ok(flow),
        };
        let description = match self.prompt_text("Item description: ")? {
            Ok(text) => text,
            Err(flow) => return Ok(flow),
        };
        let contact = match self.prompt_text("Contact information: ")? {
            Ok(text) => text,
            Err(flow) => return Ok(flow),
        };

        let item = match Item::new(name, description, contact) {
            Ok(item) => item,
            Err(e) => {
                self.warn(&format!("Item not added: {e}"))?;
                return Ok(Flow::Continue);
            }
        };

        match self.store.add(item) {
            Ok(_) => self.succeed("Item added.")?,
            Err(e) => self.warn(&format!("Item not added: {e}"))?,
        }
        Ok(Flow::Continue)
    }

    fn delete(&mut self) -> io::Result<Flow> {
        let name = match self.prompt_text("Name of the item to delete: ")? {
            Ok(text) => text,
            Err(flow) => return Ok(flow),
        };

        match self.store.delete(&name) {
            Ok(Some(_)) => self.succeed("Item deleted.")?,
            Ok(None) => self.warn("Item not found.")?,
            Err(e) => self.warn(&format!("Item not deleted: {e}"))?,
        }
        Ok(Flow::Continue)
    }

    fn list(&mut self) -> io::Result<()> {
        let items = match self.store.list() {
            Listing::Empty => {
                writeln!(self.output, "{}", "No items to display.".dim())?;
                return Ok(());
            }
            Listing::Items(items) => items,
        };

        let rule = rule();
        writeln!(self.output, "Items:")?;
        for item in items {
            write_item(&mut self.output, item)?;
            writeln!(self.output, "{}", rule.dim())?;
        }
        Ok(())
    }

    fn search(&mut self) -> io::Result<Flow> {
        let name = match self.prompt_text("Name of the item to find: ")? {
            Ok(text) => text,
            Err(flow) => return Ok(flow),
        };

        if let Some(item) = self.store.search(&name) {
            writeln!(self.output, "{}", "Found item:".success())?;
            write_item(&mut self.output, item)?;
        } else {
            self.warn("Item not found.")?;
        }
        Ok(Flow::Continue)
    }

    fn succeed(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{}", message.success())
    }

    fn warn(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{}", message.warning())
    }

    fn prompt(&mut self, label: &str) -> io::Result<Line> {
        write!(self.output, "{label}")?;
        self.output.flush()?;
        self.read_line()
    }

    /// Prompts for a field value.
    ///
    /// `Err` carries how the loop proceeds when no usable text was read.
    fn prompt_text(&mut self, label: &str) -> io::Result<Result<String, Flow>> {
        match self.prompt(label)? {
            Line::Text(text) => Ok(Ok(text)),
            Line::Garbled => {
                self.warn("Input is not valid UTF-8.")?;
                Ok(Err(Flow::Continue))
            }
            Line::Closed => Ok(Err(Flow::Closed)),
        }
    }

    /// Reads one line without its line ending.
    fn read_line(&mut self) -> io::Result<Line> {
        let mut bytes = Vec::new();
        if self.input.read_until(b'\n', &mut bytes)? == 0 {
            return Ok(Line::Closed);
        }
        while matches!(bytes.last(), Some(b'\n' | b'\r')) {
            bytes.pop();
        }
        Ok(String::from_utf8(bytes).map_or(Line::Garbled, Line::Text))
    }

    #[cfg(test)]
    fn into_parts(self) -> (Store, W) {
        (self.store, self.output)
    }
}

fn write_item<W: Write>(output: &mut W, item: &Item) -> io::Result<()> {
    writeln!(output, "Name: {}", item.name())?;
    writeln!(output, "Description: {}", item.description())?;
    writeln!(output, "Contact: {}", item.contact())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use tempfile::TempDir;

    use super::*;

    /// Runs a session over the given keystrokes, returning the store and
    /// everything printed.
    fn run(store: Store, keys: &str) -> (Store, String) {
        run_bytes(store, keys.as_bytes())
    }

    fn run_bytes(store: Store, keys: &[u8]) -> (Store, String) {
        let mut session = Session::new(store, Cursor::new(keys), Vec::new());
        session.run().unwrap();
        let (store, output) = session.into_parts();
        (store, String::from_utf8(output).unwrap())
    }

    fn empty_store(tmp: &TempDir) -> Store {
        Store::load(tmp.path().join("items.txt")).unwrap()
    }

    #[test]
    fn add_then_list() {
        let tmp = TempDir::new().unwrap();
        let keys = "1\nWallet\nBlack leather\n555-1234\n\n3\n\n5\n\n";

        let (store, output) = run(empty_store(&tmp), keys);

        assert!(output.contains("Item added."));
        assert!(output.contains("Items:"));
        assert!(output.contains("Name: Wallet"));
        assert!(output.contains("Description: Black leather"));
        assert!(output.contains("Contact: 555-1234"));
        assert!(output.contains("Exiting."));
        assert_eq!(store.len(), 1);

        let reloaded = Store::load(tmp.path().join("items.txt")).unwrap();
        assert_eq!(reloaded.search("Wallet").unwrap().contact(), "555-1234");
    }

    #[test]
    fn add_then_delete_leaves_empty_listing() {
        let tmp = TempDir::new().unwrap();
        let keys = "1\nWallet\nBlack leather\n555-1234\n\n2\nWallet\n\n3\n\n5\n\n";

        let (store, output) = run(empty_store(&tmp), keys);

        assert!(output.contains("Item deleted."));
        assert!(output.contains("No items to display."));
        assert!(store.is_empty());
    }

    #[test]
    fn non_numeric_choice_reprompts() {
        let tmp = TempDir::new().unwrap();
        let (_, output) = run(empty_store(&tmp), "abc\n5\n\n");

        assert!(output.contains("Invalid input, please enter a number."));
        assert_eq!(output.matches("--- Item Rebirth ---").count(), 1);
        assert_eq!(output.matches("Select an option: ").count(), 2);
        assert!(output.contains("Exiting."));
    }

    #[test]
    fn invalid_utf8_choice_reprompts() {
        let tmp = TempDir::new().unwrap();
        let (_, output) = run_bytes(empty_store(&tmp), b"\xff\n5\n\n");

        assert!(output.contains("Invalid input, please enter a number."));
        assert_eq!(output.matches("Select an option: ").count(), 2);
        assert!(output.contains("Exiting."));
    }

    #[test]
    fn invalid_utf8_field_abandons_add() {
        let tmp = TempDir::new().unwrap();
        let keys = b"1\nWallet\n\xff\xfe\n\n5\n\n";

        let (store, output) = run_bytes(empty_store(&tmp), keys);

        assert!(output.contains("Input is not valid UTF-8."));
        assert!(!output.contains("Contact information: "));
        assert!(output.contains("Exiting."));
        assert!(store.is_empty());
    }

    #[test]
    fn unknown_choice_redraws_menu() {
        let tmp = TempDir::new().unwrap();
        let (_, output) = run(empty_store(&tmp), "9\n\n5\n\n");

        assert!(output.contains("Invalid selection, please try again."));
        assert_eq!(output.matches("--- Item Rebirth ---").count(), 2);
    }

    #[test]
    fn search_on_empty_store_reports_not_found() {
        let tmp = TempDir::new().unwrap();
        let (_, output) = run(empty_store(&tmp), "4\nKeys\n\n5\n\n");

        assert!(output.contains("Item not found."));
        assert!(!output.contains("Found item:"));
    }

    #[test]
    fn search_prints_first_match() {
        let tmp = TempDir::new().unwrap();
        let mut store = empty_store(&tmp);
        let bike = Item::new("Keys", "Bike keys", "front desk").unwrap();
        let house = Item::new("Keys", "House keys", "555-0000").unwrap();
        store.add(bike).unwrap();
        store.add(house).unwrap();

        let (_, output) = run(store, "4\nKeys\n\n5\n\n");

        assert!(output.contains("Found item:"));
        assert!(output.contains("Description: Bike keys"));
        assert!(!output.contains("House keys"));
    }

    #[test]
    fn delete_missing_reports_not_found() {
        let tmp = TempDir::new().unwrap();
        let mut store = empty_store(&tmp);
        let wallet = Item::new("Wallet", "Black leather", "555-1234").unwrap();
        store.add(wallet).unwrap();

        let (store, output) = run(store, "2\nUmbrella\n\n5\n\n");

        assert!(output.contains("Item not found."));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn end_of_input_ends_session() {
        let tmp = TempDir::new().unwrap();
        let (store, output) = run(empty_store(&tmp), "");

        assert!(output.contains("Select an option: "));
        assert!(store.is_empty());
    }

    #[test]
    fn end_of_input_during_add_adds_nothing() {
        let tmp = TempDir::new().unwrap();
        let (store, output) = run(empty_store(&tmp), "1\nWallet\n");

        assert!(!output.contains("Item added."));
        assert!(store.is_empty());
        assert!(!tmp.path().join("items.txt").exists());
    }

    #[test]
    fn exit_waits_then_stops_reading() {
        let tmp = TempDir::new().unwrap();
        let keys = "5\n\n1\nWallet\nBlack leather\n555-1234\n";

        let (store, output) = run(empty_store(&tmp), keys);

        assert!(output.contains("Exiting."));
        assert_eq!(output.matches("Press Enter to continue...").count(), 1);
        assert!(!output.contains("Item name: "));
        assert!(store.is_empty());
    }

    #[test]
    fn windows_line_endings_are_stripped() {
        let tmp = TempDir::new().unwrap();
        let keys = "1\r\nWallet\r\nBlack leather\r\n555-1234\r\n\r\n5\r\n\r\n";

        let (store, _) = run(empty_store(&tmp), keys);

        assert_eq!(store.search("Wallet").unwrap().contact(), "555-1234");
    }

    #[test]
    fn failed_save_is_reported() {
        let tmp = TempDir::new().unwrap();
        let store = empty_store(&tmp);
        std::fs::create_dir(store.path()).unwrap();
        let keys = "1\nWallet\nBlack leather\n555-1234\n\n5\n\n";

        let (store, output) = run(store, keys);

        assert!(output.contains("Item not added: failed to save items to"));
        assert!(store.is_empty());
    }

    #[test]
    fn clears_screen_when_enabled() {
        let tmp = TempDir::new().unwrap();
        let keys: &[u8] = b"5\n\n";
        let session = Session::new(empty_store(&tmp), Cursor::new(keys), Vec::new());
        let mut session = session.clear_screen(true);
        session.run().unwrap();
        let (_, output) = session.into_parts();

        assert!(String::from_utf8(output).unwrap().starts_with(CLEAR_SCREEN));
    }

    #[test]
    fn does_not_clear_screen_by_default() {
        let tmp = TempDir::new().unwrap();
        let (_, output) = run(empty_store(&tmp), "5\n\n");

        assert!(!output.contains(CLEAR_SCREEN));
    }
}
