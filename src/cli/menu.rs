//! Main menu entries and choice parsing

/// An entry in the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Add = 1,
    Delete = 2,
    List = 3,
    Search = 4,
    Exit = 5,
}

impl Choice {
    /// Every entry, in menu order.
    pub const ALL: [Self; 5] = [
        Self::Add,
        Self::Delete,
        Self::List,
        Self::Search,
        Self::Exit,
    ];

    /// The number the user types to select this entry.
    pub const fn number(self) -> i64 {
        self as i64
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Add => "Add item",
            Self::Delete => "Delete item",
            Self::List => "List items",
            Self::Search => "Search items",
            Self::Exit => "Exit",
        }
    }

    pub fn from_number(number: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.number() == number)
    }
}

/// What the user typed at the menu prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuInput {
    Choice(Choice),
    /// A number with no menu entry.
    Unknown(i64),
    NotANumber,
}

/// Parses a line typed at the menu prompt.
///
/// Surrounding whitespace is ignored; anything else that is not an integer is
/// rejected.
pub fn parse_choice(input: &str) -> MenuInput {
    let Ok(number) = input.trim().parse::<i64>() else {
        return MenuInput::NotANumber;
    };
    let Some(choice) = Choice::from_number(number) else {
        return MenuInput::Unknown(number);
    };
    MenuInput::Choice(choice)
}
