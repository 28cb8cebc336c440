/// Line-oriented text encoding of items.
pub mod record;
/// The file-backed item store.
pub mod store;

pub use record::LoadError;
pub use store::{Listing, SaveError, Store};
