//! Table access, one repository per resource.
//!
//! Every query filters on the owning user's id; rows of other users are
//! never read or written.

mod items;
mod shopping_list;
mod users;

pub use items::{expiry_cutoff, ItemsRepository, DEFAULT_EXPIRY_WINDOW_DAYS};
pub use shopping_list::ShoppingListRepository;
pub use users::UsersRepository;

/// Column holding the owning user's id
pub(crate) const OWNER_COLUMN: &str = "user_id";

pub(crate) fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}
