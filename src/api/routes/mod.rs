pub(crate) mod analytics;
pub(crate) mod auth;
pub(crate) mod health;
pub(crate) mod index;
pub(crate) mod items;
pub(crate) mod shopping_list;

/// Page size for `/items` when the caller does not pass a usable limit
pub(crate) const ITEMS_PAGE_SIZE: u64 = 10;

/// Page size for `/shopping-list`
pub(crate) const SHOPPING_LIST_PAGE_SIZE: u64 = 20;
