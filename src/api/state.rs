use std::sync::Arc;

use crate::analytics::AnalyticsService;
use crate::repository::{ItemsRepository, ShoppingListRepository, UsersRepository};
use crate::Supabase;

/// Shared handler state; cloning is cheap
#[derive(Clone)]
pub struct AppState {
    pub supabase: Arc<Supabase>,
    pub items: ItemsRepository,
    pub shopping_list: ShoppingListRepository,
    pub users: UsersRepository,
    pub analytics: AnalyticsService,
}

impl AppState {
    pub fn new(supabase: Supabase) -> Self {
        let supabase = Arc::new(supabase);
        let items = ItemsRepository::new(supabase.clone());
        let shopping_list = ShoppingListRepository::new(supabase.clone());

        Self {
            users: UsersRepository::new(supabase.clone()),
            analytics: AnalyticsService::new(items.clone(), shopping_list.clone()),
            items,
            shopping_list,
            supabase,
        }
    }
}
