use std::sync::Arc;

use super::OWNER_COLUMN;
use crate::error::Result;
use crate::models::{
    CreateShoppingListItem, NewShoppingListItem, PageRequest, Paginated, ShoppingListItem,
    UpdateShoppingListItem,
};
use crate::postgrest::{Filterable, PostgrestClient, SortOrder};
use crate::Supabase;

const TABLE: &str = "shopping_list";

#[derive(Clone)]
pub struct ShoppingListRepository {
    supabase: Arc<Supabase>,
}

impl ShoppingListRepository {
    pub fn new(supabase: Arc<Supabase>) -> Self {
        Self { supabase }
    }

    fn table(&self) -> PostgrestClient {
        self.supabase.from(TABLE)
    }

    pub async fn list(&self, user_id: &str, page: PageRequest) -> Result<Paginated<ShoppingListItem>> {
        let (from, to) = page.range();
        let result = self
            .table()
            .select("*")
            .eq(OWNER_COLUMN, user_id)
            .order("created_at", SortOrder::Descending)
            .range(from, to)
            .execute_with_count::<ShoppingListItem>()
            .await?;

        Ok(Paginated::new(result.rows, result.total, page))
    }

    /// Entries not yet marked as bought, newest first
    pub async fn incomplete(&self, user_id: &str) -> Result<Vec<ShoppingListItem>> {
        self.table()
            .select("*")
            .eq(OWNER_COLUMN, user_id)
            .eq("concluido", false)
            .order("created_at", SortOrder::Descending)
            .execute()
            .await
    }

    pub async fn get(&self, user_id: &str, item_id: &str) -> Result<ShoppingListItem> {
        self.table()
            .select("*")
            .eq("id", item_id)
            .eq(OWNER_COLUMN, user_id)
            .single()
            .await
    }

    pub async fn add(&self, user_id: &str, item: &CreateShoppingListItem) -> Result<ShoppingListItem> {
        item.validate()?;
        let row = NewShoppingListItem {
            item,
            user_id,
            concluido: false,
        };
        self.table().insert(&row).single().await
    }

    pub async fn update(
        &self,
        user_id: &str,
        item_id: &str,
        changes: &UpdateShoppingListItem,
    ) -> Result<ShoppingListItem> {
        changes.validate()?;
        self.table()
            .update(changes)
            .eq("id", item_id)
            .eq(OWNER_COLUMN, user_id)
            .single()
            .await
    }

    pub async fn set_completed(
        &self,
        user_id: &str,
        item_id: &str,
        completed: bool,
    ) -> Result<ShoppingListItem> {
        let changes = UpdateShoppingListItem {
            completed: Some(completed),
            ..Default::default()
        };
        self.update(user_id, item_id, &changes).await
    }

    pub async fn delete(&self, user_id: &str, item_id: &str) -> Result<()> {
        self.table()
            .delete()
            .eq("id", item_id)
            .eq(OWNER_COLUMN, user_id)
            .execute()
            .await
    }

    /// Remove every completed entry of the user
    pub async fn clear_completed(&self, user_id: &str) -> Result<()> {
        self.table()
            .delete()
            .eq(OWNER_COLUMN, user_id)
            .eq("concluido", true)
            .execute()
            .await
    }
}
