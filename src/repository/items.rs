use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use tracing::{debug, warn};

use super::{now_timestamp, OWNER_COLUMN};
use crate::error::{Error, Result};
use crate::models::{
    require_non_negative, CreateItem, Item, NewItem, PageRequest, Paginated, PurchaseUpdate,
    UpdateItem,
};
use crate::postgrest::{Filterable, PostgrestClient, SortOrder};
use crate::Supabase;

const TABLE: &str = "items";

/// Look-ahead used when the caller does not pick an expiry window
pub const DEFAULT_EXPIRY_WINDOW_DAYS: u32 = 30;

/// Last expiration date included in a window of `days` starting at `today`
pub fn expiry_cutoff(today: NaiveDate, days: u32) -> Result<NaiveDate> {
    today
        .checked_add_signed(Duration::days(i64::from(days)))
        .ok_or_else(|| Error::validation("'days' is out of range"))
}

#[derive(Clone)]
pub struct ItemsRepository {
    supabase: Arc<Supabase>,
}

impl ItemsRepository {
    pub fn new(supabase: Arc<Supabase>) -> Self {
        Self { supabase }
    }

    fn table(&self) -> PostgrestClient {
        self.supabase.from(TABLE)
    }

    /// Newest first, with the user's total item count
    pub async fn list(&self, user_id: &str, page: PageRequest) -> Result<Paginated<Item>> {
        let (from, to) = page.range();
        let result = self
            .table()
            .select("*")
            .eq(OWNER_COLUMN, user_id)
            .order("created_at", SortOrder::Descending)
            .range(from, to)
            .execute_with_count::<Item>()
            .await?;

        Ok(Paginated::new(result.rows, result.total, page))
    }

    /// Every item owned by the user
    pub async fn all(&self, user_id: &str) -> Result<Vec<Item>> {
        self.table()
            .select("*")
            .eq(OWNER_COLUMN, user_id)
            .execute()
            .await
    }

    pub async fn get(&self, user_id: &str, item_id: &str) -> Result<Item> {
        self.table()
            .select("*")
            .eq("id", item_id)
            .eq(OWNER_COLUMN, user_id)
            .single()
            .await
    }

    pub async fn create(&self, user_id: &str, item: &CreateItem) -> Result<Item> {
        item.validate()?;
        let row = NewItem {
            item,
            user_id,
            data_ultima_compra: now_timestamp(),
        };
        self.table().insert(&row).single().await
    }

    pub async fn update(&self, user_id: &str, item_id: &str, changes: &UpdateItem) -> Result<Item> {
        changes.validate()?;
        self.table()
            .update(changes)
            .eq("id", item_id)
            .eq(OWNER_COLUMN, user_id)
            .single()
            .await
    }

    pub async fn delete(&self, user_id: &str, item_id: &str) -> Result<()> {
        self.table()
            .delete()
            .eq("id", item_id)
            .eq(OWNER_COLUMN, user_id)
            .execute()
            .await
    }

    pub async fn by_category(&self, user_id: &str, category: &str) -> Result<Vec<Item>> {
        self.table()
            .select("*")
            .eq(OWNER_COLUMN, user_id)
            .eq("categoria", category)
            .order("created_at", SortOrder::Descending)
            .execute()
            .await
    }

    /// Items at or below their minimum quantity, lowest stock first.
    ///
    /// The server-side predicate compares two columns, which PostgREST
    /// rejects; the in-memory scan over all of the user's items is the
    /// path that answers in practice.
    pub async fn low_stock(&self, user_id: &str) -> Result<Vec<Item>> {
        let primary = self
            .table()
            .select("*")
            .eq(OWNER_COLUMN, user_id)
            .lte("quantidade_atual", "quantidade_minima")
            .order("quantidade_atual", SortOrder::Ascending)
            .execute::<Item>()
            .await;

        match primary {
            Ok(items) => Ok(items),
            Err(err) => {
                warn!(error = %err, "Low-stock filter rejected, scanning all items");
                let mut items: Vec<Item> = self
                    .all(user_id)
                    .await?
                    .into_iter()
                    .filter(Item::is_low_stock)
                    .collect();
                items.sort_by(|a, b| a.current_quantity.total_cmp(&b.current_quantity));
                Ok(items)
            }
        }
    }

    /// Items with an expiration date within `days` from today, soonest first
    pub async fn expiring(&self, user_id: &str, days: u32) -> Result<Vec<Item>> {
        let cutoff = expiry_cutoff(Utc::now().date_naive(), days)?;
        self.expiring_before(user_id, cutoff).await
    }

    /// Items with an expiration date on or before `cutoff`
    pub async fn expiring_before(&self, user_id: &str, cutoff: NaiveDate) -> Result<Vec<Item>> {
        debug!(%cutoff, "Fetching expiring items");
        self.table()
            .select("*")
            .eq(OWNER_COLUMN, user_id)
            .not_null("data_validade")
            .lte("data_validade", cutoff.format("%Y-%m-%d"))
            .order("data_validade", SortOrder::Ascending)
            .execute()
            .await
    }

    /// Add `quantity` to the stock, stamp the purchase time and optionally set a new price
    pub async fn register_purchase(
        &self,
        user_id: &str,
        item_id: &str,
        quantity: f64,
        unit_price: Option<f64>,
    ) -> Result<Item> {
        if !quantity.is_finite() || quantity <= 0.0 {
            return Err(Error::validation("'quantity' must be a positive number"));
        }
        if let Some(price) = unit_price {
            require_non_negative("price", price)?;
        }

        let current = self.get(user_id, item_id).await?;
        let new_quantity = current.current_quantity + quantity;
        if !new_quantity.is_finite() {
            return Err(Error::validation("'quantity' is out of range"));
        }
        let update = PurchaseUpdate {
            quantidade_atual: new_quantity,
            data_ultima_compra: now_timestamp(),
            valor_unitario: unit_price,
        };

        self.table()
            .update(&update)
            .eq("id", item_id)
            .eq(OWNER_COLUMN, user_id)
            .single()
            .await
    }
}
