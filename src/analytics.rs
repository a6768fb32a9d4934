//! Inventory analytics and dashboard counts

use std::collections::BTreeMap;

use crate::error::Result;
use crate::models::{
    DashboardStats, InventoryAnalytics, InventoryStats, Item, PageRequest, ShoppingListStats,
};
use crate::repository::{ItemsRepository, ShoppingListRepository, DEFAULT_EXPIRY_WINDOW_DAYS};

/// Bucket for items without a category
pub const UNCATEGORIZED: &str = "Sem categoria";

/// Aggregate a user's items.
///
/// `low_stock` and `expiring` are passed through untouched so the caller
/// decides how those subsets are obtained.
pub fn summarize(items: &[Item], low_stock: Vec<Item>, expiring: Vec<Item>) -> InventoryAnalytics {
    let mut items_by_category: BTreeMap<String, usize> = BTreeMap::new();
    for item in items {
        let category = item
            .category
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(UNCATEGORIZED);
        *items_by_category.entry(category.to_string()).or_default() += 1;
    }

    InventoryAnalytics {
        total_items: items.len(),
        total_quantity: items.iter().map(|item| item.current_quantity).sum(),
        total_value: items.iter().map(Item::stock_value).sum(),
        items_by_category,
        low_stock_items: low_stock,
        expiring_items: expiring,
    }
}

#[derive(Clone)]
pub struct AnalyticsService {
    items: ItemsRepository,
    shopping_list: ShoppingListRepository,
}

impl AnalyticsService {
    pub fn new(items: ItemsRepository, shopping_list: ShoppingListRepository) -> Self {
        Self {
            items,
            shopping_list,
        }
    }

    pub async fn inventory(&self, user_id: &str) -> Result<InventoryAnalytics> {
        let all = self.items.all(user_id).await?;
        let (low_stock, expiring) = tokio::try_join!(
            self.items.low_stock(user_id),
            self.items.expiring(user_id, DEFAULT_EXPIRY_WINDOW_DAYS),
        )?;

        Ok(summarize(&all, low_stock, expiring))
    }

    pub async fn dashboard(&self, user_id: &str) -> Result<DashboardStats> {
        let probe = PageRequest::new(1, 1);
        let (items, shopping_list) = tokio::try_join!(
            self.items.list(user_id, probe),
            self.shopping_list.list(user_id, probe),
        )?;
        let (low_stock, expiring) = tokio::try_join!(
            self.items.low_stock(user_id),
            self.items.expiring(user_id, DEFAULT_EXPIRY_WINDOW_DAYS),
        )?;

        Ok(DashboardStats {
            inventory: InventoryStats {
                total_items: items.total,
                low_stock_count: low_stock.len(),
                expiring_count: expiring.len(),
            },
            shopping_list: ShoppingListStats {
                total_items: shopping_list.total,
            },
        })
    }
}
