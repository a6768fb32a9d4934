//! Rows, payloads and derived aggregates
//!
//! Column names on the wire are the database's; field names are English.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An inventory item (`items` table)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "marca", default)]
    pub brand: Option<String>,
    #[serde(rename = "categoria", default)]
    pub category: Option<String>,
    #[serde(rename = "quantidade_atual")]
    pub current_quantity: f64,
    #[serde(rename = "quantidade_minima")]
    pub minimum_quantity: f64,
    #[serde(rename = "unidade_medida", default)]
    pub unit: Option<String>,
    #[serde(rename = "valor_unitario", default)]
    pub unit_price: Option<f64>,
    #[serde(rename = "data_validade", default)]
    pub expiration_date: Option<NaiveDate>,
    #[serde(rename = "data_ultima_compra", default)]
    pub last_purchase_at: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    pub user_id: String,
}

impl Item {
    /// At or below the configured minimum
    pub fn is_low_stock(&self) -> bool {
        self.current_quantity <= self.minimum_quantity
    }

    /// Unit price times current quantity; a missing price counts as zero
    pub fn stock_value(&self) -> f64 {
        self.unit_price.unwrap_or(0.0) * self.current_quantity
    }
}

/// Payload for creating an item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateItem {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "marca")]
    pub brand: String,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "quantidade_atual")]
    pub current_quantity: f64,
    #[serde(rename = "quantidade_minima")]
    pub minimum_quantity: f64,
    #[serde(rename = "unidade_medida")]
    pub unit: String,
    #[serde(rename = "valor_unitario")]
    pub unit_price: f64,
    #[serde(
        rename = "data_validade",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub expiration_date: Option<NaiveDate>,
}

impl CreateItem {
    pub fn validate(&self) -> Result<()> {
        require_text("nome", &self.name)?;
        require_non_negative("quantidade_atual", self.current_quantity)?;
        require_non_negative("quantidade_minima", self.minimum_quantity)?;
        require_non_negative("valor_unitario", self.unit_price)
    }
}

/// Row inserted for a new item
#[derive(Debug, Serialize)]
pub(crate) struct NewItem<'a> {
    #[serde(flatten)]
    pub item: &'a CreateItem,
    pub user_id: &'a str,
    pub data_ultima_compra: String,
}

/// Partial update of an item; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateItem {
    #[serde(rename = "nome", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "marca", default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(rename = "categoria", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(
        rename = "quantidade_atual",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub current_quantity: Option<f64>,
    #[serde(
        rename = "quantidade_minima",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub minimum_quantity: Option<f64>,
    #[serde(
        rename = "unidade_medida",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub unit: Option<String>,
    #[serde(
        rename = "valor_unitario",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub unit_price: Option<f64>,
    #[serde(
        rename = "data_validade",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub expiration_date: Option<NaiveDate>,
}

impl UpdateItem {
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            require_text("nome", name)?;
        }
        if let Some(value) = self.current_quantity {
            require_non_negative("quantidade_atual", value)?;
        }
        if let Some(value) = self.minimum_quantity {
            require_non_negative("quantidade_minima", value)?;
        }
        if let Some(value) = self.unit_price {
            require_non_negative("valor_unitario", value)?;
        }
        Ok(())
    }
}

/// Fields written when a purchase is registered
#[derive(Debug, Serialize)]
pub(crate) struct PurchaseUpdate {
    pub quantidade_atual: f64,
    pub data_ultima_compra: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valor_unitario: Option<f64>,
}

/// A shopping-list entry (`shopping_list` table)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingListItem {
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "quantidade")]
    pub quantity: f64,
    #[serde(rename = "unidade_medida", default)]
    pub unit: Option<String>,
    #[serde(rename = "concluido", default)]
    pub completed: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    pub user_id: String,
}

/// Payload for adding a shopping-list entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateShoppingListItem {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "quantidade")]
    pub quantity: f64,
    #[serde(
        rename = "unidade_medida",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub unit: Option<String>,
}

impl CreateShoppingListItem {
    pub fn validate(&self) -> Result<()> {
        require_text("nome", &self.name)?;
        require_non_negative("quantidade", self.quantity)
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct NewShoppingListItem<'a> {
    #[serde(flatten)]
    pub item: &'a CreateShoppingListItem,
    pub user_id: &'a str,
    pub concluido: bool,
}

/// Partial update of a shopping-list entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateShoppingListItem {
    #[serde(rename = "nome", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "quantidade", default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(
        rename = "unidade_medida",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub unit: Option<String>,
    #[serde(rename = "concluido", default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl UpdateShoppingListItem {
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            require_text("nome", name)?;
        }
        if let Some(value) = self.quantity {
            require_non_negative("quantidade", value)?;
        }
        Ok(())
    }
}

/// A user profile (`users` table); the id is the auth provider's user id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct NewUser<'a> {
    pub id: &'a str,
    pub email: &'a str,
    pub nome: &'a str,
    pub created_at: &'a str,
    pub updated_at: &'a str,
}

/// Profile fields a user may change
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateUser {
    #[serde(rename = "nome", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl UpdateUser {
    pub fn validate(&self) -> Result<()> {
        match &self.name {
            Some(name) => require_text("nome", name),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct UserChanges<'a> {
    #[serde(flatten)]
    pub changes: &'a UpdateUser,
    pub updated_at: String,
}

/// Per-user inventory aggregate, never persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryAnalytics {
    #[serde(rename = "total_itens")]
    pub total_items: usize,
    #[serde(rename = "quantidade_total")]
    pub total_quantity: f64,
    #[serde(rename = "valor_total")]
    pub total_value: f64,
    #[serde(rename = "itens_por_categoria")]
    pub items_by_category: BTreeMap<String, usize>,
    #[serde(rename = "itens_abaixo_minimo")]
    pub low_stock_items: Vec<Item>,
    #[serde(rename = "itens_vencendo")]
    pub expiring_items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryStats {
    pub total_items: u64,
    pub low_stock_count: usize,
    pub expiring_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingListStats {
    pub total_items: u64,
}

/// Counts shown on the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub inventory: InventoryStats,
    pub shopping_list: ShoppingListStats,
}

/// One-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    /// Both values are clamped to at least one
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    /// Zero-based inclusive row range covered by this page
    pub fn range(&self) -> (u64, u64) {
        let from = (self.page - 1).saturating_mul(self.limit);
        (from, from.saturating_add(self.limit - 1))
    }
}

/// A page of rows plus the totals needed to render pagination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            data,
            total,
            page: request.page,
            limit: request.limit,
            total_pages: total.div_ceil(request.limit),
        }
    }
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation(format!("'{}' must not be empty", field)));
    }
    Ok(())
}

pub(crate) fn require_non_negative(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::validation(format!(
            "'{}' must be a non-negative number",
            field
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_item() -> CreateItem {
        CreateItem {
            name: "Arroz".to_string(),
            brand: "Tio João".to_string(),
            category: "Grãos".to_string(),
            current_quantity: 2.0,
            minimum_quantity: 1.0,
            unit: "kg".to_string(),
            unit_price: 7.5,
            expiration_date: None,
        }
    }

    #[test]
    fn item_reads_database_columns() {
        let item: Item = serde_json::from_value(json!({
            "id": "i1",
            "nome": "Feijão",
            "marca": null,
            "categoria": "Grãos",
            "quantidade_atual": 1,
            "quantidade_minima": 2,
            "unidade_medida": "kg",
            "valor_unitario": null,
            "data_validade": "2024-03-01",
            "data_ultima_compra": null,
            "created_at": "2024-01-01T00:00:00+00:00",
            "updated_at": "2024-01-01T00:00:00+00:00",
            "user_id": "u1"
        }))
        .unwrap();

        assert_eq!(item.name, "Feijão");
        assert_eq!(item.expiration_date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert!(item.is_low_stock());
        assert_eq!(item.stock_value(), 0.0);
    }

    #[test]
    fn new_item_row_is_flat() {
        let payload = create_item();
        let row = NewItem {
            item: &payload,
            user_id: "u1",
            data_ultima_compra: "2024-01-01T00:00:00Z".to_string(),
        };
        let value = serde_json::to_value(&row).unwrap();

        assert_eq!(value["nome"], "Arroz");
        assert_eq!(value["user_id"], "u1");
        assert_eq!(value["data_ultima_compra"], "2024-01-01T00:00:00Z");
        assert!(value.get("data_validade").is_none());
    }

    #[test]
    fn partial_update_sends_only_present_fields() {
        let update = UpdateItem {
            current_quantity: Some(3.0),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({ "quantidade_atual": 3.0 })
        );
    }

    #[test]
    fn validation_rejects_negative_or_blank_values() {
        assert!(create_item().validate().is_ok());

        let mut negative = create_item();
        negative.current_quantity = -1.0;
        assert!(matches!(negative.validate(), Err(Error::Validation(_))));

        let mut blank = create_item();
        blank.name = "  ".to_string();
        assert!(blank.validate().is_err());

        let update = UpdateItem {
            unit_price: Some(f64::NAN),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn pages_cover_expected_rows() {
        assert_eq!(PageRequest::new(1, 10).range(), (0, 9));
        assert_eq!(PageRequest::new(3, 20).range(), (40, 59));
        assert_eq!(PageRequest::new(0, 0), PageRequest::new(1, 1));
    }

    #[test]
    fn total_pages_rounds_up() {
        let page = Paginated::new(vec![1, 2], 21, PageRequest::new(1, 10));
        assert_eq!(page.total_pages, 3);

        let empty: Paginated<i32> = Paginated::new(vec![], 0, PageRequest::new(1, 10));
        assert_eq!(empty.total_pages, 0);
    }
}
