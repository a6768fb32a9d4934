#![allow(dead_code)]

use serde_json::{json, Value};
use stockhome_api::Supabase;
use wiremock::MockServer;

pub const ANON_KEY: &str = "anon-key";

pub fn supabase(server: &MockServer) -> Supabase {
    Supabase::new(&server.uri(), ANON_KEY)
}

/// An `items` row as PostgREST returns it
pub fn item_row(
    id: &str,
    user_id: &str,
    category: Option<&str>,
    quantity: f64,
    minimum: f64,
    price: Option<f64>,
    expires: Option<&str>,
) -> Value {
    json!({
        "id": id,
        "nome": format!("Item {id}"),
        "marca": null,
        "categoria": category,
        "quantidade_atual": quantity,
        "quantidade_minima": minimum,
        "unidade_medida": "un",
        "valor_unitario": price,
        "data_validade": expires,
        "data_ultima_compra": "2024-01-01T10:00:00+00:00",
        "created_at": "2024-01-01T10:00:00+00:00",
        "updated_at": "2024-01-01T10:00:00+00:00",
        "user_id": user_id
    })
}

pub fn shopping_row(id: &str, user_id: &str, completed: bool) -> Value {
    json!({
        "id": id,
        "nome": format!("Entry {id}"),
        "quantidade": 2,
        "unidade_medida": "kg",
        "concluido": completed,
        "created_at": "2024-01-01T10:00:00+00:00",
        "updated_at": "2024-01-01T10:00:00+00:00",
        "user_id": user_id
    })
}

pub fn user_row(id: &str, email: &str, name: &str) -> Value {
    json!({
        "id": id,
        "email": email,
        "nome": name,
        "avatar_url": null,
        "created_at": "2024-01-01T10:00:00+00:00",
        "updated_at": "2024-01-01T10:00:00+00:00"
    })
}

pub fn session_body(user_id: &str, email: &str, access_token: &str) -> Value {
    json!({
        "access_token": access_token,
        "refresh_token": format!("refresh-{access_token}"),
        "token_type": "bearer",
        "expires_in": 3600,
        "user": { "id": user_id, "email": email }
    })
}

/// PostgREST's answer when single-object mode matches no row
pub fn no_rows() -> Value {
    json!({
        "code": "PGRST116",
        "details": "The result contains 0 rows",
        "hint": null,
        "message": "JSON object requested, multiple (or no) rows returned"
    })
}
