use std::sync::Arc;

use super::now_timestamp;
use crate::error::Result;
use crate::models::{NewUser, UpdateUser, User, UserChanges};
use crate::postgrest::{Filterable, PostgrestClient};
use crate::Supabase;

const TABLE: &str = "users";

/// Profiles keyed by the auth provider's user id
#[derive(Clone)]
pub struct UsersRepository {
    supabase: Arc<Supabase>,
}

impl UsersRepository {
    pub fn new(supabase: Arc<Supabase>) -> Self {
        Self { supabase }
    }

    fn table(&self) -> PostgrestClient {
        self.supabase.from(TABLE)
    }

    /// `None` when the user has no profile row
    pub async fn get(&self, user_id: &str) -> Result<Option<User>> {
        match self.table().select("*").eq("id", user_id).single().await {
            Ok(user) => Ok(Some(user)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub async fn create(&self, user_id: &str, email: &str, name: &str) -> Result<User> {
        let now = now_timestamp();
        let row = NewUser {
            id: user_id,
            email,
            nome: name,
            created_at: &now,
            updated_at: &now,
        };
        self.table().insert(&row).single().await
    }

    pub async fn update(&self, user_id: &str, changes: &UpdateUser) -> Result<User> {
        changes.validate()?;
        let row = UserChanges {
            changes,
            updated_at: now_timestamp(),
        };
        self.table()
            .update(&row)
            .eq("id", user_id)
            .single()
            .await
    }
}
