//! In-memory repositories.
//!
//! Used when no `DATABASE_URL` is configured and by the test suite. Every
//! table sits behind a `tokio::sync::RwLock`: reads run concurrently, writes
//! are serialized.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::repos::book_repo::{Book, BookFields, BookRepo};
use crate::repos::error::{RepoError, RepoResult};
use crate::repos::food_repo::{Food, FoodFields, FoodRepo};
use crate::repos::page::{Page, PageRequest};
use crate::repos::user_repo::{NewUser, RoleSet, UserRecord, UserStore};

#[derive(Debug)]
struct Table<T> {
    next_id: i64,
    rows: BTreeMap<i64, T>,
}

impl<T: Clone> Table<T> {
    fn new() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }

    fn insert(&mut self, make: impl FnOnce(i64) -> T) -> T {
        let id = self.next_id;
        self.next_id += 1;
        let row = make(id);
        self.rows.insert(id, row.clone());
        row
    }

    fn page(&self, request: PageRequest) -> Page<T> {
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(request.limit()).unwrap_or(usize::MAX);

        Page {
            content: self
                .rows
                .values()
                .skip(offset)
                .take(limit)
                .cloned()
                .collect(),
            request,
            total_elements: self.rows.len() as u64,
        }
    }

    fn replace(&mut self, id: i64, make: impl FnOnce(i64) -> T) -> Option<T> {
        let slot = self.rows.get_mut(&id)?;
        *slot = make(id);
        Some(slot.clone())
    }
}

#[derive(Debug)]
pub struct InMemoryBookRepo {
    table: RwLock<Table<Book>>,
}

impl InMemoryBookRepo {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table::new()),
        }
    }
}

impl Default for InMemoryBookRepo {
    fn default() -> Self {
        Self::new()
    }
}

fn book(id: i64, fields: BookFields) -> Book {
    Book {
        id,
        title: fields.title,
        author: fields.author,
        isbn: fields.isbn,
    }
}

#[async_trait]
impl BookRepo for InMemoryBookRepo {
    async fn list(&self, page: PageRequest) -> RepoResult<Page<Book>> {
        Ok(self.table.read().await.page(page))
    }

    async fn get(&self, id: i64) -> RepoResult<Option<Book>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn create(&self, fields: BookFields) -> RepoResult<Book> {
        Ok(self.table.write().await.insert(|id| book(id, fields)))
    }

    async fn update(&self, id: i64, fields: BookFields) -> RepoResult<Option<Book>> {
        Ok(self.table.write().await.replace(id, |id| book(id, fields)))
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }
}

#[derive(Debug)]
pub struct InMemoryFoodRepo {
    table: RwLock<Table<Food>>,
}

impl InMemoryFoodRepo {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table::new()),
        }
    }
}

impl Default for InMemoryFoodRepo {
    fn default() -> Self {
        Self::new()
    }
}

fn food(id: i64, fields: FoodFields) -> Food {
    Food {
        id,
        name: fields.name,
        origin_country: fields.origin_country,
    }
}

#[async_trait]
impl FoodRepo for InMemoryFoodRepo {
    async fn list(&self, page: PageRequest) -> RepoResult<Page<Food>> {
        Ok(self.table.read().await.page(page))
    }

    async fn get(&self, id: i64) -> RepoResult<Option<Food>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn create(&self, fields: FoodFields) -> RepoResult<Food> {
        Ok(self.table.write().await.insert(|id| food(id, fields)))
    }

    async fn update(&self, id: i64, fields: FoodFields) -> RepoResult<Option<Food>> {
        Ok(self.table.write().await.replace(id, |id| food(id, fields)))
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }
}

/// Users keyed by email (the token subject).
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<BTreeMap<String, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<UserRecord>> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn list(&self) -> RepoResult<Vec<UserRecord>> {
        Ok(self.users.read().await.values().cloned().collect())
    }

    async fn create(&self, user: NewUser) -> RepoResult<UserRecord> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.email) {
            return Err(RepoError::Conflict("email already registered"));
        }

        let record = UserRecord {
            id: Uuid::new_v4(),
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            password_hash: user.password_hash,
            roles: user.roles,
        };
        users.insert(record.email.clone(), record.clone());
        Ok(record)
    }

    async fn set_roles(&self, user_id: Uuid, roles: &RoleSet) -> RepoResult<Option<UserRecord>> {
        let mut users = self.users.write().await;
        let updated = users.values_mut().find(|u| u.id == user_id).map(|u| {
            u.roles = roles.clone();
            u.clone()
        });
        Ok(updated)
    }
}
