use async_trait::async_trait;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    Category, CategoryUpdate, Dish, DishUpdate, Employee, EmployeeUpdate, NewCategory, NewDish,
    NewEmployee,
};
use crate::database::page::{Page, PageQuery};

// Write operations stamp create/update time and user from
// `context::AuditStamp::now()`, so they must run inside the request that
// performs them.

#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<Employee>, DatabaseError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Employee>, DatabaseError>;

    async fn insert(
        &self,
        employee: NewEmployee,
        password_digest: String,
    ) -> Result<Employee, DatabaseError>;

    /// Returns false when no employee has that id.
    async fn update(&self, changes: EmployeeUpdate) -> Result<bool, DatabaseError>;

    /// Ordered by last update, newest first; optional name substring filter.
    async fn page(&self, query: &PageQuery) -> Result<Page<Employee>, DatabaseError>;
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Category>, DatabaseError>;

    async fn insert(&self, category: NewCategory) -> Result<Category, DatabaseError>;

    async fn update(&self, changes: CategoryUpdate) -> Result<bool, DatabaseError>;

    async fn delete(&self, id: i64) -> Result<bool, DatabaseError>;

    /// Ordered by `sort` ascending.
    async fn page(&self, query: &PageQuery) -> Result<Page<Category>, DatabaseError>;

    /// All categories, optionally of one type, ordered by `sort` then last update.
    async fn list(&self, category_type: Option<i32>) -> Result<Vec<Category>, DatabaseError>;
}

#[async_trait]
pub trait DishRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Dish>, DatabaseError>;

    async fn insert(&self, dish: NewDish) -> Result<Dish, DatabaseError>;

    async fn update(&self, changes: DishUpdate) -> Result<bool, DatabaseError>;

    /// Returns the number of dishes changed.
    async fn set_status(&self, ids: &[i64], status: i32) -> Result<u64, DatabaseError>;

    async fn delete(&self, ids: &[i64]) -> Result<u64, DatabaseError>;

    async fn count_by_category(&self, category_id: i64) -> Result<i64, DatabaseError>;

    /// Ordered by last update, newest first; optional name substring filter.
    async fn page(&self, query: &PageQuery) -> Result<Page<Dish>, DatabaseError>;
}
