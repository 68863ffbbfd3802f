pub mod manager;
pub mod memory;
pub mod models;
pub mod page;
pub mod postgres;
pub mod repository;

use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;

pub use manager::{DatabaseError, DatabaseManager};
pub use page::{Page, PageQuery};
pub use repository::{CategoryRepository, DishRepository, EmployeeRepository};

use crate::auth::{PasswordEncoder, PasswordError};
use memory::MemoryStore;
use models::NewEmployee;
use postgres::PgStore;

pub const ADMIN_USERNAME: &str = "admin";

/// The repositories handlers work against, behind one of the two back ends
#[derive(Clone)]
pub struct Storage {
    pub employees: Arc<dyn EmployeeRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub dishes: Arc<dyn DishRepository>,
}

impl Storage {
    pub fn postgres(pool: PgPool) -> Self {
        let store = Arc::new(PgStore::new(pool));
        Self {
            employees: store.clone(),
            categories: store.clone(),
            dishes: store,
        }
    }

    pub fn memory() -> Self {
        Self::from_memory(Arc::new(MemoryStore::new()))
    }

    pub fn from_memory(store: Arc<MemoryStore>) -> Self {
        Self {
            employees: store.clone(),
            categories: store.clone(),
            dishes: store,
        }
    }

    /// Create the `admin` account on an empty install.
    pub async fn ensure_admin(
        &self,
        encoder: &dyn PasswordEncoder,
        initial_password: &str,
    ) -> Result<bool, BootstrapError> {
        if self.employees.find_by_username(ADMIN_USERNAME).await?.is_some() {
            return Ok(false);
        }

        let digest = encoder.encode(initial_password)?;
        let admin = NewEmployee {
            username: ADMIN_USERNAME.to_string(),
            name: "Administrator".to_string(),
            phone: String::new(),
            sex: String::new(),
            id_number: String::new(),
        };
        self.employees.insert(admin, digest).await?;
        info!("Created initial '{}' account", ADMIN_USERNAME);
        Ok(true)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error(transparent)]
    Password(#[from] PasswordError),
}
