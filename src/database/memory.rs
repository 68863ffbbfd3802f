//! Storage kept in process memory. Used when no database is configured and by
//! the test suite. Enforces the same unique keys as the SQL schema.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use crate::context::AuditStamp;
use crate::database::manager::DatabaseError;
use crate::database::models::{
    Category, CategoryUpdate, Dish, DishUpdate, Employee, EmployeeUpdate, NewCategory, NewDish,
    NewEmployee,
};
use crate::database::page::{Page, PageQuery};
use crate::database::repository::{CategoryRepository, DishRepository, EmployeeRepository};

pub struct MemoryStore {
    next_id: AtomicI64,
    employees: RwLock<BTreeMap<i64, Employee>>,
    categories: RwLock<BTreeMap<i64, Category>>,
    dishes: RwLock<BTreeMap<i64, Dish>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1),
            employees: RwLock::new(BTreeMap::new()),
            categories: RwLock::new(BTreeMap::new()),
            dishes: RwLock::new(BTreeMap::new()),
        }
    }

    fn allocate_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Insert an account directly, bypassing the API defaults.
    pub async fn seed_employee(
        &self,
        username: &str,
        name: &str,
        password_digest: &str,
        status: i32,
    ) -> Result<Employee, DatabaseError> {
        let employee = EmployeeRepository::insert(
            self,
            NewEmployee {
                username: username.to_string(),
                name: name.to_string(),
                phone: String::new(),
                sex: String::new(),
                id_number: String::new(),
            },
            password_digest.to_string(),
        )
        .await?;

        let mut employees = self.employees.write().await;
        let stored = employees
            .get_mut(&employee.id)
            .ok_or_else(|| DatabaseError::NotFound(format!("employee {}", employee.id)))?;
        stored.status = status;
        Ok(stored.clone())
    }
}

fn contains_ignore_case(haystack: &str, needle: Option<&str>) -> bool {
    match needle {
        Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
        None => true,
    }
}

fn newest_first<T>(records: &mut [T], update_time: impl Fn(&T) -> (chrono::NaiveDateTime, i64)) {
    records.sort_by(|a, b| update_time(b).cmp(&update_time(a)));
}

#[async_trait]
impl EmployeeRepository for MemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Employee>, DatabaseError> {
        let employees = self.employees.read().await;
        Ok(employees.values().find(|e| e.username == username).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Employee>, DatabaseError> {
        Ok(self.employees.read().await.get(&id).cloned())
    }

    async fn insert(
        &self,
        employee: NewEmployee,
        password_digest: String,
    ) -> Result<Employee, DatabaseError> {
        let stamp = AuditStamp::now();
        let mut employees = self.employees.write().await;
        if employees.values().any(|e| e.username == employee.username) {
            return Err(DatabaseError::Duplicate(employee.username));
        }

        let id = self.allocate_id();
        let record = Employee {
            id,
            username: employee.username,
            name: employee.name,
            password: password_digest,
            phone: employee.phone,
            sex: employee.sex,
            id_number: employee.id_number,
            status: crate::database::models::STATUS_ENABLED,
            create_time: stamp.at,
            update_time: stamp.at,
            create_user: stamp.by_id(),
            update_user: stamp.by_id(),
        };
        employees.insert(id, record.clone());
        Ok(record)
    }

    async fn update(&self, changes: EmployeeUpdate) -> Result<bool, DatabaseError> {
        let stamp = AuditStamp::now();
        let mut employees = self.employees.write().await;

        if let Some(username) = &changes.username {
            if employees.values().any(|e| e.id != changes.id && &e.username == username) {
                return Err(DatabaseError::Duplicate(username.clone()));
            }
        }

        let Some(employee) = employees.get_mut(&changes.id) else {
            return Ok(false);
        };
        if let Some(v) = changes.username {
            employee.username = v;
        }
        if let Some(v) = changes.name {
            employee.name = v;
        }
        if let Some(v) = changes.phone {
            employee.phone = v;
        }
        if let Some(v) = changes.sex {
            employee.sex = v;
        }
        if let Some(v) = changes.id_number {
            employee.id_number = v;
        }
        if let Some(v) = changes.status {
            employee.status = v;
        }
        employee.update_time = stamp.at;
        employee.update_user = stamp.by_id();
        Ok(true)
    }

    async fn page(&self, query: &PageQuery) -> Result<Page<Employee>, DatabaseError> {
        let mut matching: Vec<Employee> = self
            .employees
            .read()
            .await
            .values()
            .filter(|e| contains_ignore_case(&e.name, query.name_filter()))
            .cloned()
            .collect();
        newest_first(&mut matching, |e| (e.update_time, e.id));
        Ok(Page::slice(matching, query))
    }
}

#[async_trait]
impl CategoryRepository for MemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Category>, DatabaseError> {
        Ok(self.categories.read().await.get(&id).cloned())
    }

    async fn insert(&self, category: NewCategory) -> Result<Category, DatabaseError> {
        let stamp = AuditStamp::now();
        let mut categories = self.categories.write().await;
        if categories.values().any(|c| c.name == category.name) {
            return Err(DatabaseError::Duplicate(category.name));
        }

        let id = self.allocate_id();
        let record = Category {
            id,
            category_type: category.category_type,
            name: category.name,
            sort: category.sort,
            create_time: stamp.at,
            update_time: stamp.at,
            create_user: stamp.by_id(),
            update_user: stamp.by_id(),
        };
        categories.insert(id, record.clone());
        Ok(record)
    }

    async fn update(&self, changes: CategoryUpdate) -> Result<bool, DatabaseError> {
        let stamp = AuditStamp::now();
        let mut categories = self.categories.write().await;

        if let Some(name) = &changes.name {
            if categories.values().any(|c| c.id != changes.id && &c.name == name) {
                return Err(DatabaseError::Duplicate(name.clone()));
            }
        }

        let Some(category) = categories.get_mut(&changes.id) else {
            return Ok(false);
        };
        if let Some(v) = changes.category_type {
            category.category_type = v;
        }
        if let Some(v) = changes.name {
            category.name = v;
        }
        if let Some(v) = changes.sort {
            category.sort = v;
        }
        category.update_time = stamp.at;
        category.update_user = stamp.by_id();
        Ok(true)
    }

    async fn delete(&self, id: i64) -> Result<bool, DatabaseError> {
        Ok(self.categories.write().await.remove(&id).is_some())
    }

    async fn page(&self, query: &PageQuery) -> Result<Page<Category>, DatabaseError> {
        let mut all: Vec<Category> = self.categories.read().await.values().cloned().collect();
        all.sort_by_key(|c| (c.sort, c.id));
        Ok(Page::slice(all, query))
    }

    async fn list(&self, category_type: Option<i32>) -> Result<Vec<Category>, DatabaseError> {
        let mut all: Vec<Category> = self
            .categories
            .read()
            .await
            .values()
            .filter(|c| category_type.map_or(true, |t| c.category_type == t))
            .cloned()
            .collect();
        all.sort_by(|a, b| a.sort.cmp(&b.sort).then(b.update_time.cmp(&a.update_time)));
        Ok(all)
    }
}

#[async_trait]
impl DishRepository for MemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Dish>, DatabaseError> {
        Ok(self.dishes.read().await.get(&id).cloned())
    }

    async fn insert(&self, dish: NewDish) -> Result<Dish, DatabaseError> {
        let stamp = AuditStamp::now();
        let mut dishes = self.dishes.write().await;
        if dishes.values().any(|d| d.name == dish.name) {
            return Err(DatabaseError::Duplicate(dish.name));
        }

        let id = self.allocate_id();
        let record = Dish {
            id,
            name: dish.name,
            category_id: dish.category_id,
            price: dish.price,
            code: dish.code,
            image: dish.image,
            description: dish.description,
            status: dish.status,
            sort: dish.sort,
            create_time: stamp.at,
            update_time: stamp.at,
            create_user: stamp.by_id(),
            update_user: stamp.by_id(),
        };
        dishes.insert(id, record.clone());
        Ok(record)
    }

    async fn update(&self, changes: DishUpdate) -> Result<bool, DatabaseError> {
        let stamp = AuditStamp::now();
        let mut dishes = self.dishes.write().await;

        if let Some(name) = &changes.name {
            if dishes.values().any(|d| d.id != changes.id && &d.name == name) {
                return Err(DatabaseError::Duplicate(name.clone()));
            }
        }

        let Some(dish) = dishes.get_mut(&changes.id) else {
            return Ok(false);
        };
        if let Some(v) = changes.name {
            dish.name = v;
        }
        if let Some(v) = changes.category_id {
            dish.category_id = v;
        }
        if let Some(v) = changes.price {
            dish.price = v;
        }
        if let Some(v) = changes.code {
            dish.code = v;
        }
        if let Some(v) = changes.image {
            dish.image = v;
        }
        if let Some(v) = changes.description {
            dish.description = v;
        }
        if let Some(v) = changes.status {
            dish.status = v;
        }
        if let Some(v) = changes.sort {
            dish.sort = v;
        }
        dish.update_time = stamp.at;
        dish.update_user = stamp.by_id();
        Ok(true)
    }

    async fn set_status(&self, ids: &[i64], status: i32) -> Result<u64, DatabaseError> {
        let stamp = AuditStamp::now();
        let mut dishes = self.dishes.write().await;
        let mut changed = 0;
        for id in ids {
            if let Some(dish) = dishes.get_mut(id) {
                dish.status = status;
                dish.update_time = stamp.at;
                dish.update_user = stamp.by_id();
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn delete(&self, ids: &[i64]) -> Result<u64, DatabaseError> {
        let mut dishes = self.dishes.write().await;
        Ok(ids.iter().filter(|id| dishes.remove(*id).is_some()).count() as u64)
    }

    async fn count_by_category(&self, category_id: i64) -> Result<i64, DatabaseError> {
        let dishes = self.dishes.read().await;
        Ok(dishes.values().filter(|d| d.category_id == category_id).count() as i64)
    }

    async fn page(&self, query: &PageQuery) -> Result<Page<Dish>, DatabaseError> {
        let mut matching: Vec<Dish> = self
            .dishes
            .read()
            .await
            .values()
            .filter(|d| contains_ignore_case(&d.name, query.name_filter()))
            .cloned()
            .collect();
        newest_first(&mut matching, |d| (d.update_time, d.id));
        Ok(Page::slice(matching, query))
    }
}
