use async_trait::async_trait;
use sqlx::PgPool;

use crate::context::AuditStamp;
use crate::database::manager::DatabaseError;
use crate::database::models::{
    Category, CategoryUpdate, Dish, DishUpdate, Employee, EmployeeUpdate, NewCategory, NewDish,
    NewEmployee, STATUS_ENABLED,
};
use crate::database::page::{like_contains, Page, PageQuery};
use crate::database::repository::{CategoryRepository, DishRepository, EmployeeRepository};

/// Repositories backed by the PostgreSQL schema in `migrations/`
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn to_u64(n: i64) -> u64 {
    u64::try_from(n).unwrap_or(0)
}

fn to_i64(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

#[async_trait]
impl EmployeeRepository for PgStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Employee>, DatabaseError> {
        let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employee WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(employee)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Employee>, DatabaseError> {
        let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employee WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(employee)
    }

    async fn insert(
        &self,
        employee: NewEmployee,
        password_digest: String,
    ) -> Result<Employee, DatabaseError> {
        let stamp = AuditStamp::now();
        sqlx::query_as::<_, Employee>(
            r#"
            INSERT INTO employee
                (username, name, password, phone, sex, id_number, status,
                 create_time, update_time, create_user, update_user)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8, $9, $9)
            RETURNING *
            "#,
        )
        .bind(&employee.username)
        .bind(&employee.name)
        .bind(&password_digest)
        .bind(&employee.phone)
        .bind(&employee.sex)
        .bind(&employee.id_number)
        .bind(STATUS_ENABLED)
        .bind(stamp.at)
        .bind(stamp.by_id())
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_write)
    }

    async fn update(&self, changes: EmployeeUpdate) -> Result<bool, DatabaseError> {
        let stamp = AuditStamp::now();
        let result = sqlx::query(
            r#"
            UPDATE employee SET
                username    = COALESCE($2, username),
                name        = COALESCE($3, name),
                phone       = COALESCE($4, phone),
                sex         = COALESCE($5, sex),
                id_number   = COALESCE($6, id_number),
                status      = COALESCE($7, status),
                update_time = $8,
                update_user = $9
            WHERE id = $1
            "#,
        )
        .bind(changes.id)
        .bind(changes.username)
        .bind(changes.name)
        .bind(changes.phone)
        .bind(changes.sex)
        .bind(changes.id_number)
        .bind(changes.status)
        .bind(stamp.at)
        .bind(stamp.by_id())
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from_write)?;
        Ok(result.rows_affected() > 0)
    }

    async fn page(&self, query: &PageQuery) -> Result<Page<Employee>, DatabaseError> {
        let name = query.name_filter().map(like_contains);

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM employee WHERE ($1::text IS NULL OR name ILIKE $1)",
        )
        .bind(&name)
        .fetch_one(&self.pool)
        .await?;

        let records = sqlx::query_as::<_, Employee>(
            r#"
            SELECT * FROM employee
            WHERE ($1::text IS NULL OR name ILIKE $1)
            ORDER BY update_time DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(&name)
        .bind(to_i64(query.size()))
        .bind(to_i64(query.offset()))
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(records, to_u64(total), query))
    }
}

#[async_trait]
impl CategoryRepository for PgStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Category>, DatabaseError> {
        let category = sqlx::query_as::<_, Category>("SELECT * FROM category WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(category)
    }

    async fn insert(&self, category: NewCategory) -> Result<Category, DatabaseError> {
        let stamp = AuditStamp::now();
        sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO category
                (type, name, sort, create_time, update_time, create_user, update_user)
            VALUES ($1, $2, $3, $4, $4, $5, $5)
            RETURNING *
            "#,
        )
        .bind(category.category_type)
        .bind(&category.name)
        .bind(category.sort)
        .bind(stamp.at)
        .bind(stamp.by_id())
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_write)
    }

    async fn update(&self, changes: CategoryUpdate) -> Result<bool, DatabaseError> {
        let stamp = AuditStamp::now();
        let result = sqlx::query(
            r#"
            UPDATE category SET
                type        = COALESCE($2, type),
                name        = COALESCE($3, name),
                sort        = COALESCE($4, sort),
                update_time = $5,
                update_user = $6
            WHERE id = $1
            "#,
        )
        .bind(changes.id)
        .bind(changes.category_type)
        .bind(changes.name)
        .bind(changes.sort)
        .bind(stamp.at)
        .bind(stamp.by_id())
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from_write)?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM category WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn page(&self, query: &PageQuery) -> Result<Page<Category>, DatabaseError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM category")
            .fetch_one(&self.pool)
            .await?;

        let records = sqlx::query_as::<_, Category>(
            "SELECT * FROM category ORDER BY sort ASC, id ASC LIMIT $1 OFFSET $2",
        )
        .bind(to_i64(query.size()))
        .bind(to_i64(query.offset()))
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(records, to_u64(total), query))
    }

    async fn list(&self, category_type: Option<i32>) -> Result<Vec<Category>, DatabaseError> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT * FROM category
            WHERE ($1::int IS NULL OR type = $1)
            ORDER BY sort ASC, update_time DESC
            "#,
        )
        .bind(category_type)
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }
}

#[async_trait]
impl DishRepository for PgStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Dish>, DatabaseError> {
        let dish = sqlx::query_as::<_, Dish>("SELECT * FROM dish WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(dish)
    }

    async fn insert(&self, dish: NewDish) -> Result<Dish, DatabaseError> {
        let stamp = AuditStamp::now();
        sqlx::query_as::<_, Dish>(
            r#"
            INSERT INTO dish
                (name, category_id, price, code, image, description, status, sort,
                 create_time, update_time, create_user, update_user)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9, $10, $10)
            RETURNING *
            "#,
        )
        .bind(&dish.name)
        .bind(dish.category_id)
        .bind(dish.price)
        .bind(&dish.code)
        .bind(&dish.image)
        .bind(&dish.description)
        .bind(dish.status)
        .bind(dish.sort)
        .bind(stamp.at)
        .bind(stamp.by_id())
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_write)
    }

    async fn update(&self, changes: DishUpdate) -> Result<bool, DatabaseError> {
        let stamp = AuditStamp::now();
        let result = sqlx::query(
            r#"
            UPDATE dish SET
                name        = COALESCE($2, name),
                category_id = COALESCE($3, category_id),
                price       = COALESCE($4, price),
                code        = COALESCE($5, code),
                image       = COALESCE($6, image),
                description = COALESCE($7, description),
                status      = COALESCE($8, status),
                sort        = COALESCE($9, sort),
                update_time = $10,
                update_user = $11
            WHERE id = $1
            "#,
        )
        .bind(changes.id)
        .bind(changes.name)
        .bind(changes.category_id)
        .bind(changes.price)
        .bind(changes.code)
        .bind(changes.image)
        .bind(changes.description)
        .bind(changes.status)
        .bind(changes.sort)
        .bind(stamp.at)
        .bind(stamp.by_id())
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from_write)?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_status(&self, ids: &[i64], status: i32) -> Result<u64, DatabaseError> {
        let stamp = AuditStamp::now();
        let result = sqlx::query(
            "UPDATE dish SET status = $2, update_time = $3, update_user = $4 WHERE id = ANY($1)",
        )
        .bind(ids)
        .bind(status)
        .bind(stamp.at)
        .bind(stamp.by_id())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, ids: &[i64]) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM dish WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn count_by_category(&self, category_id: i64) -> Result<i64, DatabaseError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM dish WHERE category_id = $1")
            .bind(category_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn page(&self, query: &PageQuery) -> Result<Page<Dish>, DatabaseError> {
        let name = query.name_filter().map(like_contains);

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM dish WHERE ($1::text IS NULL OR name ILIKE $1)",
        )
        .bind(&name)
        .fetch_one(&self.pool)
        .await?;

        let records = sqlx::query_as::<_, Dish>(
            r#"
            SELECT * FROM dish
            WHERE ($1::text IS NULL OR name ILIKE $1)
            ORDER BY update_time DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(&name)
        .bind(to_i64(query.size()))
        .bind(to_i64(query.offset()))
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(records, to_u64(total), query))
    }
}
