pub mod category;
pub mod dish;
pub mod employee;

pub use category::{Category, CategoryUpdate, NewCategory};
pub use dish::{Dish, DishUpdate, NewDish};
pub use employee::{Employee, EmployeeUpdate, NewEmployee};

/// Enabled account / dish on sale
pub const STATUS_ENABLED: i32 = 1;
/// Disabled account / dish withdrawn
pub const STATUS_DISABLED: i32 = 0;

pub fn is_valid_status(status: i32) -> bool {
    status == STATUS_ENABLED || status == STATUS_DISABLED
}
