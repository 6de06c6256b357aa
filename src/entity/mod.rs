pub mod audit_logs;
pub mod cart_lines;
pub mod carts;
pub mod categories;
pub mod customers;
pub mod orders;
pub mod products;
pub mod sea_orm_active_enums;
pub mod sessions;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use cart_lines::Entity as CartLines;
pub use carts::Entity as Carts;
pub use categories::Entity as Categories;
pub use customers::Entity as Customers;
pub use orders::Entity as Orders;
pub use products::Entity as Products;
pub use sessions::Entity as Sessions;
pub use users::Entity as Users;
