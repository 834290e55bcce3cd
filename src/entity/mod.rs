pub mod audit_logs;
pub mod categories;
pub mod designs;
pub mod order_items;
pub mod order_status_history;
pub mod orders;
pub mod product_designs;
pub mod product_variants;
pub mod products;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use categories::Entity as Categories;
pub use designs::Entity as Designs;
pub use order_items::Entity as OrderItems;
pub use order_status_history::Entity as OrderStatusHistory;
pub use orders::Entity as Orders;
pub use product_designs::Entity as ProductDesigns;
pub use product_variants::Entity as ProductVariants;
pub use products::Entity as Products;
pub use users::Entity as Users;
