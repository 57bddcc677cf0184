pub mod clients;
pub mod products;
pub mod users;

pub use clients::Entity as Clients;
pub use products::Entity as Products;
pub use users::Entity as Users;
