pub mod roast;

pub use roast::Entity as Roast;
