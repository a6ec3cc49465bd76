pub mod access;
pub mod link;

pub use access::Entity as AccessEntity;
pub use link::Entity as LinkEntity;
