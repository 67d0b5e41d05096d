pub mod customer;
pub mod error;
pub mod gateway;
pub mod id;
pub mod invoice;
pub mod money;
pub mod store;
pub mod subscription;
