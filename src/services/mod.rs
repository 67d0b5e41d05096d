pub mod customer_service;
pub mod invoice_service;
pub mod subscription_service;
