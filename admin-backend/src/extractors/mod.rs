pub mod tenant;

pub use tenant::{tenant_from_headers, TENANT_HEADER};
