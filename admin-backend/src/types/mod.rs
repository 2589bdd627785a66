pub mod pagination;
pub mod response;

pub use pagination::{PaginatedResponse, PaginationMeta};
pub use response::ApiResponse;
