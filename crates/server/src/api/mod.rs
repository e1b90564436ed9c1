pub mod catalog;
pub mod handlers;
pub mod previews;
pub mod routes;

pub use routes::create_router;
