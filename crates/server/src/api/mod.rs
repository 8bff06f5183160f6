pub mod collect;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod trends;

pub use routes::create_router;
