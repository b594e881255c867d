pub mod app;
pub mod config;
pub mod error;
pub mod models {
    pub mod search;
}
pub mod db {
    pub mod queries;
    pub mod repository;
    pub mod schema;
}
pub mod search {
    pub mod analytics;
    pub mod enricher;
    pub mod executor;
    pub mod normalize;
    pub mod suggest;
    pub mod trending;
}
pub mod api {
    pub mod errors;
    pub mod search;
}
