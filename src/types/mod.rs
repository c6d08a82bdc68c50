pub mod models;
pub mod upstream;
