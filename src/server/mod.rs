pub mod app;
mod deserializers;
mod routes;
pub mod session;
