#![doc = "The `tasknest` library crate."]
#![doc = ""]
#![doc = "Domain models, credential and session handling, the storage abstraction with"]
#![doc = "its in-memory and Postgres backends, route handlers, and error handling for"]
#![doc = "the tasknest API. The binary (`main.rs`) wires these into an actix-web server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;
