//! # resp-server
//!
//! HTTP-слой RustResp. Библиотечная часть отдаёт роутер наружу,
//! чтобы интеграционные тесты гоняли его через tower без сокета.

pub mod routes;

pub use routes::{router, SharedPipeline};
