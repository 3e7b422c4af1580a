//! Handler decorators: composition primitives plus the stock middlewares
//! (method guards, panic recovery, CORS, request logging, gzip request
//! decompression).

mod core;
mod cors;
mod decompress;
mod logger;

pub use core::{
    delete, from_fn, get, head, method_guard, patch, post, put, recover, skip, with_middleware,
    Middleware,
};
pub use cors::{cors, default_cors, CorsOptions};
pub use decompress::decompress;
pub use logger::logger;
