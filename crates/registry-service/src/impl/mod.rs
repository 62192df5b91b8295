//! Gateway implementations.

mod user_gateway_impl;

pub use user_gateway_impl::UserGatewayImpl;
