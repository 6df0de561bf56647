//! Inbound adapters translating browser requests into calls on the domain
//! ports, keeping framework details at the edge.

pub mod http;
