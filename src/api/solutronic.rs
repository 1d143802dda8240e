//! Solutronic inverter web interface.

mod discovery;
mod error;
mod fetcher;
mod host;
mod metadata;
mod parser;
mod resolver;
#[cfg(test)]
pub mod testing;
mod transport;

pub use self::{
    discovery::{Scanner, Subnet},
    error::{Error, TransportError},
    fetcher::Fetcher,
    host::HostKey,
    metadata::extract_metadata,
    parser::parse_readings,
    resolver::{EndpointCache, Resolver},
    transport::{HttpTransport, Page, Transport},
};
