//! `rd-service`: the routing-engine boundary.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                     |
//! |---------------|--------------------------------------------------------------|
//! | [`service`]   | `Locator`, `MatrixService`, `RouteService` traits + results  |
//! | [`wire`]      | JSON request bodies, tagged-union response decoding          |
//! | [`transport`] | `Transport` trait, `ReqwestTransport` (blocking HTTP)        |
//! | [`client`]    | `ValhallaClient<T>` - implements all three service traits    |
//! | [`error`]     | `ServiceError`, `ServiceResult<T>`                           |

pub mod client;
pub mod error;
pub mod service;
pub mod transport;
pub mod wire;

#[cfg(test)]
mod tests;

pub use client::{MatrixEndpoint, ValhallaClient};
pub use error::{ServiceError, ServiceResult};
pub use service::{Cost, CostGrid, LocateOutcome, Locator, MatrixService, RouteService, RouteTrip};
pub use transport::{HttpReply, ReqwestTransport, Transport};
