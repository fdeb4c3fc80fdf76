//! Infrastructure layer: concrete implementations of the repository traits
//! and external capability ports.

pub mod email;
pub mod geoip;
pub mod media;
pub mod persistence;
pub mod qr;
