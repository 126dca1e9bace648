pub mod config;

#[cfg(feature = "logging")]
pub mod logging;

#[cfg(feature = "mail")]
pub mod mail;

#[cfg(feature = "payments")]
pub mod payments;
