pub mod client;
pub mod probe;

pub use client::{AuthClient, Authenticator, LoginResult};
pub use probe::{ConnectivityProbe, HttpProbe};
