//! Session cookies, token payload decoding and the route access gate.

pub mod cookies;
pub mod gate;
pub mod middleware;
pub mod token;

pub use gate::{Decision, GateError, GatePaths, Zone};
pub use middleware::{access_gate, AdminSession, AppState, UserSession};
pub use token::{decode_token, Claims, TokenError};
