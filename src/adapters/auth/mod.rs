//! Authentication adapters.
//!
//! Implementations of the `SessionValidator` port:
//!
//! - `jwt` - HS256 tokens signed with the shared API secret
//! - `mock` - Test implementation backed by a token table

mod jwt;
mod mock;

pub use jwt::{JwtClaims, JwtSessionValidator};
pub use mock::MockSessionValidator;
