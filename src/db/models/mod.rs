//! Entity models, one file per collection.
//! Everything is re-exported at `crate::db::models`.

pub mod campaign;
pub mod collection;
pub mod donation;
pub mod notification;
pub mod request;
pub mod user;

pub use self::campaign::*;
pub use self::collection::*;
pub use self::donation::*;
pub use self::notification::*;
pub use self::request::*;
pub use self::user::*;
