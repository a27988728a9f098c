pub mod card;
pub mod collection;
pub(crate) mod de;
pub mod envelope;
pub mod set;
pub mod user;

pub use card::*;
pub use collection::*;
pub use envelope::*;
pub use set::*;
pub use user::*;
