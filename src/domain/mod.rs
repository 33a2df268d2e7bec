pub mod bank;
pub mod draft;
pub mod outreach;
pub mod payment;
pub mod payment_id;
pub mod user;

pub use bank::*;
pub use draft::*;
pub use outreach::*;
pub use payment::*;
pub use user::*;
