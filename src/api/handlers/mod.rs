pub mod auth;
pub mod banks;
pub mod drafts;
pub mod export;
pub mod outreach;
pub mod payments;
pub mod proof;
pub mod root;
