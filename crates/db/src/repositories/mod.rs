//! Stateless repository types, one per table.

mod account_repo;
mod connection_repo;
mod connection_request_repo;
mod group_repo;
mod privacy_repo;
mod profile_repo;
mod reset_token_repo;
mod session_repo;
mod shared_board_repo;

pub use account_repo::{AccountRepo, PurgeOutcome};
pub use connection_repo::ConnectionRepo;
pub use connection_request_repo::ConnectionRequestRepo;
pub use group_repo::GroupRepo;
pub use privacy_repo::PrivacyRepo;
pub use profile_repo::ProfileRepo;
pub use reset_token_repo::ResetTokenRepo;
pub use session_repo::SessionRepo;
pub use shared_board_repo::SharedBoardRepo;
