//! MongoDB-backed store implementations.

mod member_repository;
mod selection_repository;

pub use member_repository::MemberRepository;
pub use selection_repository::SelectionRepository;
