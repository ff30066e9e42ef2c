pub mod sessions;
pub mod termine;
pub mod user_groups;
pub mod users;
