mod avatar;
mod user_locks;

pub use avatar::AvatarServiceImpl;
pub use user_locks::UserLocks;
