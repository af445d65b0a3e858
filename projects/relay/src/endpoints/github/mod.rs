pub mod events;
pub mod followers;
pub mod following;
pub mod profile;
pub mod rate_limit;
pub mod repos;
pub mod starred;
