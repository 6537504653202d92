//! 页面与界面组件

pub mod configuration;
pub mod errors;
pub mod follow;
pub mod home;
pub mod layout;
pub mod login;
pub mod profile;
pub mod register;
pub mod tweet;
pub mod user;
