pub mod auth;
pub use self::auth::{inspector_login, login, logout, session};

pub mod health;
pub use self::health::health;

pub mod pages;
pub use self::pages::{login_page, not_found, panel, root};
