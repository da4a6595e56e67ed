//! Page Components

mod create;
mod dashboard;
mod home;
mod login;

pub use create::CreatePage;
pub use dashboard::DashboardPage;
pub use home::HomePage;
pub use login::LoginPage;
