pub mod dashboard;
pub mod echo;
pub mod health;

pub use dashboard::dashboard;
pub use echo::echo;
pub use health::{healthz, version};
