mod list_options;
mod list_password;
mod subscribe_policy;
mod subscriber;

pub use list_options::ListOptions;
pub use list_password::ListPassword;
pub use subscribe_policy::SubscribePolicy;
pub use subscriber::Subscriber;
