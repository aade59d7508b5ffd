pub mod client;
pub mod web_messenger;

pub use client::{Locator, WebDriverClient};
pub use web_messenger::{WebMessenger, WebMessengerConfig};
