pub mod http;
pub mod scene;
pub mod services;

pub use http::AlphaVantageClient;
pub use scene::SceneSurface;
pub use services::{BrowserNotifier, BrowserTimeProvider, ConsoleLogger};
