// Services module

pub mod auth_api;
pub mod client;
pub mod observer;
pub mod refresh;
pub mod task_api;
pub mod transport;

pub use auth_api::AuthApi;
pub use client::SessionClient;
pub use observer::{LoadingObserver, NoopObserver, TracingObserver};
pub use refresh::{RefreshingTransport, REFRESH_PATH};
pub use task_api::TaskApi;
pub use transport::{ApiRequest, ApiResponse, RequestKind, ReqwestTransport, Transport};
