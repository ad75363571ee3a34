//! LLM completion transport
//!
//! The pipeline only ever sees the [`CompletionGateway`] trait; the concrete
//! Yandex Foundation Models client lives in [`ycloud`].

pub mod gateway;
pub mod ycloud;

pub use gateway::{CompletionGateway, GatewayError};
pub use ycloud::YCloudClient;
