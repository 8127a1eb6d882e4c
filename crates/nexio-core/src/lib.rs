#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod item;
mod platform;
mod provider;

pub use item::IntegrationItem;
pub use platform::Platform;
pub use provider::{ProviderConfig, TransferTargets};
