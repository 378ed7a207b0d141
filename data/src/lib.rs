#![allow(async_fn_in_trait)]

use dcg_error::DcgError;

pub mod collection;
pub mod config;
pub mod default_driver;
pub mod driver;
pub mod filter;
pub mod model;
pub mod value;

pub use collection::Collection;
pub use config::{QueryConfig, SortDirection};
pub use default_driver::DefaultDriver;
pub use driver::{BaseConfig, DataDriver, DeleteTarget, Fetched};
pub use filter::Filter;
pub use model::{Model, ModelRef};
pub use value::Value;

pub(crate) fn configuration_error<T: Into<String>>(msg: T) -> DcgError {
    let msg = msg.into();
    dcg_log::error(Some("❌"), &msg);
    DcgError::Configuration(msg)
}
