//! Object storage for raw fragment data.

mod data_store;

pub use data_store::DataStore;
