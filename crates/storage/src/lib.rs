#![forbid(unsafe_code)]

pub mod bank_source;
pub mod http;
pub mod repository;

pub use bank_source::{
    BankSource, BankSourceError, FsBankSource, InMemoryBankSource, resource_name,
};
pub use http::{HttpProgressConfig, HttpProgressRepository};
pub use repository::{InMemoryRepository, ProgressRepository, Storage, StorageError};
