//! Resource handles over a shared [`Connection`](crate::connection::Connection).

pub mod analyzer;
pub mod client;
pub mod client_admin;
pub mod collection;
pub mod database;
pub mod reader;
pub mod view;
pub mod view_alias;
pub mod view_arangosearch;

pub use analyzer::Analyzer;
pub use client::{Client, CreateDatabaseOptions, VersionInfo};
pub use client_admin::{ClusterHealth, License, LicenseStatus, LogLevels, ServerHealth, ServerMode};
pub use collection::{Collection, CollectionType};
pub use database::{Database, DatabaseInfo};
pub use reader::ResponseReader;
pub use view::{View, ViewBase, ViewType};
pub use view_alias::ArangoSearchAliasView;
pub use view_arangosearch::ArangoSearchView;
