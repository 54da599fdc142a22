pub mod config;
pub mod domain;
pub mod error;
pub mod generator;
pub mod lookup;
pub mod mapper;
pub mod output;
pub mod record;
pub mod references;
pub mod resolver;
pub mod serializer;
pub mod tables;
pub mod text;
