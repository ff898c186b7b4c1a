pub mod export;
mod gtfs_file;
pub mod import;
