pub mod advanced_stats_archive;
pub mod ingest;
