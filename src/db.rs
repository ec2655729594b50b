pub mod nba;
pub mod prod_db;
