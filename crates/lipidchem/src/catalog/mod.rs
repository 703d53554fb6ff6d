mod lipid_category;
pub mod lipid_database;
