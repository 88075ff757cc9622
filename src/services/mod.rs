pub mod database;
pub mod inventory;
pub mod photo;
pub mod storage;
