pub mod db;
pub mod smtp;
