pub mod import;
pub mod init;
pub mod open;
pub mod score;
pub mod share;
pub mod validate;

mod output;
