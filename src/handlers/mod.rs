pub mod crop_check;
pub mod health;
