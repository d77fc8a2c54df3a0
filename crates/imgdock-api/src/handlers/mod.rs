pub mod delete_objects;
pub mod health;
pub mod modify;
pub mod objects;
pub mod optimize;
pub mod upload;
