pub mod climate;
pub mod index;
