pub mod cart;
pub mod compare;
pub mod orders;
pub mod products;
pub mod wishlist;
