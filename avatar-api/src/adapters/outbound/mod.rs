pub mod cloudinary;
pub mod postgres;
