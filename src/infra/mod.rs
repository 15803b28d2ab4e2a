pub mod opiniauto;
