pub mod bme680;
