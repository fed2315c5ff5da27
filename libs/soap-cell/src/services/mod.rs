pub mod generator;
pub mod vitals;

pub use generator::SoapGenerator;
pub use vitals::scrape_vitals;
