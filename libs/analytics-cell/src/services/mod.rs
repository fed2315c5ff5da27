pub mod population;

pub use population::PopulationAnalytics;
