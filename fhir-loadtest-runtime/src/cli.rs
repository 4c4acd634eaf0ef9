use clap::Parser;
use fhir_loadtest_core::{DataType, ScenarioName, DEFAULT_CONFIG_PATH};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "FHIR Converter Load Testing")]
pub(crate) struct LoadTestCli {
    /// Test scenario to run
    #[arg(value_enum)]
    pub scenario: ScenarioName,

    /// Type of test data to use
    #[arg(long, value_enum, default_value_t = DataType::Hl7v2)]
    pub data_type: DataType,

    /// Save detailed results to file
    #[arg(long)]
    pub save_results: bool,

    /// Configuration file path
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
}
