#[cfg(feature = "rt")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of source document a run converts.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "rt", derive(Serialize, Deserialize, clap::ValueEnum))]
#[cfg_attr(feature = "rt", serde(rename_all = "lowercase"))]
pub enum DataType {
    #[default]
    #[cfg_attr(feature = "rt", value(name = "hl7v2"))]
    Hl7v2,
    Ccda,
    Json,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Hl7v2 => "hl7v2",
            DataType::Ccda => "ccda",
            DataType::Json => "json",
        }
    }

    pub fn input_format(&self) -> InputDataFormat {
        match self {
            DataType::Hl7v2 => InputDataFormat::Hl7v2,
            DataType::Ccda => InputDataFormat::Ccda,
            DataType::Json => InputDataFormat::Json,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format tag the conversion service expects in `inputDataFormat`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "rt", derive(Serialize, Deserialize))]
pub enum InputDataFormat {
    Hl7v2,
    Ccda,
    Json,
}

/// Request body sent to every conversion endpoint.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "rt", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "rt", serde(rename_all = "camelCase"))]
pub struct ConversionEnvelope {
    pub input_data_format: InputDataFormat,
    pub input_data_string: String,
}

impl ConversionEnvelope {
    pub fn new(data_type: DataType, input: impl Into<String>) -> Self {
        Self {
            input_data_format: data_type.input_format(),
            input_data_string: input.into(),
        }
    }
}
