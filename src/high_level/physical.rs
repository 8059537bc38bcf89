use derivative::Derivative;
use serde::Serialize;

/// Physical properties of a fixture in one mode.
///
/// Units follow the file format: kg, mm, W, K and degrees.
#[derive(Debug, PartialEq, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Physical {
    pub bulb: Bulb,
    pub dimensions: Dimensions,
    pub lens: Lens,
    pub focus: Focus,
    pub technical: Technical,
}

#[derive(Debug, PartialEq, Clone, Derivative, Serialize)]
#[derivative(Default)]
pub struct Bulb {
    #[derivative(Default(value = "\"Other\".into()"))]
    #[serde(rename = "@Type")]
    pub kind: String,
    #[serde(rename = "@Lumens")]
    pub lumens: u32,
    #[serde(rename = "@ColourTemperature")]
    pub colour_temperature: u32,
}

#[derive(Debug, PartialEq, Clone, Default, Serialize)]
pub struct Dimensions {
    #[serde(rename = "@Weight")]
    pub weight: f64,
    #[serde(rename = "@Width")]
    pub width: u32,
    #[serde(rename = "@Height")]
    pub height: u32,
    #[serde(rename = "@Depth")]
    pub depth: u32,
}

#[derive(Debug, PartialEq, Clone, Derivative, Serialize)]
#[derivative(Default)]
pub struct Lens {
    #[derivative(Default(value = "\"Other\".into()"))]
    #[serde(rename = "@Name")]
    pub name: String,
    #[serde(rename = "@DegreesMin")]
    pub degrees_min: f64,
    #[serde(rename = "@DegreesMax")]
    pub degrees_max: f64,
}

#[derive(Debug, PartialEq, Clone, Derivative, Serialize)]
#[derivative(Default)]
pub struct Focus {
    #[derivative(Default(value = "\"Fixed\".into()"))]
    #[serde(rename = "@Type")]
    pub kind: String,
    #[serde(rename = "@PanMax")]
    pub pan_max: u32,
    #[serde(rename = "@TiltMax")]
    pub tilt_max: u32,
}

#[derive(Debug, PartialEq, Clone, Derivative, Serialize)]
#[derivative(Default)]
pub struct Technical {
    #[serde(rename = "@PowerConsumption")]
    pub power_consumption: u32,
    #[derivative(Default(value = "\"5-pin\".into()"))]
    #[serde(rename = "@DmxConnector")]
    pub dmx_connector: String,
}

impl Physical {
    /// Floating point fields with their name in the file format, the only
    /// ones that can become negative.
    pub(crate) fn float_fields(&self) -> [(&'static str, f64); 3] {
        [
            ("Weight", self.dimensions.weight),
            ("DegreesMin", self.lens.degrees_min),
            ("DegreesMax", self.lens.degrees_max),
        ]
    }

    /// Name and value of the first negative field.
    pub fn first_negative(&self) -> Option<(&'static str, f64)> {
        self.float_fields()
            .into_iter()
            .find(|(_, value)| *value < 0.0)
    }
}
