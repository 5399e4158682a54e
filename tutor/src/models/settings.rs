use serde::{Deserialize, Serialize};

pub const TEMPERATURE_RANGE: (f32, f32) = (0.1, 2.0);
pub const TOP_P_RANGE: (f32, f32) = (0.1, 1.0);
pub const MAX_CONTEXT_RANGE: (u32, u32) = (100, 4096);

/// Sampling parameters shared by every generation call.
///
/// Fields are private so every write goes through a clamping setter; readers
/// never observe an out-of-range value.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerationSettings {
    temperature: f32,
    top_p: f32,
    max_context_length: u32,
}

/// Partial settings update. Missing fields are left untouched.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    /// Signed so that out-of-range values are clamped instead of rejected.
    pub max_context_length: Option<i64>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.9,
            max_context_length: 2048,
        }
    }
}

impl GenerationSettings {
    pub fn new(temperature: f32, top_p: f32, max_context_length: u32) -> Self {
        let mut settings = Self::default();
        settings.set_temperature(temperature);
        settings.set_top_p(top_p);
        settings.set_max_context_length(i64::from(max_context_length));
        settings
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn top_p(&self) -> f32 {
        self.top_p
    }

    pub fn max_context_length(&self) -> u32 {
        self.max_context_length
    }

    pub fn set_temperature(&mut self, temperature: f32) {
        self.temperature = clamp_f32(temperature, TEMPERATURE_RANGE, self.temperature);
    }

    pub fn set_top_p(&mut self, top_p: f32) {
        self.top_p = clamp_f32(top_p, TOP_P_RANGE, self.top_p);
    }

    pub fn set_max_context_length(&mut self, max_context_length: i64) {
        let (min, max) = MAX_CONTEXT_RANGE;
        self.max_context_length =
            max_context_length.clamp(i64::from(min), i64::from(max)) as u32;
    }

    pub fn update(&mut self, update: SettingsUpdate) {
        if let Some(temperature) = update.temperature {
            self.set_temperature(temperature);
        }
        if let Some(top_p) = update.top_p {
            self.set_top_p(top_p);
        }
        if let Some(max_context_length) = update.max_context_length {
            self.set_max_context_length(max_context_length);
        }
    }
}

// NaN keeps the previous value; `f32::clamp` would propagate it.
fn clamp_f32(value: f32, (min, max): (f32, f32), previous: f32) -> f32 {
    if value.is_nan() {
        return previous;
    }
    value.clamp(min, max)
}
